//! Process-wide logging setup shared by the vending binaries.

pub mod subscriber;

pub use subscriber::{DEFAULT_DIRECTIVE, init_with};

/// Initialize process-wide tracing with the default filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init_with(DEFAULT_DIRECTIVE);
}
