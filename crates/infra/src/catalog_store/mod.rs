//! Catalog persistence boundary.
//!
//! The catalog is stored and replaced as a whole; there is no per-item write.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::{FileCatalogStore, format_record, parse_record};
pub use in_memory::InMemoryCatalogStore;
pub use r#trait::CatalogStore;
