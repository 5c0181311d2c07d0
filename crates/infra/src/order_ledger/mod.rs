//! Append-only order ledger boundary.
//!
//! Records are only ever appended and read back in full; nothing is updated or
//! deleted after a sale is committed.

pub mod codec;
pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use codec::{LedgerFormat, decode_ledger, encode_entry};
pub use file::FileOrderLedger;
pub use in_memory::InMemoryOrderLedger;
pub use r#trait::OrderLedger;
