//! Infrastructure layer: catalog and ledger storage, configuration, and the
//! `VendingService` coordinator that persists what the domain decides.

pub mod catalog_store;
pub mod config;
pub mod order_ledger;
pub mod persistence;
pub mod service;


pub use catalog_store::{CatalogStore, FileCatalogStore, InMemoryCatalogStore};
pub use config::{ConfigError, VendingConfig};
pub use order_ledger::{FileOrderLedger, InMemoryOrderLedger, LedgerFormat, OrderLedger};
pub use persistence::PersistenceError;
pub use service::{CheckoutOutcome, ServiceError, VendingService, open_file_service};
