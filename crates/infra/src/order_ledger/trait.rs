use std::sync::Arc;

use vending_sales::OrderRecord;

use crate::persistence::PersistenceError;

/// Durable, append-only log of completed sales.
///
/// `append` must be synchronous: when it returns `Ok`, the record survives a
/// restart. `read_all` returns records in append order.
pub trait OrderLedger: Send + Sync {
    fn append(&self, record: &OrderRecord) -> Result<(), PersistenceError>;

    fn read_all(&self) -> Result<Vec<OrderRecord>, PersistenceError>;
}

impl<L> OrderLedger for Arc<L>
where
    L: OrderLedger + ?Sized,
{
    fn append(&self, record: &OrderRecord) -> Result<(), PersistenceError> {
        (**self).append(record)
    }

    fn read_all(&self) -> Result<Vec<OrderRecord>, PersistenceError> {
        (**self).read_all()
    }
}
