use std::sync::RwLock;

use vending_sales::OrderRecord;

use super::r#trait::OrderLedger;
use crate::persistence::PersistenceError;

/// In-memory append-only ledger.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOrderLedger {
    records: RwLock<Vec<OrderRecord>>,
}

impl InMemoryOrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, PersistenceError> {
        let records = self
            .records
            .read()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, PersistenceError> {
        Ok(self.len()? == 0)
    }
}

impl OrderLedger for InMemoryOrderLedger {
    fn append(&self, record: &OrderRecord) -> Result<(), PersistenceError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        records.push(record.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<OrderRecord>, PersistenceError> {
        let records = self
            .records
            .read()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        Ok(records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vending_core::Money;

    fn record(cents: u64) -> OrderRecord {
        OrderRecord {
            order_id: None,
            placed_at: None,
            lines: Vec::new(),
            grand_total: Money::from_cents(cents),
        }
    }

    #[test]
    fn appends_are_read_back_in_order() {
        let ledger = InMemoryOrderLedger::new();
        assert!(ledger.is_empty().unwrap());

        ledger.append(&record(150)).unwrap();
        ledger.append(&record(300)).unwrap();

        assert_eq!(ledger.len().unwrap(), 2);
        assert_eq!(ledger.read_all().unwrap(), vec![record(150), record(300)]);
    }

    #[test]
    fn poisoned_lock_is_reported_as_unavailable() {
        let ledger = Arc::new(InMemoryOrderLedger::new());
        let poisoner = ledger.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.records.write().unwrap();
            panic!("poison the ledger lock");
        })
        .join();

        assert!(matches!(ledger.len(), Err(PersistenceError::Unavailable(_))));
        assert!(matches!(ledger.is_empty(), Err(PersistenceError::Unavailable(_))));
        assert!(matches!(ledger.append(&record(1)), Err(PersistenceError::Unavailable(_))));
    }
}
