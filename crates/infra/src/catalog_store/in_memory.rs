use std::sync::RwLock;

use vending_catalog::Item;

use super::r#trait::CatalogStore;
use crate::persistence::PersistenceError;

/// In-memory catalog store.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    items: RwLock<Vec<Item>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: RwLock::new(items.into_iter().collect()),
        }
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn load(&self) -> Result<Vec<Item>, PersistenceError> {
        let items = self
            .items
            .read()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        Ok(items.clone())
    }

    fn save(&self, items: &[Item]) -> Result<(), PersistenceError> {
        let mut stored = self
            .items
            .write()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        *stored = items.to_vec();
        Ok(())
    }
}
