use std::sync::Arc;

use vending_catalog::Item;

use crate::persistence::PersistenceError;

/// Durable list of catalog items.
///
/// Implementations must:
/// - return items in the order they were saved
/// - skip records they cannot interpret instead of failing the whole load
/// - replace the stored catalog atomically on `save` (old list or new list, never a mix)
pub trait CatalogStore: Send + Sync {
    fn load(&self) -> Result<Vec<Item>, PersistenceError>;

    fn save(&self, items: &[Item]) -> Result<(), PersistenceError>;

    /// Load and look up one item by name.
    fn find_by_name(&self, name: &str) -> Result<Option<Item>, PersistenceError> {
        let name = name.trim();
        Ok(self
            .load()?
            .into_iter()
            .find(|item| item.name().as_str() == name))
    }
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn load(&self) -> Result<Vec<Item>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, items: &[Item]) -> Result<(), PersistenceError> {
        (**self).save(items)
    }
}
