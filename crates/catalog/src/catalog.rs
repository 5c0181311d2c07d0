use vending_core::{DomainError, DomainResult, ItemName};

use crate::item::{Item, ItemUpdate};

/// The set of sellable items, in persisted order, keyed by name.
///
/// Lookups are linear; a vending catalog holds tens of items, and keeping a
/// `Vec` preserves the file order that listings and saves rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        let name = name.trim();
        self.items.iter().find(|item| item.name().as_str() == name)
    }

    pub fn find_by_name(&self, name: &str) -> DomainResult<&Item> {
        self.get(name)
            .ok_or_else(|| DomainError::not_found(format!("item {:?}", name.trim())))
    }

    pub fn contains(&self, name: &ItemName) -> bool {
        self.get(name.as_str()).is_some()
    }

    /// Add a new item. Names are unique.
    pub fn add_item(&mut self, item: Item) -> DomainResult<()> {
        if self.contains(item.name()) {
            return Err(DomainError::conflict(format!(
                "item {} already exists",
                item.name()
            )));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn update_item(&mut self, name: &str, update: ItemUpdate) -> DomainResult<&Item> {
        if let ItemUpdate::Rename(new_name) = &update {
            if new_name.as_str() != name.trim() && self.contains(new_name) {
                return Err(DomainError::conflict(format!(
                    "item {new_name} already exists"
                )));
            }
        }

        let position = self.position(name)?;
        let item = &mut self.items[position];
        item.apply(update)?;
        Ok(item)
    }

    /// Deduct several quantities as one unit: either every line is applied or
    /// the catalog is left untouched.
    pub fn deduct_all(&mut self, deductions: &[(ItemName, u32)]) -> DomainResult<()> {
        let mut staged = self.items.clone();
        for (name, quantity) in deductions {
            let position = self.position(name.as_str())?;
            staged[position].deduct(*quantity)?;
        }
        self.items = staged;
        Ok(())
    }

    fn position(&self, name: &str) -> DomainResult<usize> {
        let name = name.trim();
        self.items
            .iter()
            .position(|item| item.name().as_str() == name)
            .ok_or_else(|| DomainError::not_found(format!("item {name:?}")))
    }
}

impl FromIterator<Item> for Catalog {
    /// Later duplicates of a name are dropped; use [`Catalog::add_item`] to
    /// observe the conflict instead.
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        for item in iter {
            if !catalog.contains(item.name()) {
                catalog.items.push(item);
            }
        }
        catalog
    }
}
