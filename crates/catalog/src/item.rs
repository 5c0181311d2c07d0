use serde::{Deserialize, Serialize};

use vending_core::{DomainError, DomainResult, ItemName, Money};

/// A sellable catalog item, keyed by name.
///
/// `stock` is unsigned, so the "never negative" invariant is carried by the type;
/// every decrement goes through [`Item::deduct`], which refuses to underflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    name: ItemName,
    unit_price: Money,
    stock: u32,
    image_reference: String,
}

impl Item {
    pub fn new(
        name: ItemName,
        unit_price: Money,
        stock: u32,
        image_reference: impl Into<String>,
    ) -> DomainResult<Self> {
        let image_reference = validate_image_reference(image_reference.into())?;
        Ok(Self {
            name,
            unit_price,
            stock,
            image_reference,
        })
    }

    pub fn name(&self) -> &ItemName {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Opaque to the core; presentation layers resolve it to an image.
    pub fn image_reference(&self) -> &str {
        &self.image_reference
    }

    pub fn covers(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// Remove sold units from stock.
    pub fn deduct(&mut self, quantity: u32) -> DomainResult<()> {
        self.stock = self
            .stock
            .checked_sub(quantity)
            .ok_or_else(|| DomainError::invariant("stock cannot go negative"))?;
        Ok(())
    }

    pub(crate) fn apply(&mut self, update: ItemUpdate) -> DomainResult<()> {
        match update {
            ItemUpdate::Rename(name) => self.name = name,
            ItemUpdate::Price(price) => self.unit_price = price,
            ItemUpdate::Stock(stock) => self.stock = stock,
            ItemUpdate::ImageReference(reference) => {
                self.image_reference = validate_image_reference(reference)?;
            }
        }
        Ok(())
    }
}

/// Administrative edit of a single item attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemUpdate {
    Rename(ItemName),
    Price(Money),
    Stock(u32),
    ImageReference(String),
}

fn validate_image_reference(reference: String) -> DomainResult<String> {
    if reference.contains([',', '\n', '\r']) {
        return Err(DomainError::validation(
            "image reference cannot contain commas or line breaks",
        ));
    }
    Ok(reference)
}
