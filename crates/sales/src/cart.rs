use vending_catalog::Item;
use vending_core::{DomainError, DomainResult, ItemName};

/// One requested item: keyed by name, never by the mutable item itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item_name: ItemName,
    pub quantity: u32,
}

/// Transient per-session selection of items and quantities.
///
/// At most one line per item; lines keep the order in which items were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `quantity` units of `item`.
    ///
    /// Re-adding an item overwrites its quantity instead of summing. The stock
    /// check is a pre-check against the item as seen now; nothing is reserved, so
    /// the commit re-validates.
    pub fn add_line(&mut self, item: &Item, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }
        let quantity = u32::try_from(quantity).map_err(|_| DomainError::InvalidQuantity(quantity))?;

        if !item.covers(quantity) {
            return Err(DomainError::InsufficientStock {
                item: item.name().clone(),
                requested: quantity,
                available: item.stock(),
            });
        }

        match self.lines.iter_mut().find(|line| &line.item_name == item.name()) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine {
                item_name: item.name().clone(),
                quantity,
            }),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn quantity_of(&self, name: &ItemName) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| &line.item_name == name)
            .map(|line| line.quantity)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vending_core::Money;

    fn item(name: &str, cents: u64, stock: u32) -> Item {
        Item::new(ItemName::new(name).unwrap(), Money::from_cents(cents), stock, "").unwrap()
    }

    #[test]
    fn rejects_non_positive_quantities() {
        let mut cart = Cart::new();
        let cola = item("Cola", 150, 10);
        assert_eq!(cart.add_line(&cola, 0), Err(DomainError::InvalidQuantity(0)));
        assert_eq!(cart.add_line(&cola, -2), Err(DomainError::InvalidQuantity(-2)));
        assert!(cart.is_empty());
    }

    #[test]
    fn insufficient_stock_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let water = item("Water", 200, 3);
        let err = cart.add_line(&water, 5).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                item: water.name().clone(),
                requested: 5,
                available: 3,
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn re_adding_overwrites_quantity_in_place() {
        let mut cart = Cart::new();
        let cola = item("Cola", 150, 10);
        let water = item("Water", 200, 3);
        cart.add_line(&cola, 3).unwrap();
        cart.add_line(&water, 1).unwrap();
        cart.add_line(&cola, 10).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines()[0].item_name.as_str(), "Cola");
        assert_eq!(cart.lines()[0].quantity, 10);
        assert_eq!(cart.quantity_of(water.name()), Some(1));
    }

    #[test]
    fn failed_re_add_keeps_previous_quantity() {
        let mut cart = Cart::new();
        let water = item("Water", 200, 3);
        cart.add_line(&water, 2).unwrap();
        assert!(cart.add_line(&water, 4).is_err());
        assert_eq!(cart.quantity_of(water.name()), Some(2));
    }

    #[test]
    fn oversized_quantity_is_invalid() {
        let mut cart = Cart::new();
        let cola = item("Cola", 150, u32::MAX);
        let too_many = i64::from(u32::MAX) + 1;
        assert_eq!(
            cart.add_line(&cola, too_many),
            Err(DomainError::InvalidQuantity(too_many))
        );
    }

    #[test]
    fn clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add_line(&item("Cola", 150, 10), 1).unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }
}
