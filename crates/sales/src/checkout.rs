//! Two-phase checkout state machine.
//!
//! ```text
//! Empty --add--> Populated --propose--> Confirmed --accept--> Committed
//!                    ^                      |
//!                    +------- decline ------+
//! ```
//!
//! `Confirmed` means a summary has been handed to the caller and a yes/no decision
//! is pending. The session never touches storage: [`CheckoutSession::plan_commit`]
//! returns the catalog as it must look after the sale plus the ledger record, and
//! the caller persists both before calling [`CheckoutSession::mark_committed`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vending_catalog::{Catalog, Item};
use vending_core::{DomainError, DomainResult, ItemName, Money, OrderId, SessionId};

use crate::cart::Cart;
use crate::order::{OrderLine, OrderRecord, OrderSummary};

/// Checkout lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutState {
    Empty,
    Populated,
    Confirmed,
    Committed,
}

/// The customer's answer to an [`OrderSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

impl From<bool> for Decision {
    fn from(value: bool) -> Self {
        if value { Decision::Accept } else { Decision::Decline }
    }
}

/// Everything a commit must write, computed without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    /// The catalog with every line's quantity already deducted.
    pub catalog: Catalog,
    pub record: OrderRecord,
}

/// One cart lifecycle, from first add-to-cart to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    id: SessionId,
    cart: Cart,
    state: CheckoutState,
    pending: Option<OrderSummary>,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            cart: Cart::new(),
            state: CheckoutState::Empty,
            pending: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn pending_summary(&self) -> Option<&OrderSummary> {
        self.pending.as_ref()
    }

    pub fn add_to_cart(&mut self, item: &Item, quantity: i64) -> DomainResult<()> {
        self.ensure_cart_modifiable()?;
        self.cart.add_line(item, quantity)?;
        self.state = CheckoutState::Populated;
        Ok(())
    }

    /// Abandon the current selection.
    pub fn clear_cart(&mut self) -> DomainResult<()> {
        self.ensure_not_committed()?;
        self.cart.clear();
        self.pending = None;
        self.state = CheckoutState::Empty;
        Ok(())
    }

    /// Price the cart against the catalog and await a decision.
    ///
    /// Stock is deliberately not checked here; that happens at commit.
    pub fn propose(&mut self, catalog: &Catalog) -> DomainResult<OrderSummary> {
        self.ensure_not_committed()?;
        if self.cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(self.cart.len());
        let mut grand_total = Money::ZERO;
        for cart_line in self.cart.lines() {
            let item = catalog.find_by_name(cart_line.item_name.as_str())?;
            let line_total = item
                .unit_price()
                .checked_mul(cart_line.quantity)
                .ok_or_else(|| DomainError::invariant("line total overflows"))?;
            grand_total = grand_total
                .checked_add(line_total)
                .ok_or_else(|| DomainError::invariant("order total overflows"))?;
            lines.push(OrderLine {
                item_name: cart_line.item_name.clone(),
                quantity: cart_line.quantity,
                line_total,
            });
        }

        let summary = OrderSummary {
            session_id: self.id,
            lines,
            grand_total,
        };
        self.pending = Some(summary.clone());
        self.state = CheckoutState::Confirmed;
        Ok(summary)
    }

    /// Customer said no: back to the cart, nothing else changes.
    pub fn decline(&mut self) -> DomainResult<()> {
        self.ensure_confirmed()?;
        self.pending = None;
        self.state = CheckoutState::Populated;
        Ok(())
    }

    /// Re-validate every line against current stock and build the commit.
    ///
    /// Fails with `StockChangedDuringCheckout` on the first line the catalog can no
    /// longer cover (an item that disappeared counts as zero available). Nothing is
    /// mutated either way.
    pub fn plan_commit(
        &self,
        catalog: &Catalog,
        order_id: OrderId,
        placed_at: DateTime<Utc>,
    ) -> DomainResult<CommitPlan> {
        let summary = self.ensure_confirmed()?;

        let mut deductions: Vec<(ItemName, u32)> = Vec::with_capacity(summary.lines.len());
        for line in &summary.lines {
            let available = catalog.get(line.item_name.as_str()).map_or(0, Item::stock);
            if available < line.quantity {
                return Err(DomainError::StockChangedDuringCheckout {
                    item: line.item_name.clone(),
                    requested: line.quantity,
                    available,
                });
            }
            deductions.push((line.item_name.clone(), line.quantity));
        }

        let mut updated = catalog.clone();
        updated.deduct_all(&deductions)?;

        Ok(CommitPlan {
            catalog: updated,
            record: OrderRecord::from_summary(summary, order_id, placed_at),
        })
    }

    /// The plan was persisted; this cart instance is finished.
    pub fn mark_committed(&mut self) -> DomainResult<()> {
        self.ensure_confirmed()?;
        self.cart.clear();
        self.pending = None;
        self.state = CheckoutState::Committed;
        Ok(())
    }

    /// The commit could not complete; keep the cart so the caller can re-present it.
    pub fn abort_commit(&mut self) {
        if self.state == CheckoutState::Confirmed {
            self.pending = None;
            self.state = CheckoutState::Populated;
        }
    }

    fn ensure_not_committed(&self) -> DomainResult<()> {
        if self.state == CheckoutState::Committed {
            return Err(DomainError::invariant(
                "checkout already committed; start a new session",
            ));
        }
        Ok(())
    }

    fn ensure_cart_modifiable(&self) -> DomainResult<()> {
        self.ensure_not_committed()?;
        if self.state == CheckoutState::Confirmed {
            return Err(DomainError::conflict(
                "cart cannot change while a confirmation is pending",
            ));
        }
        Ok(())
    }

    fn ensure_confirmed(&self) -> DomainResult<&OrderSummary> {
        match (&self.state, &self.pending) {
            (CheckoutState::Confirmed, Some(summary)) => Ok(summary),
            _ => Err(DomainError::conflict("no checkout awaiting confirmation")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(name: &str, cents: u64, stock: u32) -> Item {
        Item::new(ItemName::new(name).unwrap(), Money::from_cents(cents), stock, "").unwrap()
    }

    fn catalog() -> Catalog {
        [item("Cola", 150, 10), item("Water", 200, 3), item("Juice", 300, 10)]
            .into_iter()
            .collect()
    }

    fn add(session: &mut CheckoutSession, catalog: &Catalog, name: &str, quantity: i64) {
        let item = catalog.find_by_name(name).unwrap();
        session.add_to_cart(item, quantity).unwrap();
    }

    #[test]
    fn starts_empty_and_populates_on_add() {
        let catalog = catalog();
        let mut session = CheckoutSession::new();
        assert_eq!(session.state(), CheckoutState::Empty);
        add(&mut session, &catalog, "Cola", 3);
        assert_eq!(session.state(), CheckoutState::Populated);
    }

    #[test]
    fn propose_on_empty_cart_fails() {
        let mut session = CheckoutSession::new();
        assert_eq!(session.propose(&catalog()), Err(DomainError::EmptyCart));
        assert_eq!(session.state(), CheckoutState::Empty);
    }

    #[test]
    fn propose_prices_lines_and_total() {
        let catalog = catalog();
        let mut session = CheckoutSession::new();
        add(&mut session, &catalog, "Cola", 3);
        add(&mut session, &catalog, "Water", 2);

        let summary = session.propose(&catalog).unwrap();
        assert_eq!(summary.session_id, session.id());
        assert_eq!(summary.lines[0].line_total, Money::from_cents(450));
        assert_eq!(summary.lines[1].line_total, Money::from_cents(400));
        assert_eq!(summary.grand_total, Money::from_cents(850));
        assert_eq!(session.state(), CheckoutState::Confirmed);
        assert_eq!(session.pending_summary(), Some(&summary));
    }

    #[test]
    fn decline_returns_to_populated() {
        let catalog = catalog();
        let mut session = CheckoutSession::new();
        add(&mut session, &catalog, "Cola", 1);
        session.propose(&catalog).unwrap();
        session.decline().unwrap();
        assert_eq!(session.state(), CheckoutState::Populated);
        assert!(session.pending_summary().is_none());
        assert_eq!(session.cart().len(), 1);
    }

    #[test]
    fn cart_is_frozen_while_confirmation_pending() {
        let catalog = catalog();
        let mut session = CheckoutSession::new();
        add(&mut session, &catalog, "Cola", 1);
        session.propose(&catalog).unwrap();
        let err = session
            .add_to_cart(catalog.find_by_name("Water").unwrap(), 1)
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn plan_commit_deducts_on_a_copy() {
        let catalog = catalog();
        let mut session = CheckoutSession::new();
        add(&mut session, &catalog, "Cola", 3);
        session.propose(&catalog).unwrap();

        let order_id = OrderId::new();
        let plan = session.plan_commit(&catalog, order_id, Utc::now()).unwrap();
        assert_eq!(plan.catalog.get("Cola").unwrap().stock(), 7);
        assert_eq!(catalog.get("Cola").unwrap().stock(), 10);
        assert_eq!(plan.record.order_id, Some(order_id));
        assert_eq!(plan.record.grand_total, Money::from_cents(450));
    }

    #[test]
    fn plan_commit_rejects_changed_stock() {
        let mut catalog = catalog();
        let mut session = CheckoutSession::new();
        add(&mut session, &catalog, "Juice", 8);
        add(&mut session, &catalog, "Cola", 1);
        session.propose(&catalog).unwrap();

        catalog
            .deduct_all(&[(ItemName::new("Juice").unwrap(), 8)])
            .unwrap();

        let err = session
            .plan_commit(&catalog, OrderId::new(), Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::StockChangedDuringCheckout {
                item: ItemName::new("Juice").unwrap(),
                requested: 8,
                available: 2,
            }
        );
    }

    #[test]
    fn plan_commit_treats_vanished_item_as_out_of_stock() {
        let mut catalog = catalog();
        let mut session = CheckoutSession::new();
        add(&mut session, &catalog, "Water", 1);
        session.propose(&catalog).unwrap();

        catalog
            .update_item(
                "Water",
                vending_catalog::ItemUpdate::Rename(ItemName::new("Still Water").unwrap()),
            )
            .unwrap();

        let err = session
            .plan_commit(&catalog, OrderId::new(), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::StockChangedDuringCheckout { available: 0, .. }
        ));
    }

    #[test]
    fn plan_commit_requires_pending_proposal() {
        let catalog = catalog();
        let mut session = CheckoutSession::new();
        add(&mut session, &catalog, "Cola", 1);
        let err = session
            .plan_commit(&catalog, OrderId::new(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn committed_session_is_terminal() {
        let catalog = catalog();
        let mut session = CheckoutSession::new();
        add(&mut session, &catalog, "Cola", 1);
        session.propose(&catalog).unwrap();
        session.mark_committed().unwrap();

        assert_eq!(session.state(), CheckoutState::Committed);
        assert!(session.cart().is_empty());
        let err = session
            .add_to_cart(catalog.find_by_name("Cola").unwrap(), 1)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert!(matches!(session.propose(&catalog), Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn abort_commit_keeps_cart() {
        let catalog = catalog();
        let mut session = CheckoutSession::new();
        add(&mut session, &catalog, "Cola", 2);
        session.propose(&catalog).unwrap();
        session.abort_commit();
        assert_eq!(session.state(), CheckoutState::Populated);
        assert_eq!(session.cart().quantity_of(&ItemName::new("Cola").unwrap()), Some(2));
    }

    #[test]
    fn decision_from_bool() {
        assert_eq!(Decision::from(true), Decision::Accept);
        assert_eq!(Decision::from(false), Decision::Decline);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any sequence of carts committed one after another against
        /// the same catalog, either the whole plan applies or the catalog is unchanged.
        #[test]
        fn sequential_commits_are_all_or_nothing(
            carts in prop::collection::vec(
                prop::collection::vec((0usize..3, 1i64..11), 1..4),
                1..12,
            )
        ) {
            let names = ["Cola", "Water", "Juice"];
            let mut catalog = catalog();

            for cart in carts {
                let mut session = CheckoutSession::new();
                for (i, q) in cart {
                    // Pre-check failures are fine; they just leave the line out.
                    let item = catalog.find_by_name(names[i]).unwrap();
                    let _ = session.add_to_cart(item, q);
                }
                if session.cart().is_empty() {
                    continue;
                }

                session.propose(&catalog).unwrap();
                let before = catalog.clone();
                match session.plan_commit(&catalog, OrderId::new(), Utc::now()) {
                    Ok(plan) => {
                        for line in &plan.record.lines {
                            let old = before.get(line.item_name.as_str()).unwrap().stock();
                            let new = plan.catalog.get(line.item_name.as_str()).unwrap().stock();
                            prop_assert_eq!(old - new, line.quantity);
                        }
                        catalog = plan.catalog;
                        session.mark_committed().unwrap();
                    }
                    Err(_) => prop_assert_eq!(&catalog, &before),
                }
            }
        }
    }
}
