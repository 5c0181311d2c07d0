//! Sales domain module: cart, two-phase checkout and the order/report model.
//!
//! This crate contains business rules for selling from the catalog, implemented
//! purely as deterministic domain logic (no IO, no storage). Persisting a
//! [`CommitPlan`] is the caller's job.

pub mod cart;
pub mod checkout;
pub mod order;
pub mod report;

pub use cart::{Cart, CartLine};
pub use checkout::{CheckoutSession, CheckoutState, CommitPlan, Decision};
pub use order::{OrderLine, OrderRecord, OrderSummary};
pub use report::{BestSeller, Report, ReportSummary, generate_report};
