//! Catalog domain module.
//!
//! This crate contains business rules for sellable items and their stock levels,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod catalog;
pub mod item;

pub use catalog::Catalog;
pub use item::{Item, ItemUpdate};
