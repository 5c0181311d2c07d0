//! `vending-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no logging).

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult, ErrorCategory};
pub use id::{ItemName, OrderId, SessionId};
pub use money::Money;
