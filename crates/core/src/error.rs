//! Domain error model.

use thiserror::Error;

use crate::id::ItemName;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification used by callers to decide how to react.
///
/// - `Validation`: the user can correct the input and retry.
/// - `Stock`: the cart view is stale and must be refreshed.
/// - `Persistence`: the current action is abandoned; the process keeps running.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Stock,
    Persistence,
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, stock). Storage failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested quantity was zero, negative or out of range.
    #[error("invalid quantity {0}: must be a positive whole number")]
    InvalidQuantity(i64),

    /// Checkout was requested with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Add-to-cart pre-check: the catalog cannot cover the requested quantity.
    #[error("insufficient stock for {item}: requested {requested}, available {available}")]
    InsufficientStock {
        item: ItemName,
        requested: u32,
        available: u32,
    },

    /// Commit-time re-validation failed: stock moved since the line was added.
    #[error(
        "stock changed during checkout for {item}: requested {requested}, available {available}"
    )]
    StockChangedDuringCheckout {
        item: ItemName,
        requested: u32,
        available: u32,
    },

    /// A requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A conflict occurred (duplicate key, operation not allowed in current state).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. an unusable item name).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Map onto the caller-facing taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DomainError::InsufficientStock { .. } | DomainError::StockChangedDuringCheckout { .. } => {
                ErrorCategory::Stock
            }
            _ => ErrorCategory::Validation,
        }
    }
}
