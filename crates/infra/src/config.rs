//! Runtime configuration.
//!
//! Read from the environment:
//!
//! - `VENDING_CATALOG_PATH` (default `drinks.txt`)
//! - `VENDING_LEDGER_PATH` (default `orders.txt`)
//! - `VENDING_LEDGER_FORMAT`: `text` or `jsonl` (default `text`)

use std::path::PathBuf;

use thiserror::Error;

use crate::order_ledger::LedgerFormat;

pub const CATALOG_PATH_VAR: &str = "VENDING_CATALOG_PATH";
pub const LEDGER_PATH_VAR: &str = "VENDING_LEDGER_PATH";
pub const LEDGER_FORMAT_VAR: &str = "VENDING_LEDGER_FORMAT";

const DEFAULT_CATALOG_PATH: &str = "drinks.txt";
const DEFAULT_LEDGER_PATH: &str = "orders.txt";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendingConfig {
    pub catalog_path: PathBuf,
    pub ledger_path: PathBuf,
    pub ledger_format: LedgerFormat,
}

impl Default for VendingConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            ledger_format: LedgerFormat::default(),
        }
    }
}

impl VendingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys take their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(CATALOG_PATH_VAR) {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(path) = get(LEDGER_PATH_VAR) {
            config.ledger_path = PathBuf::from(path);
        }
        if let Some(value) = get(LEDGER_FORMAT_VAR) {
            config.ledger_format = value.parse().map_err(|reason| ConfigError::InvalidValue {
                key: LEDGER_FORMAT_VAR,
                value: value.clone(),
                reason,
            })?;
        }

        Ok(config)
    }
}
