//! Money amounts (non-negative, integer minor units).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A non-negative amount in the smallest currency unit (cents).
///
/// Text form is a plain decimal with two fractional digits (`4.50`). Parsing is
/// lenient about the digits it accepts (`1.5`, `2`, `.5`) because older catalog and
/// ledger files were written with floating-point formatting.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Line cost: unit price times quantity.
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(u64::from(quantity)).map(Money)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(DomainError::validation(format!("amount {s:?} cannot be negative")));
        }

        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(DomainError::validation(format!("invalid amount {s:?}")));
        }

        let overflow = || DomainError::validation(format!("amount {s:?} is too large"));
        let units: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };

        let digits: Vec<u64> = fraction.bytes().map(|b| u64::from(b - b'0')).collect();
        let tenths = digits.first().copied().unwrap_or(0);
        let hundredths = digits.get(1).copied().unwrap_or(0);
        let round_up = digits.get(2).is_some_and(|d| *d >= 5);

        units
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + u64::from(round_up)))
            .map(Money)
            .ok_or_else(overflow)
    }
}
