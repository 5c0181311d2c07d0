use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vending_core::{ItemName, Money, OrderId, SessionId};

/// Priced order line: item, quantity, and `unit price × quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_name: ItemName,
    pub quantity: u32,
    /// Price in smallest currency unit (e.g., cents).
    pub line_total: Money,
}

/// Proposal shown to the customer before they decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub session_id: SessionId,
    pub lines: Vec<OrderLine>,
    pub grand_total: Money,
}

/// Immutable snapshot of a completed sale, as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    /// `None` for records read back from the legacy text ledger.
    pub order_id: Option<OrderId>,
    /// `None` for records read back from the legacy text ledger.
    pub placed_at: Option<DateTime<Utc>>,
    pub lines: Vec<OrderLine>,
    pub grand_total: Money,
}

impl OrderRecord {
    pub fn from_summary(summary: &OrderSummary, order_id: OrderId, placed_at: DateTime<Utc>) -> Self {
        Self {
            order_id: Some(order_id),
            placed_at: Some(placed_at),
            lines: summary.lines.clone(),
            grand_total: summary.grand_total,
        }
    }

    pub fn units(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

fn write_block(
    f: &mut core::fmt::Formatter<'_>,
    lines: &[OrderLine],
    grand_total: Money,
) -> core::fmt::Result {
    writeln!(f, "Order Summary:")?;
    for line in lines {
        writeln!(f, "{} x {} = {}", line.item_name, line.quantity, line.line_total)?;
    }
    write!(f, "\nTotal: {grand_total}")
}

impl core::fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write_block(f, &self.lines, self.grand_total)
    }
}

/// Renders the ledger block for this order (without the trailing blank line).
impl core::fmt::Display for OrderRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write_block(f, &self.lines, self.grand_total)
    }
}
