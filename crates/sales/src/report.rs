//! Sales report derived by replaying the order ledger.

use std::collections::HashMap;

use vending_core::{ItemName, Money};

use crate::order::OrderRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestSeller {
    pub item_name: ItemName,
    pub units: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub order_count: usize,
    /// `None` only if every record in the ledger had no lines.
    pub best_seller: Option<BestSeller>,
    /// Largest single-order grand total.
    pub highest_sale: Money,
    pub total_revenue: Money,
    /// Units sold per item, in order of first appearance in the ledger.
    pub units_by_item: Vec<(ItemName, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    NoData,
    Summary(ReportSummary),
}

impl Report {
    pub fn summary(&self) -> Option<&ReportSummary> {
        match self {
            Report::NoData => None,
            Report::Summary(summary) => Some(summary),
        }
    }
}

/// Aggregate a ledger into a report.
///
/// Best seller ties go to the item that appears first in ledger order.
pub fn generate_report<'a>(records: impl IntoIterator<Item = &'a OrderRecord>) -> Report {
    let mut order_count = 0usize;
    let mut highest_sale = Money::ZERO;
    let mut total_revenue = Money::ZERO;
    let mut units_by_item: Vec<(ItemName, u64)> = Vec::new();
    let mut index: HashMap<ItemName, usize> = HashMap::new();

    for record in records {
        order_count += 1;
        highest_sale = highest_sale.max(record.grand_total);
        total_revenue = total_revenue.saturating_add(record.grand_total);

        for line in &record.lines {
            let slot = *index.entry(line.item_name.clone()).or_insert_with(|| {
                units_by_item.push((line.item_name.clone(), 0));
                units_by_item.len() - 1
            });
            units_by_item[slot].1 += u64::from(line.quantity);
        }
    }

    if order_count == 0 {
        return Report::NoData;
    }

    let mut best_seller: Option<BestSeller> = None;
    for (item_name, units) in &units_by_item {
        if best_seller.as_ref().is_none_or(|best| *units > best.units) {
            best_seller = Some(BestSeller {
                item_name: item_name.clone(),
                units: *units,
            });
        }
    }

    Report::Summary(ReportSummary {
        order_count,
        best_seller,
        highest_sale,
        total_revenue,
        units_by_item,
    })
}

impl core::fmt::Display for Report {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let summary = match self {
            Report::NoData => return write!(f, "No sales recorded yet."),
            Report::Summary(summary) => summary,
        };

        match &summary.best_seller {
            Some(best) => writeln!(f, "Best seller: {} ({} sold)", best.item_name, best.units)?,
            None => writeln!(f, "Best seller: none")?,
        }
        writeln!(f, "Highest sale: {}", summary.highest_sale)?;
        writeln!(f, "Orders: {}", summary.order_count)?;
        write!(f, "Revenue: {}", summary.total_revenue)
    }
}
