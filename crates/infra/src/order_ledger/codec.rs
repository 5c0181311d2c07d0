//! Ledger file encoding.
//!
//! Two entry formats can share one file and are decoded line by line:
//!
//! - **text** (legacy): a block per order, exactly as older tills wrote it
//!
//!   ```text
//!   Order Summary:
//!   Cola x 3 = 4.50
//!
//!   Total: 4.50
//!
//!   ```
//!
//!   `Order Summary:` opens a block, lines containing `" x "` are order lines, a
//!   line containing `"Total: "` closes the block, anything else is ignored.
//! - **jsonl** (version 2): one JSON object per line, carrying the order id and
//!   timestamp the text format cannot.

use core::str::FromStr;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vending_core::{ItemName, Money, OrderId};
use vending_sales::{OrderLine, OrderRecord};

use crate::persistence::PersistenceError;

const ENTRY_VERSION: u32 = 2;
const SUMMARY_HEADER: &str = "Order Summary:";
const ITEM_SEPARATOR: &str = " x ";
const LINE_TOTAL_SEPARATOR: &str = " = ";
const TOTAL_MARKER: &str = "Total: ";

/// Which format new entries are appended in.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LedgerFormat {
    #[default]
    Text,
    JsonLines,
}

impl FromStr for LedgerFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LedgerFormat::Text),
            "jsonl" | "json-lines" => Ok(LedgerFormat::JsonLines),
            other => Err(format!("unknown ledger format {other:?} (expected text or jsonl)")),
        }
    }
}

impl core::fmt::Display for LedgerFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LedgerFormat::Text => f.write_str("text"),
            LedgerFormat::JsonLines => f.write_str("jsonl"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerEntry {
    version: u32,
    order_id: OrderId,
    placed_at: DateTime<Utc>,
    lines: Vec<OrderLine>,
    grand_total: Money,
}

/// Encode one record, including its trailing separator.
pub fn encode_entry(record: &OrderRecord, format: LedgerFormat) -> Result<String, PersistenceError> {
    match format {
        LedgerFormat::Text => Ok(format!("{record}\n\n")),
        LedgerFormat::JsonLines => {
            let (Some(order_id), Some(placed_at)) = (record.order_id, record.placed_at) else {
                return Err(PersistenceError::Encode(
                    "structured entries need an order id and timestamp".to_string(),
                ));
            };
            let entry = LedgerEntry {
                version: ENTRY_VERSION,
                order_id,
                placed_at,
                lines: record.lines.clone(),
                grand_total: record.grand_total,
            };
            let mut line =
                serde_json::to_string(&entry).map_err(|e| PersistenceError::Encode(e.to_string()))?;
            line.push('\n');
            Ok(line)
        }
    }
}

/// Decode a whole ledger file, preserving append order.
///
/// A text block cut off before its `Total:` line (a torn append) is dropped with a
/// warning when the next entry starts or the file ends; any other unreadable entry
/// is reported as corrupt.
pub fn decode_ledger(path: &Path, contents: &str) -> Result<Vec<OrderRecord>, PersistenceError> {
    let corrupt = |line: usize, reason: String| PersistenceError::Corrupt {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut records = Vec::new();
    let mut open_block: Vec<OrderLine> = Vec::new();

    for (idx, raw) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.starts_with("{\"") {
            if !open_block.is_empty() {
                tracing::warn!(path = %path.display(), line = line_no, "dropping unterminated ledger block");
                open_block.clear();
            }
            let entry: LedgerEntry =
                serde_json::from_str(line).map_err(|e| corrupt(line_no, e.to_string()))?;
            if entry.version != ENTRY_VERSION {
                return Err(corrupt(
                    line_no,
                    format!("unsupported ledger entry version {}", entry.version),
                ));
            }
            records.push(OrderRecord {
                order_id: Some(entry.order_id),
                placed_at: Some(entry.placed_at),
                lines: entry.lines,
                grand_total: entry.grand_total,
            });
        } else if line == SUMMARY_HEADER {
            if !open_block.is_empty() {
                tracing::warn!(path = %path.display(), line = line_no, "dropping unterminated ledger block");
                open_block.clear();
            }
        } else if line.contains(ITEM_SEPARATOR) {
            let order_line = parse_order_line(line).map_err(|reason| corrupt(line_no, reason))?;
            open_block.push(order_line);
        } else if let Some((_, total)) = line.split_once(TOTAL_MARKER) {
            let grand_total: Money = total
                .parse()
                .map_err(|e: vending_core::DomainError| corrupt(line_no, e.to_string()))?;
            records.push(OrderRecord {
                order_id: None,
                placed_at: None,
                lines: std::mem::take(&mut open_block),
                grand_total,
            });
        }
    }

    if !open_block.is_empty() {
        tracing::warn!(
            path = %path.display(),
            lines = open_block.len(),
            "dropping unterminated ledger block at end of file"
        );
    }

    Ok(records)
}

fn parse_order_line(line: &str) -> Result<OrderLine, String> {
    let (name, rest) = line
        .rsplit_once(ITEM_SEPARATOR)
        .ok_or_else(|| format!("missing {ITEM_SEPARATOR:?} in {line:?}"))?;
    let (quantity, line_total) = rest
        .split_once(LINE_TOTAL_SEPARATOR)
        .ok_or_else(|| format!("missing {LINE_TOTAL_SEPARATOR:?} in {line:?}"))?;

    Ok(OrderLine {
        item_name: ItemName::new(name).map_err(|e| e.to_string())?,
        quantity: quantity
            .trim()
            .parse()
            .map_err(|_| format!("invalid quantity {:?}", quantity.trim()))?,
        line_total: line_total.parse::<Money>().map_err(|e| e.to_string())?,
    })
}
