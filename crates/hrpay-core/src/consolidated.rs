//! Consolidated (multi-employee) statement parsing.
//!
//! Statements are pipe-delimited tables. A data row starts with `|`, has at
//! least [`MIN_CELLS`] cells when split on `|`, and carries a numeric serial
//! in its second cell; everything else (borders, headers, separators) is
//! skipped.

use tracing::debug;

use crate::models::ConsolidatedRow;
use crate::payslip::rules::parse_amount;
use crate::payslip::rules::patterns::{NUMERIC_CELL, SERIAL_CELL};

/// Minimum number of `|`-separated cells in a data row.
pub const MIN_CELLS: usize = 10;

const NAME_CELL: usize = 2;
const DESIGNATION_CELL: usize = 5;
const WAGE_RATE_CELL: usize = 6;
/// Net pay is searched for among this many trailing cells.
const NET_WINDOW: usize = 4;

/// Parse every data row of a consolidated statement, in source order.
pub fn parse_consolidated(text: &str) -> Vec<ConsolidatedRow> {
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if !line.starts_with('|') {
            continue;
        }

        let cells: Vec<&str> = line.split('|').map(str::trim).collect();
        if cells.len() < MIN_CELLS || !SERIAL_CELL.is_match(cells[1]) {
            continue;
        }

        match parse_row(&cells) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    debug!(
        "Parsed {} consolidated rows ({} dropped on conversion errors)",
        rows.len(),
        skipped
    );
    rows
}

/// Convert the cells of a candidate row. `None` drops the row.
fn parse_row(cells: &[&str]) -> Option<ConsolidatedRow> {
    let wage_rate = match cells[WAGE_RATE_CELL] {
        "" => None,
        raw => Some(parse_amount(raw)?),
    };

    let tail = &cells[cells.len().saturating_sub(NET_WINDOW)..];
    let net = match tail.iter().rev().find(|c| NUMERIC_CELL.is_match(c)) {
        Some(raw) => Some(parse_amount(raw)?),
        None => None,
    };

    Some(ConsolidatedRow {
        name: cells[NAME_CELL].to_string(),
        designation: cells[DESIGNATION_CELL].to_string(),
        wage_rate,
        net,
    })
}
