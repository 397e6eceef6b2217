//! Table-grid statement parser
//!
//! Expected grid rows (cells):
//!   0 DATE (DD-Mon-YYYY) | 1 REF | 2 DESCRIPTION | 3 TYPE | 4 DEBIT | 5 CREDIT | 6 BALANCE
//!
//! Rows with fewer than six cells or without a leading date are not
//! transactions. A numeric cell that looks like an amount but cannot be read
//! as one invalidates the whole row.

use regex::Regex;
use std::sync::OnceLock;

use super::OutcomeBuilder;
use crate::amount::clean_amount;
use crate::pdf::GridRow;
use crate::types::{ParseOutcome, TransactionRecord};

const MIN_CELLS: usize = 6;

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}-[A-Za-z]{3,}-\d{4}").expect("tabular date regex"))
}

/// Reading of one numeric cell.
enum Cell {
    Value(f64),
    NotAnAmount,
    Malformed,
}

fn read_cell(raw: &str) -> Cell {
    match clean_amount(raw) {
        Some(s) => s.parse().map(Cell::Value).unwrap_or(Cell::Malformed),
        None => Cell::NotAnAmount,
    }
}

/// Debit/credit: blank or non-numeric cells count as 0.
fn money_cell(raw: &str) -> Option<f64> {
    let raw = if raw.trim().is_empty() { "0" } else { raw };
    match read_cell(raw) {
        Cell::Value(v) => Some(v),
        Cell::NotAnAmount => Some(0.0),
        Cell::Malformed => None,
    }
}

/// Balance: blank or non-numeric cells are unknown.
fn balance_cell(raw: Option<&String>) -> Option<Option<f64>> {
    match raw.map(|s| read_cell(s)) {
        Some(Cell::Value(v)) => Some(Some(v)),
        Some(Cell::Malformed) => None,
        Some(Cell::NotAnAmount) | None => Some(None),
    }
}

fn parse_row(cells: &[String]) -> Option<TransactionRecord> {
    if cells.len() < MIN_CELLS || !date_re().is_match(&cells[0]) {
        return None;
    }
    let debit = money_cell(&cells[4])?;
    let credit = money_cell(&cells[5])?;
    let balance = balance_cell(cells.get(6))?;
    Some(TransactionRecord::new(
        cells[0].as_str(),
        cells[2].as_str(),
        credit,
        debit,
        balance,
    ))
}

/// Parse detected table rows; credit goes to In, debit to Out.
pub fn parse_tabular_rows(rows: &[GridRow]) -> ParseOutcome {
    let mut out = OutcomeBuilder::default();
    for row in rows {
        match parse_row(&row.cells) {
            Some(record) => out.push(record),
            None => out.skip(row.line_no, &row.cells.join(" | ")),
        }
    }
    out.finish()
}
