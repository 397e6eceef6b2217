use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IngestError;

/// The statement layouts we know how to read. Each one is tied to a single
/// source document format; the caller picks the one matching the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementLayout {
    /// `DD Mon <description> [debit] [credit] <balance> CR` text lines
    RegexLine,
    /// Detected table grid with a `DD-Mon-YYYY` first cell
    Tabular,
    /// `DD Mon YY <description> <in> <out> <balance>` whitespace tokens
    TokenColumns,
    /// `Mon DD <description> <ref> <signed amount>`, balance recomputed from a known start
    SignedRunningBalance,
}

impl StatementLayout {
    pub const ALL: [StatementLayout; 4] = [
        StatementLayout::RegexLine,
        StatementLayout::Tabular,
        StatementLayout::TokenColumns,
        StatementLayout::SignedRunningBalance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementLayout::RegexLine => "regex-line",
            StatementLayout::Tabular => "tabular",
            StatementLayout::TokenColumns => "token-columns",
            StatementLayout::SignedRunningBalance => "signed-running",
        }
    }
}

impl fmt::Display for StatementLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementLayout {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StatementLayout::ALL
            .into_iter()
            .find(|l| l.as_str() == wanted)
            .ok_or_else(|| IngestError::UnknownLayout(s.to_string()))
    }
}

/// Normalized output of statement parsers (layout-agnostic).
///
/// The date is kept as printed; coercion to a calendar date happens at
/// aggregation time so that unparseable dates still count towards totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
    /// Money credited to the account (>= 0)
    #[serde(rename = "In")]
    pub amount_in: f64,
    /// Money debited from the account (>= 0)
    #[serde(rename = "Out")]
    pub amount_out: f64,
    /// Printed (or recomputed) balance, when the layout carries one
    #[serde(rename = "Balance")]
    pub balance: Option<f64>,
}

impl TransactionRecord {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount_in: f64,
        amount_out: f64,
        balance: Option<f64>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount_in,
            amount_out,
            balance,
        }
    }

    /// Inflow minus outflow
    pub fn net(&self) -> f64 {
        self.amount_in - self.amount_out
    }
}

/// Transactions of one document in document order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    records: Vec<TransactionRecord>,
}

impl TransactionTable {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_in(&self) -> f64 {
        self.records.iter().map(|r| r.amount_in).sum()
    }

    pub fn total_out(&self) -> f64 {
        self.records.iter().map(|r| r.amount_out).sum()
    }
}

impl From<Vec<TransactionRecord>> for TransactionTable {
    fn from(records: Vec<TransactionRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a TransactionTable {
    type Item = &'a TransactionRecord;
    type IntoIter = std::slice::Iter<'a, TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A non-blank line (or table row) that did not yield a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line or row number within the extracted text
    pub line_no: usize,
    pub text: String,
}

/// Parser result: the extracted table plus whatever was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub table: TransactionTable,
    pub skipped: Vec<SkippedLine>,
}

impl ParseOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
