//! Layout-specific statement parsers.
//!
//! Every parser is a pure function from extracted text to a [`ParseOutcome`].
//! Lines that do not have the layout's shape are recorded as skipped, never
//! reported as errors.

pub mod regex_line;
pub mod tabular;
pub mod token_line;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::pdf;
use crate::types::{ParseOutcome, SkippedLine, StatementLayout, TransactionRecord, TransactionTable};

/// Starting balance printed on the Account Summary of the signed-amount layout.
pub const DEFAULT_STARTING_BALANCE: f64 = 10487.68;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
    /// Opening balance for layouts that recompute the running balance
    pub starting_balance: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
        }
    }
}

/// Parse already-extracted statement text with the given layout.
pub fn parse_statement_text(layout: StatementLayout, text: &str, opts: &ParseOptions) -> ParseOutcome {
    let outcome = match layout {
        StatementLayout::RegexLine => regex_line::parse_regex_line_text(text),
        StatementLayout::Tabular => tabular::parse_tabular_rows(&pdf::table_grid(text)),
        StatementLayout::TokenColumns => token_line::parse_token_columns_text(text),
        StatementLayout::SignedRunningBalance => {
            token_line::parse_signed_running_text(text, opts.starting_balance)
        }
    };

    for s in &outcome.skipped {
        debug!(layout = %layout, line = s.line_no, text = %s.text, "skipped line");
    }
    if outcome.table.is_empty() {
        warn!(layout = %layout, skipped = outcome.skipped.len(), "no transactions matched");
    } else {
        info!(
            layout = %layout,
            rows = outcome.table.len(),
            skipped = outcome.skipped.len(),
            "parsed statement"
        );
    }
    outcome
}

/// Extract text from PDF bytes, then parse it with the given layout.
///
/// Only text extraction can fail; rows that do not match are skipped.
pub fn parse_statement_pdf(layout: StatementLayout, bytes: &[u8], opts: &ParseOptions) -> Result<ParseOutcome> {
    let text = pdf::extract_text(bytes)?;
    Ok(parse_statement_text(layout, &text, opts))
}

/// Accumulates records and skipped lines while a parser walks its input.
#[derive(Default)]
pub(crate) struct OutcomeBuilder {
    records: Vec<TransactionRecord>,
    skipped: Vec<SkippedLine>,
}

impl OutcomeBuilder {
    pub(crate) fn push(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    pub(crate) fn skip(&mut self, line_no: usize, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.skipped.push(SkippedLine {
            line_no,
            text: text.trim().to_string(),
        });
    }

    pub(crate) fn finish(self) -> ParseOutcome {
        ParseOutcome {
            table: TransactionTable::new(self.records),
            skipped: self.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_empty_table_for_every_layout() {
        let text = "STATEMENT OF ACCOUNT\nNothing to see here\n";
        for layout in StatementLayout::ALL {
            let outcome = parse_statement_text(layout, text, &ParseOptions::default());
            assert!(outcome.table.is_empty(), "{layout} produced rows");
            assert_eq!(outcome.skipped_count(), 2, "{layout}");
        }
    }

    #[test]
    fn test_space_aligned_tabular_text_keeps_blank_columns() {
        let header = format!(
            "{:<13}{:<6}{:<16}{:<6}{:<10}{:<10}{}",
            "Date", "Ref", "Description", "Type", "Debit", "Credit", "Balance"
        );
        let rent = format!(
            "{:<13}{:<6}{:<16}{:<6}{:>10}{:>10}{:>10}",
            "05-Jan-2024", "DD7", "Office rent", "DD", "750.00", "", "2,450.00"
        );
        let invoice = format!(
            "{:<13}{:<6}{:<16}{:<6}{:>10}{:>10}{:>10}",
            "08-Jan-2024", "FP2", "Globex invoice", "FPI", "", "1,000.00", "3,450.00"
        );
        let text = format!("{header}\n{rent}\n{invoice}\n");

        let outcome = parse_statement_text(StatementLayout::Tabular, &text, &ParseOptions::default());
        let txns = outcome.table.records();
        assert_eq!(txns.len(), 2);
        assert_eq!((txns[0].amount_in, txns[0].amount_out), (0.0, 750.0));
        assert_eq!(txns[0].balance, Some(2450.0));
        assert_eq!((txns[1].amount_in, txns[1].amount_out), (1000.0, 0.0));
        assert_eq!(txns[1].balance, Some(3450.0));
    }

    #[test]
    fn test_tabular_rows_without_header_or_balance() {
        let text = "05-Jan-2024  DD7  Office rent  DD  750.00    2,450.00\n\
                    06-Jan-2024\tDD8\tCard fee\tCHG\t5.00\t\t\n";
        let outcome = parse_statement_text(StatementLayout::Tabular, text, &ParseOptions::default());
        let txns = outcome.table.records();
        assert_eq!(txns.len(), 2);
        assert_eq!((txns[0].amount_in, txns[0].amount_out), (0.0, 750.0));
        assert_eq!(txns[0].balance, Some(2450.0));
        assert_eq!(txns[1].amount_out, 5.0);
        assert_eq!(txns[1].balance, None);
    }

    #[test]
    fn test_blank_text_skips_nothing() {
        for layout in StatementLayout::ALL {
            let outcome = parse_statement_text(layout, "", &ParseOptions::default());
            assert!(outcome.table.is_empty());
            assert!(outcome.skipped.is_empty());
        }
    }

    #[test]
    fn test_dispatch_selects_layout() {
        let text = "Jan 5 Client payment REF1 1,000.00\n";
        let opts = ParseOptions {
            starting_balance: 500.0,
        };
        let signed = parse_statement_text(StatementLayout::SignedRunningBalance, text, &opts);
        assert_eq!(signed.table.len(), 1);
        assert_eq!(signed.table.records()[0].balance, Some(1500.0));

        let regex = parse_statement_text(StatementLayout::RegexLine, text, &opts);
        assert!(regex.table.is_empty());
    }
}
