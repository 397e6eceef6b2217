//! Fixed-pattern line parser (text)
//!
//! Expected extracted-text rows:
//!   01 Jan CARD PAYMENT TESCO 45.50  954.50 CR
//!   03 Jan SALARY ACME LTD  2,500.00 3,454.50 CR
//!
//! Columns are DATE DESCRIPTION [DEBIT] [CREDIT] BALANCE, with an absent
//! debit or credit leaving its separating space behind.

use regex::Regex;
use std::sync::OnceLock;

use super::OutcomeBuilder;
use crate::amount::parse_amount;
use crate::types::{ParseOutcome, TransactionRecord};

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<date>\d{2} \w{3}) ",
            r"(?P<desc>.+?) ",
            r"(?P<debit>\d{1,3}(?:,\d{3})*\.\d{2})? ",
            r"(?P<credit>\d{1,3}(?:,\d{3})*\.\d{2})? ",
            r"(?P<balance>\d{1,3}(?:,\d{3})*\.\d{2}) CR?"
        ))
        .expect("regex-line pattern")
    })
}

/// Parse extracted statement text line by line; debit goes to Out, credit to In.
pub fn parse_regex_line_text(text: &str) -> ParseOutcome {
    let mut out = OutcomeBuilder::default();

    for (i, line) in text.lines().enumerate() {
        let Some(caps) = line_re().captures(line) else {
            out.skip(i + 1, line);
            continue;
        };

        let field = |name: &str| {
            caps.name(name)
                .and_then(|m| parse_amount(m.as_str()))
                .unwrap_or(0.0)
        };

        out.push(TransactionRecord::new(
            &caps["date"],
            &caps["desc"],
            field("credit"),
            field("debit"),
            Some(field("balance")),
        ));
    }

    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
STATEMENT OF ACCOUNT                      Page 1
Date   Details                 Debit    Credit    Balance
01 Jan CARD PAYMENT TESCO 45.50  954.50 CR
03 Jan SALARY ACME LTD  2,500.00 3,454.50 CR
05 Jan BALANCE CARRIED FORWARD 3,454.50 CR
"#;

    #[test]
    fn test_debit_only_and_credit_only_rows() {
        let outcome = parse_regex_line_text(SAMPLE);
        let rows = outcome.table.records();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].date, "01 Jan");
        assert_eq!(rows[0].description, "CARD PAYMENT TESCO");
        assert_eq!(rows[0].amount_out, 45.50);
        assert_eq!(rows[0].amount_in, 0.0);
        assert_eq!(rows[0].balance, Some(954.50));

        assert_eq!(rows[1].description, "SALARY ACME LTD");
        assert_eq!(rows[1].amount_in, 2500.0);
        assert_eq!(rows[1].amount_out, 0.0);
        assert_eq!(rows[1].balance, Some(3454.50));
    }

    #[test]
    fn test_totals_match_matched_fields() {
        let outcome = parse_regex_line_text(SAMPLE);
        assert_eq!(outcome.table.total_in(), 2500.0);
        assert_eq!(outcome.table.total_out(), 45.50);
        // header lines plus the single-spaced carried-forward line
        assert_eq!(outcome.skipped_count(), 3);
        assert!(outcome.skipped.iter().any(|s| s.text.contains("CARRIED FORWARD")));
    }

    #[test]
    fn test_row_with_both_amounts() {
        let outcome = parse_regex_line_text("04 Jan TRANSFER 100.00 50.00 1,050.00 CR");
        let row = &outcome.table.records()[0];
        assert_eq!(row.amount_out, 100.0);
        assert_eq!(row.amount_in, 50.0);
        assert_eq!(row.balance, Some(1050.0));
    }

    #[test]
    fn test_unmatched_lines_are_skipped_silently() {
        let outcome = parse_regex_line_text("hello\n\n01 Jan missing amounts CR\n");
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.skipped_count(), 2);
        assert_eq!(outcome.skipped[1].line_no, 3);
    }
}
