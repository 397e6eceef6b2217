//! Whitespace-tokenized line parsers (text)
//!
//! Two layouts share the approach: match a date at the start of the line,
//! then split the remaining tokens positionally from the right.
//!
//! Separate in/out columns:
//!   04 Sep19 Faster payment ACME LTD 1,500.00 0.00 6,210.43
//!
//! Single signed amount, balance recomputed from a known starting balance:
//!   Sep 4  Stripe payout      TRF0192     2,310.50
//!   Sep 6  AWS invoice        CARD        -120.00

use regex::Regex;
use std::sync::OnceLock;

use super::OutcomeBuilder;
use crate::amount::{parse_amount, parse_signed_amount};
use crate::types::{ParseOutcome, TransactionRecord};

fn day_month_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<date>\d{2} [A-Za-z]{3} ?\d{2})(?:\s|$)").expect("DD Mon YY regex")
    })
}

fn month_day_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<date>[A-Za-z]{3} \d{1,2})(?:\s|$)").expect("Mon DD regex")
    })
}

/// Split a line into its leading date and the tokens after it.
fn split_dated<'a>(re: &Regex, line: &'a str) -> Option<(&'a str, Vec<&'a str>)> {
    let caps = re.captures(line)?;
    let date = caps.name("date")?;
    let rest = line[date.end()..].split_whitespace().collect();
    Some((date.as_str(), rest))
}

/// `DD Mon YY <description> <in> <out> <balance>`
///
/// Non-numeric in/out tokens count as 0; a non-numeric balance is unknown.
pub fn parse_token_columns_text(text: &str) -> ParseOutcome {
    let mut out = OutcomeBuilder::default();

    for (i, line) in text.lines().enumerate() {
        let Some((date, tokens)) = split_dated(day_month_year_re(), line) else {
            out.skip(i + 1, line);
            continue;
        };
        if tokens.len() < 3 {
            out.skip(i + 1, line);
            continue;
        }

        let n = tokens.len();
        out.push(TransactionRecord::new(
            date,
            tokens[..n - 3].join(" "),
            parse_amount(tokens[n - 3]).unwrap_or(0.0),
            parse_amount(tokens[n - 2]).unwrap_or(0.0),
            parse_amount(tokens[n - 1]),
        ));
    }

    out.finish()
}

/// `Mon DD <description> <reference> <signed amount>`
///
/// Positive amounts are inflows, negative ones outflows. The printed balance
/// (if any) is ignored: every row carries `starting_balance` plus the signed
/// amounts seen so far, in document order.
pub fn parse_signed_running_text(text: &str, starting_balance: f64) -> ParseOutcome {
    let mut out = OutcomeBuilder::default();
    let mut balance = starting_balance;

    for (i, line) in text.lines().enumerate() {
        let Some((date, tokens)) = split_dated(month_day_re(), line) else {
            out.skip(i + 1, line);
            continue;
        };
        if tokens.len() < 2 {
            out.skip(i + 1, line);
            continue;
        }

        let n = tokens.len();
        let amount = parse_signed_amount(tokens[n - 1]).unwrap_or(0.0);
        let (amount_in, amount_out) = if amount >= 0.0 {
            (amount, 0.0)
        } else {
            (0.0, -amount)
        };
        balance += amount_in - amount_out;

        out.push(TransactionRecord::new(
            date,
            tokens[..n - 2].join(" "),
            amount_in,
            amount_out,
            Some(balance),
        ));
    }

    out.finish()
}
