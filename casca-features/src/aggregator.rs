//! Feature aggregator: one statement table in, twelve indicators out.
//!
//! Steps:
//! 1. coerce printed dates (unparseable -> null date, row still counted in totals)
//! 2. treat a missing balance as 0
//! 3. group by calendar month: inflow, outflow, closing balance
//! 4. derive averages, volatility, keyword scans, growth, concentration
//!
//! The closing balance of a month is the balance of the month's LAST RECORD IN
//! DOCUMENT ORDER. Statements printed newest-first therefore report the
//! opening balance instead; the row order is left as the parser produced it.

use casca_ingest::{TransactionRecord, TransactionTable};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::dates::coerce_date;
use crate::keywords::{is_loan_payment, is_missed_payment};
use crate::stats::{mean, quantile, sample_std};
use crate::vector::{FeatureVector, INDICATORS};

/// Inflows at or above this quantile count as high-value.
pub const HIGH_VALUE_QUANTILE: f64 = 0.90;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregatorConfig {
    /// Year used for dates printed without one (`01 Jan`, `Sep 4`)
    pub default_year: Option<i32>,
}

/// Per-month aggregates, keyed by (year, month) in [`monthly_summary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub deposits: f64,
    pub withdrawals: f64,
    pub closing_balance: f64,
}

impl MonthlySummary {
    pub fn net_cash_flow(&self) -> f64 {
        self.deposits - self.withdrawals
    }
}

/// The twelve indicators. `None` is an undefined value, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialFeatures {
    pub avg_monthly_deposits: Option<f64>,
    pub avg_monthly_withdrawals: Option<f64>,
    pub avg_monthly_net_cash_flow: Option<f64>,
    /// Sample standard deviation of monthly net cash flow
    pub cash_flow_volatility: Option<f64>,
    pub avg_monthly_balance: Option<f64>,
    pub negative_balance_months: usize,
    pub total_loan_payments: f64,
    /// 0 when there is no inflow at all
    pub loan_to_income_ratio: f64,
    pub missed_payments: usize,
    /// Percent change of inflow between the two most recent years
    pub revenue_growth_rate: Option<f64>,
    pub high_value_transactions: usize,
    /// Largest share of inflow coming from a single description
    pub max_customer_revenue_share: Option<f64>,
}

impl FinancialFeatures {
    pub fn to_vector(&self) -> FeatureVector {
        let values = [
            self.avg_monthly_deposits,
            self.avg_monthly_withdrawals,
            self.avg_monthly_net_cash_flow,
            self.cash_flow_volatility,
            self.avg_monthly_balance,
            Some(self.negative_balance_months as f64),
            Some(self.total_loan_payments),
            Some(self.loan_to_income_ratio),
            Some(self.missed_payments as f64),
            self.revenue_growth_rate,
            Some(self.high_value_transactions as f64),
            self.max_customer_revenue_share,
        ];
        INDICATORS.into_iter().zip(values).collect()
    }
}

struct Dated<'a> {
    date: Option<NaiveDate>,
    record: &'a TransactionRecord,
}

fn dated<'a>(table: &'a TransactionTable, config: &AggregatorConfig) -> Vec<Dated<'a>> {
    table
        .iter()
        .map(|record| Dated {
            date: coerce_date(&record.date, config.default_year),
            record,
        })
        .collect()
}

fn group_months(rows: &[Dated<'_>]) -> BTreeMap<(i32, u32), MonthlySummary> {
    let mut months: BTreeMap<(i32, u32), MonthlySummary> = BTreeMap::new();
    for row in rows {
        let Some(date) = row.date else { continue };
        let m = months.entry((date.year(), date.month())).or_default();
        m.deposits += row.record.amount_in;
        m.withdrawals += row.record.amount_out;
        m.closing_balance = row.record.balance.unwrap_or(0.0);
    }
    months
}

/// Month-by-month inflow, outflow and closing balance for dated records.
pub fn monthly_summary(
    table: &TransactionTable,
    config: &AggregatorConfig,
) -> BTreeMap<(i32, u32), MonthlySummary> {
    group_months(&dated(table, config))
}

fn revenue_growth(rows: &[Dated<'_>]) -> Option<f64> {
    let mut years: BTreeMap<i32, f64> = BTreeMap::new();
    for row in rows {
        if let Some(date) = row.date {
            *years.entry(date.year()).or_default() += row.record.amount_in;
        }
    }
    let mut recent = years.values().rev();
    let last = *recent.next()?;
    let previous = *recent.next()?;
    if previous == 0.0 {
        return None;
    }
    Some((last - previous) / previous * 100.0)
}

fn max_counterparty_share(table: &TransactionTable, total_income: f64) -> Option<f64> {
    if total_income <= 0.0 {
        return None;
    }
    let mut by_description: HashMap<&str, f64> = HashMap::new();
    for r in table {
        *by_description.entry(r.description.as_str()).or_default() += r.amount_in;
    }
    by_description
        .values()
        .map(|v| v / total_income)
        .max_by(|a, b| a.total_cmp(b))
}

fn high_value_count(table: &TransactionTable) -> usize {
    let inflows: Vec<f64> = table.iter().map(|r| r.amount_in).collect();
    match quantile(&inflows, HIGH_VALUE_QUANTILE) {
        Some(threshold) => inflows.iter().filter(|v| **v >= threshold).count(),
        None => 0,
    }
}

/// Compute all twelve indicators for one entity's statement.
pub fn aggregate(table: &TransactionTable, config: &AggregatorConfig) -> FinancialFeatures {
    let rows = dated(table, config);
    let months = group_months(&rows);

    let deposits: Vec<f64> = months.values().map(|m| m.deposits).collect();
    let withdrawals: Vec<f64> = months.values().map(|m| m.withdrawals).collect();
    let net: Vec<f64> = months.values().map(|m| m.net_cash_flow()).collect();
    let closing: Vec<f64> = months.values().map(|m| m.closing_balance).collect();

    let total_income = table.total_in();
    let total_loan_payments: f64 = table
        .iter()
        .filter(|r| is_loan_payment(&r.description))
        .map(|r| r.amount_out)
        .sum();
    let loan_to_income_ratio = if total_income > 0.0 {
        total_loan_payments / total_income
    } else {
        0.0
    };

    let features = FinancialFeatures {
        avg_monthly_deposits: mean(&deposits),
        avg_monthly_withdrawals: mean(&withdrawals),
        avg_monthly_net_cash_flow: mean(&net),
        cash_flow_volatility: sample_std(&net),
        avg_monthly_balance: mean(&closing),
        negative_balance_months: closing.iter().filter(|b| **b < 0.0).count(),
        total_loan_payments,
        loan_to_income_ratio,
        missed_payments: table
            .iter()
            .filter(|r| is_missed_payment(&r.description))
            .count(),
        revenue_growth_rate: revenue_growth(&rows),
        high_value_transactions: high_value_count(table),
        max_customer_revenue_share: max_counterparty_share(table, total_income),
    };

    let undated = rows.iter().filter(|r| r.date.is_none()).count();
    info!(
        rows = table.len(),
        months = months.len(),
        undated,
        "aggregated statement features"
    );
    features
}
