//! Whole-statement totals reported on the prediction path.

use casca_ingest::TransactionTable;
use serde::Serialize;

use crate::vector::FeatureVector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatementTotals {
    pub total_credits: f64,
    pub total_debits: f64,
    /// Balance on the last record; 0 when empty or not printed
    pub final_balance: f64,
    pub net_cash_flow: f64,
}

impl StatementTotals {
    pub fn from_table(table: &TransactionTable) -> Self {
        let total_credits = table.total_in();
        let total_debits = table.total_out();
        let final_balance = table
            .records()
            .last()
            .and_then(|r| r.balance)
            .unwrap_or(0.0);
        Self {
            total_credits,
            total_debits,
            final_balance,
            net_cash_flow: total_credits - total_debits,
        }
    }

    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector::new()
            .with("Total Credits", Some(self.total_credits))
            .with("Total Debits", Some(self.total_debits))
            .with("Final Balance", Some(self.final_balance))
            .with("Net Cash Flow", Some(self.net_cash_flow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casca_ingest::TransactionRecord;

    #[test]
    fn test_net_is_credits_minus_debits() {
        let table = TransactionTable::new(vec![
            TransactionRecord::new("01 Jan", "SALARY", 2500.0, 0.0, Some(3454.5)),
            TransactionRecord::new("02 Jan", "TESCO", 0.0, 45.5, Some(3409.0)),
            TransactionRecord::new("03 Jan", "REFUND", 12.25, 0.0, None),
        ]);
        let t = StatementTotals::from_table(&table);
        assert_eq!(t.total_credits, 2512.25);
        assert_eq!(t.total_debits, 45.5);
        assert_eq!(t.net_cash_flow, t.total_credits - t.total_debits);
        assert_eq!(t.final_balance, 0.0);
    }

    #[test]
    fn test_empty_statement() {
        let t = StatementTotals::from_table(&TransactionTable::default());
        assert_eq!(t.to_vector().value("Net Cash Flow"), Some(0.0));
        assert_eq!(t.final_balance, 0.0);
    }
}
