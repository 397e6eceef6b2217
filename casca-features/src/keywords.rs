//! Description keyword rules.
//!
//! Case-insensitive substring matches, no regex needed.

/// Outflows whose description mentions one of these are loan repayments.
pub const LOAN_KEYWORDS: &[&str] = &["loan", "mortgage", "credit card", "emi", "finance"];

/// Any transaction mentioning one of these is a missed-payment signal.
pub const MISSED_PAYMENT_KEYWORDS: &[&str] = &["late fee", "penalty", "overdraft", "bounced"];

fn contains_any(description: &str, keywords: &[&str]) -> bool {
    let desc = description.to_lowercase();
    keywords.iter().any(|k| desc.contains(k))
}

pub fn is_loan_payment(description: &str) -> bool {
    contains_any(description, LOAN_KEYWORDS)
}

pub fn is_missed_payment(description: &str) -> bool {
    contains_any(description, MISSED_PAYMENT_KEYWORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_keywords() {
        assert!(is_loan_payment("HSBC MORTGAGE DD"));
        assert!(is_loan_payment("Amex Credit Card payment"));
        assert!(is_loan_payment("Car Finance Ltd"));
        assert!(!is_loan_payment("Tesco Stores"));
    }

    #[test]
    fn test_substring_matches_inside_words() {
        // "emi" is a plain substring rule
        assert!(is_loan_payment("Premier Inn"));
    }

    #[test]
    fn test_missed_payment_keywords() {
        assert!(is_missed_payment("UNPAID ITEM - BOUNCED DD"));
        assert!(is_missed_payment("Late Fee"));
        assert!(is_missed_payment("Overdraft interest"));
        assert!(!is_missed_payment("Salary"));
    }
}
