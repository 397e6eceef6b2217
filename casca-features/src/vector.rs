//! Named, ordered feature values.

use serde::Serialize;

/// The twelve per-entity indicators, in training-table column order.
pub const INDICATORS: [&str; 12] = [
    "Average Monthly Deposits",
    "Average Monthly Withdrawals",
    "Average Monthly Net Cash Flow",
    "Cash Flow Volatility",
    "Average Monthly Balance",
    "Months with Negative Balance",
    "Total Loan Payments",
    "Loan-to-Income Ratio",
    "Missed Payments Count",
    "Revenue Growth Rate (Last Year)",
    "Number of High-Value Transactions",
    "Highest Customer Revenue Share",
];

/// Mapping from indicator name to value, keeping insertion order.
/// `None` marks an undefined value (e.g. growth with a single year).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    entries: Vec<(String, Option<f64>)>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: Option<f64>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        self.set(name, value);
        self
    }

    /// Outer `None`: name absent. Inner `None`: present but undefined.
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Value if present and defined.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).flatten()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append (or overwrite) every entry of `other`.
    pub fn extend(&mut self, other: FeatureVector) {
        for (name, value) in other.entries {
            self.set(name, value);
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Option<f64>)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (S, Option<f64>)>>(iter: I) -> Self {
        let mut v = FeatureVector::new();
        for (name, value) in iter {
            v.set(name, value);
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut v = FeatureVector::new()
            .with("a", Some(1.0))
            .with("b", None);
        v.set("a", Some(2.0));
        assert_eq!(v.len(), 2);
        assert_eq!(v.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(v.value("a"), Some(2.0));
        assert_eq!(v.get("b"), Some(None));
        assert_eq!(v.get("c"), None);
    }

    #[test]
    fn test_extend_appends_new_names() {
        let mut v: FeatureVector = [("x", Some(1.0))].into_iter().collect();
        v.extend([("y", Some(2.0)), ("x", Some(3.0))].into_iter().collect());
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![("x", Some(3.0)), ("y", Some(2.0))]);
    }
}
