//! Feature schema: the ordered columns a model was trained on.

use casca_features::FeatureVector;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn name(&self, idx: usize) -> Option<&str> {
        self.columns.get(idx).map(String::as_str)
    }

    /// Align a vector with the schema column-for-column.
    ///
    /// Columns the vector lacks, and undefined values, become 0.0; names the
    /// schema does not know are dropped.
    pub fn reindex(&self, vector: &FeatureVector) -> Vec<f64> {
        self.columns
            .iter()
            .map(|c| vector.value(c).unwrap_or(0.0))
            .collect()
    }

    /// Names in `vector` the schema does not use.
    pub fn unknown_names<'a>(&self, vector: &'a FeatureVector) -> Vec<&'a str> {
        vector
            .names()
            .filter(|n| !self.columns.iter().any(|c| c == n))
            .collect()
    }
}
