//! Loan scorer: a classifier trained once on labelled entities, then used
//! read-only to decide and explain new statements.

use casca_features::{FeatureVector, TrainingTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::error::{ModelError, Result};
use crate::explain::{rank_attributions, Attribution, PermutationExplainer, DEFAULT_PERMUTATIONS};
use crate::forest::{ForestConfig, RandomForest};
use crate::schema::FeatureSchema;

/// Explanations returned per decision.
pub const TOP_EXPLANATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub forest: ForestConfig,
    /// Feature orderings sampled per attribution
    pub permutations: usize,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            permutations: DEFAULT_PERMUTATIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Approved,
    Denied,
}

impl Decision {
    pub fn from_label(approved: bool) -> Self {
        if approved {
            Decision::Approved
        } else {
            Decision::Denied
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approved => f.write_str("Approved"),
            Decision::Denied => f.write_str("Denied"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub decision: Decision,
    /// Class-1 (approved) probability
    pub probability: f64,
    /// Every schema feature, largest absolute attribution first
    pub attributions: Vec<Attribution>,
    /// Up to three human-readable lines for the top attributions
    pub explanations: Vec<String>,
}

/// Immutable after [`LoanScorer::train`]; share it by reference.
#[derive(Debug, Clone)]
pub struct LoanScorer {
    schema: FeatureSchema,
    forest: RandomForest,
    explainer: PermutationExplainer,
}

impl LoanScorer {
    /// Fit on every row of a labelled training table. Undefined cells train as 0.
    pub fn train(table: &TrainingTable, config: &ScorerConfig) -> Result<Self> {
        if table.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        let schema = FeatureSchema::new(table.columns().to_vec());

        let mut x = Vec::with_capacity(table.len());
        let mut y = Vec::with_capacity(table.len());
        for row in table.rows() {
            let label = row
                .label
                .ok_or_else(|| ModelError::MissingLabel(row.entity.clone()))?;
            x.push(schema.reindex(&table.row_vector(row)));
            y.push(label);
        }

        let forest = RandomForest::fit(&x, &y, &config.forest)?;
        let explainer = PermutationExplainer::new(x, config.permutations, config.forest.seed);

        info!(
            entities = table.len(),
            approved = y.iter().filter(|l| **l).count(),
            features = schema.len(),
            "trained loan scorer"
        );
        Ok(Self {
            schema,
            forest,
            explainer,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Decision only, no attribution.
    pub fn predict(&self, vector: &FeatureVector) -> Decision {
        Decision::from_label(self.forest.predict(&self.schema.reindex(vector)))
    }

    /// Decide on one entity and explain the decision.
    pub fn score(&self, vector: &FeatureVector) -> ScoreResult {
        let unknown = self.schema.unknown_names(vector);
        if !unknown.is_empty() {
            debug!(?unknown, "ignoring features outside the training schema");
        }

        let x = self.schema.reindex(vector);
        let probability = self.forest.predict_proba(&x);
        let decision = Decision::from_label(self.forest.predict(&x));

        let scores = self
            .explainer
            .explain(|row| self.forest.predict_proba(row), &x);
        let attributions = rank_attributions(self.schema.columns(), &scores);
        let explanations = attributions
            .iter()
            .take(TOP_EXPLANATIONS)
            .map(|a| format!("{} had a significant impact", a.feature))
            .collect();

        debug!(%decision, probability, "scored entity");
        ScoreResult {
            decision,
            probability,
            attributions,
            explanations,
        }
    }
}
