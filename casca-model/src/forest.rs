//! Random forest: bagged CART trees with per-node feature sub-sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ModelError, Result};
use crate::tree::DecisionTree;

/// How many features each node considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaxFeatures {
    All,
    Sqrt,
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Count(k) => (*k).min(n_features),
        };
        n.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_features: MaxFeatures,
    /// Draw each tree's rows with replacement
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit on row-major `x` with binary labels `y` (`true` = class 1).
    pub fn fit(x: &[Vec<f64>], y: &[bool], config: &ForestConfig) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ModelError::EmptyTrainingSet);
        }
        let n_features = x[0].len();
        if let Some((row, r)) = x.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(ModelError::RaggedRow {
                row,
                got: r.len(),
                expected: n_features,
            });
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let max_features = config.max_features.resolve(n_features);
        let n = x.len();
        let all: Vec<usize> = (0..n).collect();

        let trees = (0..config.n_trees.max(1))
            .map(|_| {
                let samples: Vec<usize> = if config.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    all.clone()
                };
                DecisionTree::fit(x, y, &samples, max_features, &mut rng)
            })
            .collect::<Vec<_>>();

        info!(
            trees = trees.len(),
            rows = n,
            features = n_features,
            max_features,
            "fitted random forest"
        );
        Ok(Self { trees, n_features })
    }

    /// Mean class-1 probability across trees.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict_proba(row)).sum();
        total / self.trees.len() as f64
    }

    /// Class 1 only on a strict majority; a 0.5 tie goes to class 0.
    pub fn predict(&self, row: &[f64]) -> bool {
        self.predict_proba(row) > 0.5
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
