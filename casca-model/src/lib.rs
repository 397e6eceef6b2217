//! casca-model: loan-approval classifier over statement features, with
//! permutation-based attribution of each decision.

pub mod error;
pub mod explain;
pub mod forest;
pub mod schema;
pub mod scorer;
pub mod tree;

pub use error::{ModelError, Result};
pub use explain::{rank_attributions, Attribution, PermutationExplainer, DEFAULT_PERMUTATIONS};
pub use forest::{ForestConfig, MaxFeatures, RandomForest};
pub use schema::FeatureSchema;
pub use scorer::{Decision, LoanScorer, ScoreResult, ScorerConfig};
pub use tree::DecisionTree;
