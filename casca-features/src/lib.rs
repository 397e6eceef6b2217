//! casca-features: per-entity financial indicators aggregated from statement tables,
//! and the persisted training table built from them.

pub mod aggregator;
pub mod dates;
pub mod error;
pub mod keywords;
pub mod stats;
pub mod summary;
pub mod training;
pub mod vector;

pub use aggregator::{aggregate, monthly_summary, AggregatorConfig, FinancialFeatures, MonthlySummary};
pub use error::{FeatureError, Result};
pub use summary::StatementTotals;
pub use training::{TrainingRow, TrainingTable, LABEL_COLUMN};
pub use vector::{FeatureVector, INDICATORS};
