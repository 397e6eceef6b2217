use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("No label for entity: {0}")]
    MissingLabel(String),

    #[error("Row {row} has {got} features, expected {expected}")]
    RaggedRow { row: usize, got: usize, expected: usize },

    #[error("Feature error: {0}")]
    Feature(#[from] casca_features::FeatureError),
}

pub type Result<T> = std::result::Result<T, ModelError>;
