use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No label for entity: {0}")]
    MissingLabel(String),

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("Training table has no {0} column")]
    MissingColumn(&'static str),

    #[error("Bad label for entity {entity}: {value}")]
    BadLabel { entity: String, value: String },
}

pub type Result<T> = std::result::Result<T, FeatureError>;
