use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("Unknown statement layout: {0} (expected one of: regex-line, tabular, token-columns, signed-running)")]
    UnknownLayout(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
