//! casca-ingest: bank-statement PDF ingestion and layout-specific transaction parsers.

pub mod amount;
pub mod error;
pub mod export;
pub mod parsers;
pub mod pdf;
pub mod types;

pub use error::{IngestError, Result};
pub use export::{read_table_csv, write_table_csv, write_table_csv_path};
pub use parsers::{parse_statement_pdf, parse_statement_text, ParseOptions};
pub use types::{ParseOutcome, SkippedLine, StatementLayout, TransactionRecord, TransactionTable};
