//! Error types for the credential export.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("credential payload for corp '{corp_num}' has no '{field}'")]
    Payload { corp_num: String, field: &'static str },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(String),
}
