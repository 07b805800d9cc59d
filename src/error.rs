use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid OCR payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build pattern: {0}")]
    Pattern(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}
