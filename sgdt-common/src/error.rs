//! Common error types for SMARTGUARD

use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::schema::SchemaError;

/// Common result type for SMARTGUARD operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the SMARTGUARD crates
#[derive(Error, Debug)]
pub enum Error {
    /// Uploaded dataset is missing required columns
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Uploaded file could not be decoded as a spreadsheet
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// A required cell could not be typed as the column demands
    #[error("Invalid value {value:?} in column '{column}' at row {row}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// The classifier rejected or mishandled the feature table
    #[error("Classification error: {0}")]
    Classification(#[from] ClassifierError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
