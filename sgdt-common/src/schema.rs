//! Feature schema and column validation
//!
//! The classifier consumes exactly these sixteen columns, in this order.
//! Uploaded spreadsheets must name every one of them in their header row;
//! extra columns are tolerated and dropped before classification.

use thiserror::Error;

/// Number of feature columns the classifier expects
pub const FEATURE_COUNT: usize = 16;

/// Required feature columns in the order the classifier consumes them
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "timestamp",
    "engine_id",
    "rpm",
    "oil_pressure",
    "oil_temp",
    "fuel_pressure",
    "coolant_temp",
    "vibration_level",
    "exhaust_gas_temp",
    "engine_load",
    "ambient_temp",
    "humidity",
    "altitude",
    "hours_since_maintenance",
    "latitude",
    "longitude",
];

/// Uploaded dataset lacks one or more required columns
///
/// The message always lists every required column so the user can fix the
/// file in one pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("❌ Uploaded file must contain all required columns:\n\n{}", FEATURE_COLUMNS.join(", "))]
pub struct SchemaError {
    /// Required columns absent from the upload, in schema order
    pub missing: Vec<&'static str>,
}

impl SchemaError {
    /// All required column names, in schema order
    pub fn required_columns(&self) -> &'static [&'static str] {
        &FEATURE_COLUMNS
    }
}

/// Required columns not present in `headers`, in schema order
///
/// Headers are compared after trimming surrounding whitespace.
pub fn missing_columns<S: AsRef<str>>(headers: &[S]) -> Vec<&'static str> {
    FEATURE_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h.as_ref().trim() == *required))
        .collect()
}

/// True when `headers` contain every required column
pub fn is_superset<S: AsRef<str>>(headers: &[S]) -> bool {
    missing_columns(headers).is_empty()
}

/// Validate that `headers` cover the feature schema
pub fn validate_columns<S: AsRef<str>>(headers: &[S]) -> Result<(), SchemaError> {
    let missing = missing_columns(headers);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { missing })
    }
}
