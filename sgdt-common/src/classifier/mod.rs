//! Classification adapter and classifier boundary
//!
//! The model is an opaque capability: one batch `predict` over the projected
//! feature table, one integer label per row, same order. Concrete models are
//! described by a JSON artifact loaded once at startup (see [`load_classifier`]).

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::record::{FeatureTable, SensorRecord};
use crate::Result;

mod linear;
mod remote;

pub use linear::{LinearClassifier, LinearModel};
pub use remote::{RemoteClassifier, RemoteModel};

/// Failure raised by a classifier on a feature table
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Input the model cannot score (non-finite values, wrong width)
    #[error("Rejected input: {0}")]
    InvalidInput(String),

    /// Model artifact is internally inconsistent
    #[error("Malformed model: {0}")]
    MalformedModel(String),

    /// Remote model server could not be reached or answered badly
    #[error("Model service error: {0}")]
    Service(String),

    /// Model answered with the wrong number of labels
    #[error("Expected {expected} predictions, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Batch classifier over the fixed feature schema
pub trait Classifier: Send + Sync {
    /// Short human-readable model description for logs and health output
    fn name(&self) -> &str;

    /// Predict one label per row of `table`, in row order
    fn predict(&self, table: &FeatureTable) -> std::result::Result<Vec<i64>, ClassifierError>;
}

/// Sensor record with its classification result attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    pub record: SensorRecord,
    pub prediction: i64,
}

/// Classify all records with a single batch call
///
/// Returns one [`ClassifiedRecord`] per input record in input order. An empty
/// batch never reaches the classifier.
pub fn classify(
    records: Vec<SensorRecord>,
    classifier: &dyn Classifier,
) -> Result<Vec<ClassifiedRecord>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let table = FeatureTable::from_records(&records);
    debug!("Classifying {} rows with {}", table.len(), classifier.name());

    let predictions = classifier.predict(&table)?;
    if predictions.len() != records.len() {
        return Err(ClassifierError::LengthMismatch {
            expected: records.len(),
            actual: predictions.len(),
        }
        .into());
    }

    Ok(records
        .into_iter()
        .zip(predictions)
        .map(|(record, prediction)| ClassifiedRecord { record, prediction })
        .collect())
}

/// Serialized model description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// In-process multinomial linear model
    Linear(LinearModel),
    /// Model served over HTTP
    Remote(RemoteModel),
}

impl ModelArtifact {
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>> {
        Ok(match self {
            ModelArtifact::Linear(model) => Arc::new(LinearClassifier::new(model)?),
            ModelArtifact::Remote(model) => Arc::new(RemoteClassifier::new(model)?),
        })
    }
}

/// Load the model artifact at `path` and build its classifier
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>> {
    let content = std::fs::read_to_string(path)?;
    let artifact: ModelArtifact = serde_json::from_str(&content)?;
    let classifier = artifact.into_classifier()?;
    info!("Loaded model {} from {}", classifier.name(), path.display());
    Ok(classifier)
}
