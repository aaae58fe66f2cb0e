//! Model served over HTTP
//!
//! Request: `POST {endpoint}` with `{"columns": [...], "rows": [[...], ...]}`.
//! Response: `{"predictions": [int, ...]}`, one per row.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Classifier, ClassifierError};
use crate::record::FeatureTable;

fn default_timeout_secs() -> u64 {
    30
}

/// Remote model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteModel {
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<i64>,
}

/// Classifier backed by a model server
///
/// Uses the blocking client; callers on an async runtime must invoke
/// [`Classifier::predict`] from a blocking-capable thread. The client is
/// built once, on the first prediction, because constructing it inside an
/// async context panics.
#[derive(Debug)]
pub struct RemoteClassifier {
    endpoint: Url,
    timeout: Duration,
    name: String,
    client: OnceLock<Client>,
}

impl RemoteClassifier {
    pub fn new(model: RemoteModel) -> Result<Self, ClassifierError> {
        let endpoint = Url::parse(&model.endpoint).map_err(|e| {
            ClassifierError::MalformedModel(format!("invalid endpoint '{}': {}", model.endpoint, e))
        })?;
        if model.timeout_secs == 0 {
            return Err(ClassifierError::MalformedModel(
                "timeout_secs must be positive".to_string(),
            ));
        }
        let name = format!("remote ({})", endpoint);
        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(model.timeout_secs),
            name,
            client: OnceLock::new(),
        })
    }

    fn client(&self) -> Result<&Client, ClassifierError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClassifierError::Service(e.to_string()))?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl Classifier for RemoteClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, table: &FeatureTable) -> Result<Vec<i64>, ClassifierError> {
        let service = |e: reqwest::Error| ClassifierError::Service(e.to_string());

        let client = self.client()?;

        debug!("POST {} ({} rows)", self.endpoint, table.len());
        let response = client
            .post(self.endpoint.clone())
            .json(table)
            .send()
            .map_err(service)?
            .error_for_status()
            .map_err(service)?;

        let body: PredictResponse = response.json().map_err(service)?;
        Ok(body.predictions)
    }
}
