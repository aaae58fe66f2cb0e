//! Spreadsheet upload and classification
//!
//! POST /api/upload takes one `.xlsx` file in the multipart field `file`,
//! runs it through validate → classify → render, and returns one row view
//! per data row in upload order.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use sgdt_common::{pipeline, Dataset, Error, RowView};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;

/// Multipart field carrying the spreadsheet
pub const FILE_FIELD: &str = "file";

/// Successful upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub upload_id: Uuid,
    pub file_name: String,
    pub row_count: usize,
    pub rows: Vec<RowView>,
}

/// POST /api/upload
pub async fn upload_spreadsheet(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    let upload_id = Uuid::new_v4();
    let (file_name, bytes) = read_file_field(&mut multipart).await?;

    if !is_xlsx_name(&file_name) {
        return Err(UploadError::BadRequest(format!(
            "Unsupported file '{}': upload an .xlsx spreadsheet",
            file_name
        )));
    }

    info!(%upload_id, "Received {} ({} bytes)", file_name, bytes.len());

    // Decoding and the model call are blocking work
    let classifier = state.classifier.clone();
    let rows = tokio::task::spawn_blocking(move || -> sgdt_common::Result<Vec<RowView>> {
        let dataset = Dataset::from_xlsx_bytes(&bytes)?;
        pipeline::run_upload(&dataset, classifier.as_ref())
    })
    .await
    .map_err(|e| UploadError::Internal(format!("Classification task failed: {}", e)))?
    .map_err(|e| {
        warn!(%upload_id, "Upload {} rejected: {}", file_name, e);
        UploadError::Pipeline(e)
    })?;

    info!(
        %upload_id,
        "Classified {} rows from {}: {:?}",
        rows.len(),
        file_name,
        pipeline::status_counts(&rows)
    );
    if pipeline::has_critical(&rows) {
        warn!(%upload_id, "Upload {} contains critical engines", file_name);
    }

    Ok(Json(UploadResponse {
        upload_id,
        file_name,
        row_count: rows.len(),
        rows,
    }))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok((file_name, bytes.to_vec()));
    }
    Err(UploadError::BadRequest(format!(
        "Missing multipart field '{}'",
        FILE_FIELD
    )))
}

fn is_xlsx_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".xlsx")
}

/// Upload API errors
#[derive(Debug)]
pub enum UploadError {
    BadRequest(String),
    Multipart(MultipartError),
    Pipeline(Error),
    Internal(String),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart(err)
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            UploadError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "kind": "bad_request" }),
            ),
            UploadError::Multipart(err) => (
                err.status(),
                json!({ "error": err.body_text(), "kind": "bad_request" }),
            ),
            UploadError::Pipeline(Error::Schema(err)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": err.to_string(),
                    "kind": "schema",
                    "required_columns": err.required_columns(),
                    "missing_columns": err.missing,
                }),
            ),
            UploadError::Pipeline(err @ Error::InvalidCell { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": err.to_string(), "kind": "invalid_cell" }),
            ),
            UploadError::Pipeline(err @ Error::Spreadsheet(_)) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": err.to_string(), "kind": "spreadsheet" }),
            ),
            UploadError::Pipeline(err @ Error::Classification(_)) => {
                error!("Classification failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": err.to_string(), "kind": "classification" }),
                )
            }
            UploadError::Pipeline(err) => {
                error!("Upload failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": err.to_string(), "kind": "internal" }),
                )
            }
            UploadError::Internal(message) => {
                error!("{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message, "kind": "internal" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xlsx_name_check() {
        assert!(is_xlsx_name("engines.xlsx"));
        assert!(is_xlsx_name("ENGINES.XLSX"));
        assert!(!is_xlsx_name("engines.csv"));
        assert!(!is_xlsx_name("engines.xls"));
        assert!(!is_xlsx_name(""));
    }
}
