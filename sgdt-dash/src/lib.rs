//! sgdt-dash library - SMARTGUARD Digital Twin dashboard
//!
//! Single-page web UI: upload an engine sensor spreadsheet, classify every
//! row with the loaded model, and render per-row health status, a 3D sensor
//! scatter and a location map.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sgdt_common::Classifier;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
///
/// The classifier is loaded once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    /// Largest accepted upload body, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>, max_upload_bytes: usize) -> Self {
        Self {
            classifier,
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/style.css", get(api::serve_style_css))
        .route("/api/upload", post(api::upload_spreadsheet))
        .route("/api/clock", get(api::clock_stream))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
