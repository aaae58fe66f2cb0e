//! # SMARTGUARD Digital Twin Common Library
//!
//! Shared code for the SMARTGUARD dashboard including:
//! - Feature schema and column validation
//! - Spreadsheet decoding and sensor record typing
//! - Classifier boundary (model artifacts, batch prediction)
//! - Health status mapping and per-row render descriptors
//! - Configuration loading
//! - Clock and SSE utilities

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod schema;
pub mod sse;
pub mod status;
pub mod time;

pub use classifier::{Classifier, ClassifiedRecord};
pub use dataset::{Cell, Dataset};
pub use error::{Error, Result};
pub use record::SensorRecord;
pub use render::RowView;
pub use status::HealthStatus;
