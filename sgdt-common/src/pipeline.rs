//! Upload pipeline: validate → project → classify → render
//!
//! Runs once per uploaded file and stops at the first failure. The only
//! blocking point is the single batch call into the classifier.

use std::collections::BTreeMap;

use tracing::debug;

use crate::classifier::{classify, Classifier};
use crate::dataset::Dataset;
use crate::render::{render_all, RowView};
use crate::status::HealthStatus;
use crate::{record, Result};

/// Process one decoded upload end to end
pub fn run_upload(dataset: &Dataset, classifier: &dyn Classifier) -> Result<Vec<RowView>> {
    // project validates the header against the feature schema
    let records = record::project(dataset)?;
    debug!("Projected {} rows", records.len());

    let classified = classify(records, classifier)?;
    Ok(render_all(&classified))
}

/// Number of rendered rows per status
pub fn status_counts(rows: &[RowView]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.label).or_insert(0) += 1;
    }
    counts
}

/// True when any row is critical
pub fn has_critical(rows: &[RowView]) -> bool {
    rows.iter().any(|r| r.status == HealthStatus::Critical)
}
