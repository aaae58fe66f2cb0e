//! Per-row render descriptors
//!
//! Plotting and mapping happen in the browser; this module only decides what
//! to draw. Every descriptor is a pure function of one classified row.

use serde::Serialize;

use crate::classifier::ClassifiedRecord;
use crate::status::HealthStatus;

/// Zoom level for every engine location map
pub const MAP_ZOOM: u8 = 12;
/// Pixel height of both visualizations
pub const PLOT_HEIGHT: u32 = 400;

/// Single-point 3D scatter of rpm / vibration / engine load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub z_title: &'static str,
    pub trace_name: &'static str,
    pub marker_size: u32,
    pub marker_color: &'static str,
    pub height: u32,
}

/// Map centered on one engine marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// (latitude, longitude)
    pub center: (f64, f64),
    pub zoom: u8,
    pub marker: (f64, f64),
    pub popup: String,
    pub height: u32,
}

/// Everything displayed for one classified row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub row_index: usize,
    pub engine_id: i64,
    pub prediction: i64,
    pub status: HealthStatus,
    pub label: &'static str,
    pub badge: &'static str,
    /// e.g. "Engine ID: 7 - Health Status: 🔴 CRITICAL"
    pub status_line: String,
    pub scatter: Scatter3d,
    pub map: MapView,
}

pub fn render_row(classified: &ClassifiedRecord) -> RowView {
    let record = &classified.record;
    let status = HealthStatus::from_code(classified.prediction);

    RowView {
        row_index: record.row_index,
        engine_id: record.engine_id,
        prediction: classified.prediction,
        status,
        label: status.label(),
        badge: status.badge(),
        status_line: status_line(record.engine_id, status.badge()),
        scatter: scatter(record.rpm, record.vibration_level, record.engine_load),
        map: location_map(record.latitude, record.longitude),
    }
}

/// Render all rows, preserving upload order
pub fn render_all(classified: &[ClassifiedRecord]) -> Vec<RowView> {
    classified.iter().map(render_row).collect()
}

pub fn status_line(engine_id: i64, badge: &str) -> String {
    format!("Engine ID: {} - Health Status: {}", engine_id, badge)
}

fn scatter(rpm: f64, vibration: f64, engine_load: f64) -> Scatter3d {
    Scatter3d {
        x: rpm,
        y: vibration,
        z: engine_load,
        x_title: "RPM",
        y_title: "Vibration",
        z_title: "Engine Load",
        trace_name: "Sensor",
        marker_size: 10,
        marker_color: "red",
        height: PLOT_HEIGHT,
    }
}

fn location_map(lat: f64, lon: f64) -> MapView {
    MapView {
        center: (lat, lon),
        zoom: MAP_ZOOM,
        marker: (lat, lon),
        popup: format!("Latitude: {}, Longitude: {}", lat, lon),
        height: PLOT_HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::record::project;
    use crate::record::tests::{headers_with_notes, sample_row};

    fn classified(engine_id: i64, prediction: i64, lat: f64, lon: f64) -> ClassifiedRecord {
        let dataset = Dataset::new(headers_with_notes(), vec![sample_row(engine_id, lat, lon)]);
        let record = project(&dataset).unwrap().remove(0);
        ClassifiedRecord { record, prediction }
    }

    #[test]
    fn test_critical_status_line() {
        let view = render_row(&classified(7, 2, 0.0, 0.0));
        assert_eq!(view.status_line, "Engine ID: 7 - Health Status: 🔴 CRITICAL");
        assert_eq!(view.label, "critical");
        assert_eq!(view.status, HealthStatus::Critical);
    }

    #[test]
    fn test_warning_status_line() {
        let view = render_row(&classified(3, 1, 0.0, 0.0));
        assert_eq!(view.status_line, "Engine ID: 3 - Health Status: 🟡 WARNING");
    }

    #[test]
    fn test_unknown_code_renders() {
        let view = render_row(&classified(5, 9, 0.0, 0.0));
        assert_eq!(view.label, "unknown");
        assert_eq!(view.status_line, "Engine ID: 5 - Health Status: ❓ UNKNOWN");
    }

    #[test]
    fn test_map_descriptor() {
        let view = render_row(&classified(1, 0, 34.05, -118.25));
        assert_eq!(view.map.center, (34.05, -118.25));
        assert_eq!(view.map.marker, (34.05, -118.25));
        assert_eq!(view.map.zoom, 12);
        assert!(view.map.popup.contains("34.05"));
        assert!(view.map.popup.contains("-118.25"));
        assert_eq!(view.map.popup, "Latitude: 34.05, Longitude: -118.25");
    }

    #[test]
    fn test_scatter_descriptor() {
        let view = render_row(&classified(1, 0, 0.0, 0.0));
        let s = &view.scatter;
        assert_eq!((s.x, s.y, s.z), (1800.0, 0.35, 70.0));
        assert_eq!((s.x_title, s.y_title, s.z_title), ("RPM", "Vibration", "Engine Load"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let row = classified(7, 2, 34.05, -118.25);
        assert_eq!(render_row(&row), render_row(&row));
    }

    #[test]
    fn test_render_all_keeps_order() {
        let rows = vec![classified(4, 0, 0.0, 0.0), classified(2, 1, 0.0, 0.0)];
        let ids: Vec<i64> = render_all(&rows).iter().map(|v| v.engine_id).collect();
        assert_eq!(ids, vec![4, 2]);
    }
}
