//! Sensor record typing and feature projection
//!
//! A validated [`Dataset`] is reduced to the sixteen schema columns, in
//! schema order, and every cell is typed. Cells that do not fit their column
//! are rejected here with [`Error::InvalidCell`] rather than being handed to
//! the classifier.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::dataset::{Cell, Dataset};
use crate::schema::{self, FEATURE_COLUMNS, FEATURE_COUNT};
use crate::{Error, Result};

/// One typed row of engine telemetry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorRecord {
    /// Original 0-based data row index in the upload
    pub row_index: usize,
    pub timestamp: NaiveDateTime,
    pub engine_id: i64,
    pub rpm: f64,
    pub oil_pressure: f64,
    pub oil_temp: f64,
    pub fuel_pressure: f64,
    pub coolant_temp: f64,
    pub vibration_level: f64,
    pub exhaust_gas_temp: f64,
    pub engine_load: f64,
    pub ambient_temp: f64,
    pub humidity: f64,
    pub altitude: f64,
    pub hours_since_maintenance: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl SensorRecord {
    /// Feature vector in schema order
    ///
    /// The timestamp is encoded as Unix seconds.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.timestamp.and_utc().timestamp() as f64,
            self.engine_id as f64,
            self.rpm,
            self.oil_pressure,
            self.oil_temp,
            self.fuel_pressure,
            self.coolant_temp,
            self.vibration_level,
            self.exhaust_gas_temp,
            self.engine_load,
            self.ambient_temp,
            self.humidity,
            self.altitude,
            self.hours_since_maintenance,
            self.latitude,
            self.longitude,
        ]
    }

    /// Type one projected row (cells in schema order)
    fn from_projected(row_index: usize, cells: [&Cell; FEATURE_COUNT]) -> Result<Self> {
        let num = |i: usize| number_cell(row_index, FEATURE_COLUMNS[i], cells[i]);

        Ok(Self {
            row_index,
            timestamp: timestamp_cell(row_index, FEATURE_COLUMNS[0], cells[0])?,
            engine_id: integer_cell(row_index, FEATURE_COLUMNS[1], cells[1])?,
            rpm: num(2)?,
            oil_pressure: num(3)?,
            oil_temp: num(4)?,
            fuel_pressure: num(5)?,
            coolant_temp: num(6)?,
            vibration_level: num(7)?,
            exhaust_gas_temp: num(8)?,
            engine_load: num(9)?,
            ambient_temp: num(10)?,
            humidity: num(11)?,
            altitude: num(12)?,
            hours_since_maintenance: num(13)?,
            latitude: num(14)?,
            longitude: num(15)?,
        })
    }
}

/// Projected batch handed to the classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureTable {
    pub columns: [&'static str; FEATURE_COUNT],
    pub rows: Vec<[f64; FEATURE_COUNT]>,
}

impl FeatureTable {
    pub fn from_records(records: &[SensorRecord]) -> Self {
        Self {
            columns: FEATURE_COLUMNS,
            rows: records.iter().map(SensorRecord::features).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reduce a dataset to typed sensor records
///
/// Extra columns are dropped; the header must already cover the schema,
/// otherwise a [`schema::SchemaError`] is returned.
pub fn project(dataset: &Dataset) -> Result<Vec<SensorRecord>> {
    schema::validate_columns(&dataset.headers)?;

    let mut positions = [0usize; FEATURE_COUNT];
    for (slot, column) in positions.iter_mut().zip(FEATURE_COLUMNS) {
        // validate_columns guarantees presence
        *slot = dataset
            .column_index(column)
            .ok_or_else(|| schema::SchemaError { missing: vec![column] })?;
    }

    dataset
        .rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let cells: [&Cell; FEATURE_COUNT] =
                std::array::from_fn(|i| row.get(positions[i]).unwrap_or(&Cell::Empty));
            SensorRecord::from_projected(row_index, cells)
        })
        .collect()
}

fn invalid(row: usize, column: &'static str, cell: &Cell) -> Error {
    Error::InvalidCell {
        row,
        column,
        value: cell.display_value(),
    }
}

fn number_cell(row: usize, column: &'static str, cell: &Cell) -> Result<f64> {
    let value = match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(row, column, cell)),
    }
}

fn integer_cell(row: usize, column: &'static str, cell: &Cell) -> Result<i64> {
    let value = number_cell(row, column, cell)?;
    if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return Err(invalid(row, column, cell));
    }
    Ok(value as i64)
}

fn timestamp_cell(row: usize, column: &'static str, cell: &Cell) -> Result<NaiveDateTime> {
    let parsed = match cell {
        Cell::DateTime(serial) | Cell::Number(serial) => excel_serial_to_datetime(*serial),
        Cell::Text(s) => parse_timestamp_text(s.trim()),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(row, column, cell))
}

/// Convert an Excel serial date (1900 date system) to a timestamp
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

fn parse_timestamp_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Header with every schema column plus a trailing "notes" column
    pub(crate) fn headers_with_notes() -> Vec<String> {
        let mut headers: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        headers.push("notes".to_string());
        headers
    }

    /// Data row matching [`headers_with_notes`]
    pub(crate) fn sample_row(engine_id: i64, lat: f64, lon: f64) -> Vec<Cell> {
        vec![
            Cell::Text("2025-04-13 07:16:33".to_string()),
            Cell::Number(engine_id as f64),
            Cell::Number(1800.0),
            Cell::Number(45.0),
            Cell::Number(95.0),
            Cell::Number(50.0),
            Cell::Number(88.0),
            Cell::Number(0.35),
            Cell::Number(420.0),
            Cell::Number(70.0),
            Cell::Number(25.0),
            Cell::Number(40.0),
            Cell::Number(300.0),
            Cell::Number(120.0),
            Cell::Number(lat),
            Cell::Number(lon),
            Cell::Text("inspect filter".to_string()),
        ]
    }

    #[test]
    fn test_project_types_all_fields() {
        let dataset = Dataset::new(headers_with_notes(), vec![sample_row(7, 34.05, -118.25)]);
        let records = project(&dataset).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.row_index, 0);
        assert_eq!(r.engine_id, 7);
        assert_eq!(r.rpm, 1800.0);
        assert_eq!(r.vibration_level, 0.35);
        assert_eq!(r.latitude, 34.05);
        assert_eq!(r.longitude, -118.25);
        assert_eq!(
            r.timestamp,
            NaiveDate::from_ymd_opt(2025, 4, 13).unwrap().and_hms_opt(7, 16, 33).unwrap()
        );
    }

    #[test]
    fn test_project_ignores_column_order() {
        let mut headers = headers_with_notes();
        let mut row = sample_row(3, 1.0, 2.0);
        headers.reverse();
        row.reverse();

        let records = project(&Dataset::new(headers, vec![row])).unwrap();
        assert_eq!(records[0].engine_id, 3);
        assert_eq!(records[0].latitude, 1.0);
        assert_eq!(records[0].longitude, 2.0);
    }

    #[test]
    fn test_features_follow_schema_order() {
        let dataset = Dataset::new(headers_with_notes(), vec![sample_row(7, 34.05, -118.25)]);
        let features = project(&dataset).unwrap()[0].features();

        assert_eq!(features[1], 7.0);
        assert_eq!(features[2], 1800.0);
        assert_eq!(features[6], 88.0);
        assert_eq!(features[14], 34.05);
        assert_eq!(features[15], -118.25);
    }

    #[test]
    fn test_project_rejects_missing_column() {
        let mut headers = headers_with_notes();
        headers[6] = "coolant".to_string();
        let err = project(&Dataset::new(headers, vec![])).unwrap_err();
        assert!(matches!(err, Error::Schema(ref e) if e.missing == vec!["coolant_temp"]));
    }

    #[test]
    fn test_non_numeric_reading_rejected() {
        let mut row = sample_row(7, 34.05, -118.25);
        row[2] = Cell::Text("fast".to_string());
        let err = project(&Dataset::new(headers_with_notes(), vec![row])).unwrap_err();

        match err {
            Error::InvalidCell { row, column, value } => {
                assert_eq!(row, 0);
                assert_eq!(column, "rpm");
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_numeric_text_accepted() {
        let mut row = sample_row(7, 34.05, -118.25);
        row[3] = Cell::Text(" 44.5 ".to_string());
        let records = project(&Dataset::new(headers_with_notes(), vec![row])).unwrap();
        assert_eq!(records[0].oil_pressure, 44.5);
    }

    #[test]
    fn test_empty_cell_rejected() {
        let mut row = sample_row(7, 34.05, -118.25);
        row[15] = Cell::Empty;
        let err = project(&Dataset::new(headers_with_notes(), vec![row])).unwrap_err();
        assert!(matches!(err, Error::InvalidCell { column: "longitude", .. }));
    }

    #[test]
    fn test_fractional_engine_id_rejected() {
        let mut row = sample_row(7, 34.05, -118.25);
        row[1] = Cell::Number(7.5);
        let err = project(&Dataset::new(headers_with_notes(), vec![row])).unwrap_err();
        assert!(matches!(err, Error::InvalidCell { column: "engine_id", .. }));
    }

    #[test]
    fn test_excel_serial_timestamp() {
        // 45760.5 = 2025-04-13 12:00:00
        let mut row = sample_row(1, 0.0, 0.0);
        row[0] = Cell::DateTime(45760.5);
        let records = project(&Dataset::new(headers_with_notes(), vec![row])).unwrap();
        assert_eq!(
            records[0].timestamp,
            NaiveDate::from_ymd_opt(2025, 4, 13).unwrap().and_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_timestamp_text_formats() {
        assert!(parse_timestamp_text("2025-04-13T07:16:33Z").is_some());
        assert!(parse_timestamp_text("2025-04-13T07:16:33").is_some());
        assert!(parse_timestamp_text("2025-04-13 07:16:33.250").is_some());
        assert!(parse_timestamp_text("2025-04-13").is_some());
        assert!(parse_timestamp_text("yesterday").is_none());
    }

    #[test]
    fn test_row_index_preserved() {
        let rows = vec![sample_row(1, 0.0, 0.0), sample_row(2, 0.0, 0.0), sample_row(3, 0.0, 0.0)];
        let records = project(&Dataset::new(headers_with_notes(), rows)).unwrap();
        let indices: Vec<usize> = records.iter().map(|r| r.row_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        let ids: Vec<i64> = records.iter().map(|r| r.engine_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_feature_table_from_records() {
        let rows = vec![sample_row(1, 0.0, 0.0), sample_row(2, 0.0, 0.0)];
        let records = project(&Dataset::new(headers_with_notes(), rows)).unwrap();
        let table = FeatureTable::from_records(&records);
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns, FEATURE_COLUMNS);
        assert_eq!(table.rows[1][1], 2.0);
    }
}
