//! Spreadsheet decoding
//!
//! Reads the first worksheet of an `.xlsx` upload into a header row plus
//! untyped data rows. Typing happens later in [`crate::record`], once the
//! header has been validated against the feature schema.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use tracing::{debug, warn};

use crate::{Error, Result};

/// A single spreadsheet cell, before schema typing
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    /// Excel serial date (days since 1899-12-30, fractional part is time of day)
    DateTime(f64),
}

impl Cell {
    /// Cell rendered as text for error messages
    pub fn display_value(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(serial) => serial.to_string(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => {
                warn!("Spreadsheet cell error: {:?}", e);
                Cell::Empty
            }
        }
    }
}

/// Tabular upload: header row plus data rows of equal width
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset, padding short rows with [`Cell::Empty`]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, Cell::Empty);
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Decode the first worksheet of an `.xlsx` workbook
    ///
    /// The first row is the header; every following row is data.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
            .map_err(|e| Error::Spreadsheet(format!("Failed to open workbook: {}", e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::Spreadsheet("Workbook contains no worksheets".to_string()))?
            .map_err(|e| Error::Spreadsheet(format!("Failed to read worksheet: {}", e)))?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| Error::Spreadsheet("Worksheet is empty".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                Data::String(s) => s.trim().to_string(),
                other => other.to_string().trim().to_string(),
            })
            .collect();

        let rows: Vec<Vec<Cell>> = rows
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();

        debug!(
            "Decoded worksheet: {} columns, {} data rows",
            headers.len(),
            rows.len()
        );

        Ok(Self::new(headers, rows))
    }

    /// Position of the column named `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
