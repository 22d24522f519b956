//! Status sheet: a CSV spreadsheet with one row per scenario step.
//!
//! The sheet keeps whatever columns it already has (test case names,
//! descriptions, ...) and owns a `Status` column that is added when
//! missing. Row indices count data rows only, so row 0 is the first line
//! after the header.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::E2eResult;

/// Name of the column step results are written to.
pub const STATUS_COLUMN: &str = "Status";

/// Outcome written for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory copy of a status sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Default for StatusSheet {
    fn default() -> Self {
        Self {
            headers: vec![STATUS_COLUMN.to_string()],
            rows: Vec::new(),
        }
    }
}

impl StatusSheet {
    /// Load a sheet. A missing file yields an empty sheet.
    ///
    /// Short rows are padded with empty cells so every row has a value for
    /// every column.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read as CSV.
    pub fn load(path: &Path) -> E2eResult<Self> {
        if !path.exists() {
            debug!("Status sheet {} does not exist, starting empty", path.display());
            return Ok(Self::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)?;

        let mut headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if headers.iter().all(String::is_empty) {
            headers.clear();
        }
        if !headers.iter().any(|h| h == STATUS_COLUMN) {
            headers.push(STATUS_COLUMN.to_string());
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let mut row: Vec<String> = record?.iter().map(String::from).collect();
            row.resize(headers.len().max(row.len()), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Write the sheet, replacing the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> E2eResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn status_index(&self) -> usize {
        self.headers
            .iter()
            .position(|h| h == STATUS_COLUMN)
            .unwrap_or(self.headers.len())
    }

    /// Set the status of a data row, growing the sheet if needed.
    pub fn set_status(&mut self, row: usize, status: Status) {
        let column = self.status_index();
        if column == self.headers.len() {
            self.headers.push(STATUS_COLUMN.to_string());
        }

        let width = self.headers.len();
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, || vec![String::new(); width]);
        }
        if let Some(cells) = self.rows.get_mut(row) {
            if cells.len() <= column {
                cells.resize(column + 1, String::new());
            }
            if let Some(cell) = cells.get_mut(column) {
                *cell = status.to_string();
            }
        }
    }

    /// Status cell of a data row, if the row exists and the cell is set.
    #[must_use]
    pub fn status(&self, row: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(self.status_index()))
            .map(String::as_str)
            .filter(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load the sheet, set one row's status and write it back.
///
/// Failures are logged and otherwise ignored; a broken sheet never fails
/// a scenario step. Returns whether the sheet was updated.
pub fn record(path: &Path, row: usize, status: Status) -> bool {
    let result = StatusSheet::load(path).and_then(|mut sheet| {
        sheet.set_status(row, status);
        sheet.save(path)
    });

    match result {
        Ok(()) => {
            debug!(row, %status, "Status sheet updated");
            true
        }
        Err(e) => {
            warn!(row, %status, error = %e, "Failed to update status sheet {}", path.display());
            false
        }
    }
}
