//! Decoded appliance responses
//!
//! The appliance answers every operation with a table. Row 0 may carry marker
//! cells (`error`, `message`, `found`) describing the outcome; data rows follow.

use serde::{Deserialize, Serialize};

/// Column holding the appliance's error flag in row 0
pub const ERROR_KEY: &str = "error";
/// Column holding the appliance's error text in row 0
pub const MESSAGE_KEY: &str = "message";
/// Column holding the lookup result flag in row 0
pub const FOUND_KEY: &str = "found";

const MARKER_KEYS: [&str; 3] = [ERROR_KEY, MESSAGE_KEY, FOUND_KEY];

/// One table row: named cells in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    /// An empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing the value in place if the name already exists
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(n, _)| *n == name) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((name, value)),
        }
    }

    /// Value of the named cell
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the named cell is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells as `(name, value)` pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// True when every cell is a status marker rather than data
    pub fn is_marker(&self) -> bool {
        !self.is_empty() && self.cells.iter().all(|(n, _)| MARKER_KEYS.contains(&n.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

/// The outcome of one submitted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CamResponse {
    status_code: u16,
    rows: Vec<Row>,
    error: bool,
    error_text: Option<String>,
}

impl CamResponse {
    /// Build a response, deriving the error flag from row 0
    pub fn from_rows(status_code: u16, rows: Vec<Row>) -> Self {
        let marker = rows.first();
        let error = marker
            .and_then(|row| row.get(ERROR_KEY))
            .is_some_and(is_truthy);
        let error_text = if error {
            marker
                .and_then(|row| row.get(MESSAGE_KEY))
                .map(str::to_string)
        } else {
            None
        };

        Self {
            status_code,
            rows,
            error,
            error_text,
        }
    }

    /// HTTP status of the exchange
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Decoded rows, marker row included
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Take ownership of the rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Whether row 0 carried a truthy error marker
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Message the appliance sent with the error marker
    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }
}

pub(crate) fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}
