//! In-memory table for uploaded spreadsheets: a header row plus data rows, read from `.xlsx`/`.csv`
//! and written back with extra result columns.

mod reader;
mod writer;

use std::fmt;
use std::path::Path;

use thiserror::Error;

pub use reader::read_table;
pub use writer::{column_widths, write_csv, write_table, write_xlsx};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    Read(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Spreadsheet has no sheets or no header row")]
    EmptySheet,

    #[error("Column length mismatch: table has {expected} rows, column has {actual}")]
    ColumnLength { expected: usize, actual: usize },
}

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xlsx,
    Csv,
}

impl FileFormat {
    /// Detects the format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(FileFormat::Xlsx),
            "csv" => Some(FileFormat::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Csv => "csv",
        }
    }
}

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Text cell, or `Empty` for an empty string.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    /// Whole numbers print without a decimal part (`7736207543.0` → `7736207543`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Values of a column as trimmed strings (missing cells give `""`).
    pub fn column_values(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                row.get(index)
                    .map(|c| c.to_string().trim().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Copy of the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Rewrites the numeric cells of a column as text (`7736207543.0` → `"7736207543"`).
    pub fn column_to_text(&mut self, index: usize) {
        for cell in self.rows.iter_mut().filter_map(|row| row.get_mut(index)) {
            if let Cell::Number(_) = cell {
                *cell = Cell::text(cell.to_string());
            }
        }
    }

    /// Appends a text column; `values` must have one entry per row. Short rows are padded first.
    pub fn append_column(&mut self, name: &str, values: &[String]) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        let width = self.headers.len();
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.resize(width, Cell::Empty);
            row.push(Cell::text(value.as_str()));
        }
        Ok(())
    }
}
