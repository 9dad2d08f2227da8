//! Editable table grid model.
//!
//! Stored as a bare array of string rows. Rows may be ragged after legacy
//! column deletes; the first row defines the nominal width.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    RowOutOfRange(usize),
    CellOutOfRange { row: usize, column: usize },
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowOutOfRange(row) => write!(f, "row {row} is out of range"),
            Self::CellOutOfRange { row, column } => {
                write!(f, "cell ({row}, {column}) is out of range")
            }
        }
    }
}

impl Error for GridError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableGrid {
    rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the first row, or 1 for an empty grid.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(1, |row| row.len().max(1))
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn add_row(&mut self) {
        let width = self.column_count();
        self.rows.push(vec![String::new(); width]);
    }

    pub fn add_column(&mut self) {
        for row in &mut self.rows {
            row.push(String::new());
        }
    }

    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        value: impl Into<String>,
    ) -> Result<(), GridError> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(column))
            .ok_or(GridError::CellOutOfRange { row, column })?;
        *cell = value.into();
        Ok(())
    }

    pub fn remove_row(&mut self, row: usize) -> Result<Vec<String>, GridError> {
        if row >= self.rows.len() {
            return Err(GridError::RowOutOfRange(row));
        }
        Ok(self.rows.remove(row))
    }

    /// Removes `column` from every row long enough to have it.
    /// Returns how many cells were removed.
    pub fn remove_column(&mut self, column: usize) -> usize {
        let mut removed = 0;
        for row in &mut self.rows {
            if column < row.len() {
                row.remove(column);
                removed += 1;
            }
        }
        removed
    }
}
