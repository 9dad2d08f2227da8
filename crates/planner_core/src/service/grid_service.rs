//! Table grid use-case service.
//!
//! Models the one-shot delete modes of the planner table: arming a row or
//! column delete makes the next cell click delete that row or column and
//! disarm; any other click opens the cell for editing.

use crate::model::grid::{GridError, TableGrid};
use crate::repo::grid_repo::GridRepository;
use crate::repo::kv_store::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum GridServiceError {
    Grid(GridError),
    Repo(RepoError),
}

impl Display for GridServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grid(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GridServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<GridError> for GridServiceError {
    fn from(value: GridError) -> Self {
        Self::Grid(value)
    }
}

impl From<RepoError> for GridServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    #[default]
    Off,
    Row,
    Column,
}

/// What a cell click resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    RowDeleted(usize),
    ColumnDeleted(usize),
    /// The click hit no cell; any armed mode is now off.
    Missed,
    EditCell { row: usize, column: usize },
}

pub struct GridService<R: GridRepository> {
    repo: R,
    grid: TableGrid,
    mode: DeleteMode,
}

impl<R: GridRepository> GridService<R> {
    /// Loads the stored grid.
    pub fn new(repo: R) -> Result<Self, GridServiceError> {
        let grid = repo.load_grid()?;
        Ok(Self {
            repo,
            grid,
            mode: DeleteMode::Off,
        })
    }

    pub fn grid(&self) -> &TableGrid {
        &self.grid
    }

    pub fn mode(&self) -> DeleteMode {
        self.mode
    }

    pub fn add_row(&mut self) -> Result<(), GridServiceError> {
        self.grid.add_row();
        self.persist()
    }

    pub fn add_column(&mut self) -> Result<(), GridServiceError> {
        self.grid.add_column();
        self.persist()
    }

    /// Commits an edited cell value.
    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        value: impl Into<String>,
    ) -> Result<(), GridServiceError> {
        self.grid.set_cell(row, column, value)?;
        self.persist()
    }

    /// The next click deletes the clicked row.
    pub fn arm_row_delete(&mut self) {
        self.mode = DeleteMode::Row;
    }

    /// The next click deletes the clicked column.
    pub fn arm_column_delete(&mut self) {
        self.mode = DeleteMode::Column;
    }

    pub fn disarm(&mut self) {
        self.mode = DeleteMode::Off;
    }

    /// Resolves a click on cell (`row`, `column`) against the current mode.
    pub fn click(&mut self, row: usize, column: usize) -> Result<ClickOutcome, GridServiceError> {
        let mode = std::mem::take(&mut self.mode);
        match mode {
            DeleteMode::Row => {
                if self.grid.remove_row(row).is_err() {
                    return Ok(ClickOutcome::Missed);
                }
                self.persist()?;
                info!("event=grid_row_delete module=service status=ok rows={}", self.grid.row_count());
                Ok(ClickOutcome::RowDeleted(row))
            }
            DeleteMode::Column => {
                if self.grid.remove_column(column) == 0 {
                    return Ok(ClickOutcome::Missed);
                }
                self.persist()?;
                info!("event=grid_column_delete module=service status=ok");
                Ok(ClickOutcome::ColumnDeleted(column))
            }
            DeleteMode::Off if self.grid.cell(row, column).is_some() => {
                Ok(ClickOutcome::EditCell { row, column })
            }
            DeleteMode::Off => Ok(ClickOutcome::Missed),
        }
    }

    fn persist(&self) -> Result<(), GridServiceError> {
        self.repo.save_grid(&self.grid)?;
        Ok(())
    }
}
