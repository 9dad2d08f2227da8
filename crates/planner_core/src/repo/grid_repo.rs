//! Table grid persistence.

use crate::model::grid::TableGrid;
use crate::repo::kv_store::{KeyValueStore, RepoResult, GRID_KEY};
use log::warn;

pub trait GridRepository {
    fn load_grid(&self) -> RepoResult<TableGrid>;
    fn save_grid(&self, grid: &TableGrid) -> RepoResult<()>;
}

pub struct KvGridRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvGridRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> GridRepository for KvGridRepository<S> {
    /// Missing or malformed grids load as an empty grid.
    fn load_grid(&self) -> RepoResult<TableGrid> {
        let Some(raw) = self.store.get(GRID_KEY)? else {
            return Ok(TableGrid::default());
        };
        match serde_json::from_str(&raw) {
            Ok(grid) => Ok(grid),
            Err(err) => {
                warn!("event=grid_load module=repo status=error error_code=malformed_grid error={err}");
                Ok(TableGrid::default())
            }
        }
    }

    fn save_grid(&self, grid: &TableGrid) -> RepoResult<()> {
        let raw = serde_json::to_string(grid)?;
        self.store.set(GRID_KEY, &raw)
    }
}
