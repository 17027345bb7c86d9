use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::store::operations::trees::NewTree;
use crate::store::operations::users::User;
use crate::store::{Store, StoreError};

/// Fixture document: owners first, then their trees.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub trees: Vec<NewTree>,
}

impl Store {
    pub fn load_seed(&self, seed: &SeedData) -> Result<usize, StoreError> {
        self.upsert_users(&seed.users)?;
        self.insert_trees(&seed.trees)
    }

    /// Load a JSON seed file into an empty store. A store that already holds
    /// trees is left untouched and `Ok(0)` is returned.
    pub fn seed_if_empty(&self, path: &Path) -> Result<usize, StoreError> {
        if self.count_trees()? > 0 {
            tracing::info!(path = %path.display(), "Store already populated, skipping seed");
            return Ok(0);
        }
        let raw = std::fs::read(path)?;
        let seed: SeedData = serde_json::from_slice(&raw)?;
        let loaded = self.load_seed(&seed)?;
        tracing::info!(path = %path.display(), users = seed.users.len(), trees = loaded, "Seeded store");
        Ok(loaded)
    }
}
