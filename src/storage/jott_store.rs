//! File-backed jott store
//!
//! Jotts live in `.jframe/jotts.jsonl`, one JSON object per line, sorted by
//! id for git-friendly diffs. All mutations run under the store's exclusive
//! lock; `record_view` holds it across the read and the rewrite so
//! concurrent viewers never lose an increment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::{Jott, JottId, UserId};
use crate::service::{DocumentStore, StoreError};

use super::jsonl::{read_records, write_records, Flock};

/// Store for jott documents in JSONL format
pub struct FileJottStore {
    path: PathBuf,
}

impl FileJottStore {
    /// Creates a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a workspace
    pub fn for_workspace(root: &Path) -> Self {
        Self::new(root.join(".jframe").join("jotts.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<HashMap<JottId, Jott>, StoreError> {
        let records: Vec<Jott> = read_records(&self.path)?;
        Ok(records.into_iter().map(|j| (j.id.clone(), j)).collect())
    }

    fn write_map(&self, jotts: &HashMap<JottId, Jott>) -> Result<(), StoreError> {
        let mut sorted: Vec<_> = jotts.values().collect();
        sorted.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));
        write_records(&self.path, sorted)
    }
}

impl DocumentStore for FileJottStore {
    fn insert(&self, jott: &Jott) -> Result<(), StoreError> {
        let _lock = Flock::exclusive(&self.path)?;

        let mut jotts = self.read_map()?;
        if jotts.contains_key(&jott.id) {
            return Err(StoreError::Unavailable(format!(
                "jott {} already exists",
                jott.id
            )));
        }
        jotts.insert(jott.id.clone(), jott.clone());
        self.write_map(&jotts)
    }

    fn find(&self, id: &JottId) -> Result<Option<Jott>, StoreError> {
        let _lock = Flock::shared(&self.path)?;
        Ok(self.read_map()?.remove(id))
    }

    fn update(&self, jott: &Jott) -> Result<(), StoreError> {
        let _lock = Flock::exclusive(&self.path)?;

        let mut jotts = self.read_map()?;
        if !jotts.contains_key(&jott.id) {
            return Err(StoreError::Unavailable(format!("no such jott {}", jott.id)));
        }
        jotts.insert(jott.id.clone(), jott.clone());
        self.write_map(&jotts)
    }

    fn remove(&self, id: &JottId) -> Result<bool, StoreError> {
        let _lock = Flock::exclusive(&self.path)?;

        let mut jotts = self.read_map()?;
        let removed = jotts.remove(id).is_some();
        if removed {
            self.write_map(&jotts)?;
        }
        Ok(removed)
    }

    fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Jott>, StoreError> {
        let _lock = Flock::shared(&self.path)?;

        let jotts = self.read_map()?;
        Ok(jotts
            .into_values()
            .filter(|j| j.is_owned_by(owner))
            .collect())
    }

    fn record_view(&self, id: &JottId) -> Result<Option<u64>, StoreError> {
        let _lock = Flock::exclusive(&self.path)?;

        let mut jotts = self.read_map()?;
        let Some(jott) = jotts.get_mut(id) else {
            return Ok(None);
        };

        jott.view_count += 1;
        let count = jott.view_count;
        self.write_map(&jotts)?;

        Ok(Some(count))
    }
}
