//! File-backed profile store
//!
//! One record per owner in `.jframe/profiles.jsonl`. An owner without a
//! record gets the default profile: free tier, 20 jotts per month.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Profile, UserId};
use crate::service::{ProfileStore, StoreError};

use super::jsonl::{read_records, write_records, Flock};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileRecord {
    owner: UserId,
    #[serde(flatten)]
    profile: Profile,
}

/// Profile store persisted as JSONL
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    /// Creates a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a workspace
    pub fn for_workspace(root: &Path) -> Self {
        Self::new(root.join(".jframe").join("profiles.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for FileProfileStore {
    fn profile(&self, owner: &UserId) -> Result<Profile, StoreError> {
        let _lock = Flock::shared(&self.path)?;

        let records: Vec<ProfileRecord> = read_records(&self.path)?;
        Ok(records
            .into_iter()
            .find(|r| &r.owner == owner)
            .map(|r| r.profile)
            .unwrap_or_default())
    }

    fn put_profile(&self, owner: &UserId, profile: &Profile) -> Result<(), StoreError> {
        let _lock = Flock::exclusive(&self.path)?;

        let mut records: Vec<ProfileRecord> = read_records(&self.path)?;
        match records.iter_mut().find(|r| &r.owner == owner) {
            Some(record) => record.profile = profile.clone(),
            None => records.push(ProfileRecord {
                owner: owner.clone(),
                profile: profile.clone(),
            }),
        }

        write_records(&self.path, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tier;
    use chrono::Utc;
    use tempfile::TempDir;

    fn owner(seed: &str) -> UserId {
        UserId::new(seed, Utc::now())
    }

    #[test]
    fn missing_record_yields_default() {
        let dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(dir.path().join("profiles.jsonl"));

        let profile = store.profile(&owner("fresh")).unwrap();
        assert_eq!(profile, Profile::default());
        assert_eq!(profile.monthly_limit, 20);
    }

    #[test]
    fn put_then_get() {
        let dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(dir.path().join("profiles.jsonl"));
        let alice = owner("alice");

        let pro = Profile {
            tier: Tier::Pro,
            monthly_limit: 500,
        };
        store.put_profile(&alice, &pro).unwrap();

        assert_eq!(store.profile(&alice).unwrap(), pro);
    }

    #[test]
    fn put_replaces_existing_record() {
        let dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(dir.path().join("profiles.jsonl"));
        let alice = owner("alice");

        store
            .put_profile(
                &alice,
                &Profile {
                    tier: Tier::Pro,
                    monthly_limit: 500,
                },
            )
            .unwrap();
        store
            .put_profile(
                &alice,
                &Profile {
                    tier: Tier::Team,
                    monthly_limit: 2000,
                },
            )
            .unwrap();

        let profile = store.profile(&alice).unwrap();
        assert_eq!(profile.tier, Tier::Team);

        // Still a single record on disk
        let lines = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(lines.lines().count(), 1);
    }

    #[test]
    fn profiles_are_per_owner() {
        let dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(dir.path().join("profiles.jsonl"));
        let alice = owner("alice");
        let bob = owner("bob");

        store
            .put_profile(
                &alice,
                &Profile {
                    tier: Tier::Pro,
                    monthly_limit: 500,
                },
            )
            .unwrap();

        assert_eq!(store.profile(&bob).unwrap(), Profile::default());
    }
}
