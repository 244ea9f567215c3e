//! In-memory store implementations
//!
//! Mutex-guarded maps implementing the collaborator traits. Used by the test
//! suite (including the concurrency properties) and handy for embedders who
//! do not want files on disk. Lock poisoning is surfaced as a store failure
//! rather than a panic.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::domain::{Jott, JottId, MonthKey, Profile, UserId};
use crate::service::{
    DocumentStore, ProfileStore, QuotaLedger, Reservation, StoreError,
};

fn poisoned() -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

/// In-memory jott store
#[derive(Default)]
pub struct MemoryJottStore {
    jotts: Mutex<HashMap<JottId, Jott>>,
}

impl MemoryJottStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryJottStore {
    fn insert(&self, jott: &Jott) -> Result<(), StoreError> {
        let mut jotts = self.jotts.lock().map_err(|_| poisoned())?;
        if jotts.contains_key(&jott.id) {
            return Err(StoreError::Unavailable(format!(
                "jott {} already exists",
                jott.id
            )));
        }
        jotts.insert(jott.id.clone(), jott.clone());
        Ok(())
    }

    fn find(&self, id: &JottId) -> Result<Option<Jott>, StoreError> {
        let jotts = self.jotts.lock().map_err(|_| poisoned())?;
        Ok(jotts.get(id).cloned())
    }

    fn update(&self, jott: &Jott) -> Result<(), StoreError> {
        let mut jotts = self.jotts.lock().map_err(|_| poisoned())?;
        if !jotts.contains_key(&jott.id) {
            return Err(StoreError::Unavailable(format!("no such jott {}", jott.id)));
        }
        jotts.insert(jott.id.clone(), jott.clone());
        Ok(())
    }

    fn remove(&self, id: &JottId) -> Result<bool, StoreError> {
        let mut jotts = self.jotts.lock().map_err(|_| poisoned())?;
        Ok(jotts.remove(id).is_some())
    }

    fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Jott>, StoreError> {
        let jotts = self.jotts.lock().map_err(|_| poisoned())?;
        Ok(jotts
            .values()
            .filter(|j| j.is_owned_by(owner))
            .cloned()
            .collect())
    }

    fn record_view(&self, id: &JottId) -> Result<Option<u64>, StoreError> {
        // The increment happens under the map lock, so it is atomic with
        // respect to concurrent viewers
        let mut jotts = self.jotts.lock().map_err(|_| poisoned())?;
        Ok(jotts.get_mut(id).map(|jott| {
            jott.view_count += 1;
            jott.view_count
        }))
    }
}

/// In-memory profile store
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<UserId, Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn profile(&self, owner: &UserId) -> Result<Profile, StoreError> {
        let profiles = self.profiles.lock().map_err(|_| poisoned())?;
        Ok(profiles.get(owner).cloned().unwrap_or_default())
    }

    fn put_profile(&self, owner: &UserId, profile: &Profile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.lock().map_err(|_| poisoned())?;
        profiles.insert(owner.clone(), profile.clone());
        Ok(())
    }
}

/// In-memory quota ledger
#[derive(Default)]
pub struct MemoryQuotaLedger {
    counts: Mutex<HashMap<(UserId, MonthKey), u32>>,
}

impl MemoryQuotaLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuotaLedger for MemoryQuotaLedger {
    fn reserve_slot(
        &self,
        owner: &UserId,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Reservation, StoreError> {
        let month = MonthKey::from_datetime(now);
        // Check and increment under one lock acquisition
        let mut counts = self.counts.lock().map_err(|_| poisoned())?;
        let count = counts.entry((owner.clone(), month)).or_insert(0);

        if *count >= limit {
            return Ok(Reservation::Denied {
                used: *count,
                limit,
            });
        }

        *count += 1;
        Ok(Reservation::Granted { used: *count })
    }

    fn usage(&self, owner: &UserId, month: MonthKey) -> Result<u32, StoreError> {
        let counts = self.counts.lock().map_err(|_| poisoned())?;
        Ok(counts.get(&(owner.clone(), month)).copied().unwrap_or(0))
    }
}
