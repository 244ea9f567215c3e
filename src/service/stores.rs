//! Collaborator seams for the lifecycle service
//!
//! The core mutates documents, profiles, and quota records only through
//! these traits. The crate ships file-backed implementations under
//! [`crate::storage`] and in-memory ones under [`crate::storage::memory`].

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Jott, JottId, MonthKey, Profile, UserId};

/// A collaborator failure surfaced to the caller as-is, without retry
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable persistence for jott documents
///
/// Implementations must provide per-document atomic writes. `record_view`
/// must be an atomic increment: concurrent viewers never lose a count.
pub trait DocumentStore {
    fn insert(&self, jott: &Jott) -> Result<(), StoreError>;

    fn find(&self, id: &JottId) -> Result<Option<Jott>, StoreError>;

    fn update(&self, jott: &Jott) -> Result<(), StoreError>;

    /// Hard-removes a document. Returns false if the id was absent.
    fn remove(&self, id: &JottId) -> Result<bool, StoreError>;

    fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Jott>, StoreError>;

    /// Atomically increments the view counter, returning the new count,
    /// or `None` if the document no longer exists.
    fn record_view(&self, id: &JottId) -> Result<Option<u64>, StoreError>;
}

/// Owner metadata: subscription tier and monthly creation ceiling
///
/// `profile` must fall back to [`Profile::default`] (free tier, 20 per
/// month) when no record exists for the owner.
pub trait ProfileStore {
    fn profile(&self, owner: &UserId) -> Result<Profile, StoreError>;

    fn put_profile(&self, owner: &UserId, profile: &Profile) -> Result<(), StoreError>;
}

/// Outcome of a creation-slot reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Slot reserved; `used` includes this reservation
    Granted { used: u32 },
    /// Ceiling reached; no state was mutated
    Denied { used: u32, limit: u32 },
}

/// Per-owner, per-calendar-month counter gating document creation
///
/// `reserve_slot` performs the read-check-increment as a single atomic unit
/// per (owner, month): two concurrent reservations near the ceiling must
/// never both be granted when one slot remains.
pub trait QuotaLedger {
    fn reserve_slot(
        &self,
        owner: &UserId,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Reservation, StoreError>;

    /// Documents created by `owner` within `month`; 0 when no record exists
    fn usage(&self, owner: &UserId, month: MonthKey) -> Result<u32, StoreError>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    fn insert(&self, jott: &Jott) -> Result<(), StoreError> {
        (**self).insert(jott)
    }

    fn find(&self, id: &JottId) -> Result<Option<Jott>, StoreError> {
        (**self).find(id)
    }

    fn update(&self, jott: &Jott) -> Result<(), StoreError> {
        (**self).update(jott)
    }

    fn remove(&self, id: &JottId) -> Result<bool, StoreError> {
        (**self).remove(id)
    }

    fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Jott>, StoreError> {
        (**self).list_by_owner(owner)
    }

    fn record_view(&self, id: &JottId) -> Result<Option<u64>, StoreError> {
        (**self).record_view(id)
    }
}

impl<T: ProfileStore + ?Sized> ProfileStore for std::sync::Arc<T> {
    fn profile(&self, owner: &UserId) -> Result<Profile, StoreError> {
        (**self).profile(owner)
    }

    fn put_profile(&self, owner: &UserId, profile: &Profile) -> Result<(), StoreError> {
        (**self).put_profile(owner, profile)
    }
}

impl<T: QuotaLedger + ?Sized> QuotaLedger for std::sync::Arc<T> {
    fn reserve_slot(
        &self,
        owner: &UserId,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Reservation, StoreError> {
        (**self).reserve_slot(owner, limit, now)
    }

    fn usage(&self, owner: &UserId, month: MonthKey) -> Result<u32, StoreError> {
        (**self).usage(owner, month)
    }
}
