//! File-backed quota ledger
//!
//! One record per (owner, month) in `.jframe/quota.jsonl`. The
//! read-check-increment in `reserve_slot` runs as a single unit under the
//! store's exclusive lock, so two concurrent creations near the ceiling can
//! never both be granted the last slot. Records are never decremented:
//! deleting a jott does not refund its creation slot.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{MonthKey, UserId};
use crate::service::{QuotaLedger, Reservation, StoreError};

use super::jsonl::{read_records, write_records, Flock};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuotaRecord {
    owner: UserId,
    month: MonthKey,
    created: u32,
}

/// Quota ledger persisted as JSONL
pub struct FileQuotaLedger {
    path: PathBuf,
}

impl FileQuotaLedger {
    /// Creates a ledger backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default ledger for a workspace
    pub fn for_workspace(root: &Path) -> Self {
        Self::new(root.join(".jframe").join("quota.jsonl"))
    }

    /// Returns the path to the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuotaLedger for FileQuotaLedger {
    fn reserve_slot(
        &self,
        owner: &UserId,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Reservation, StoreError> {
        let month = MonthKey::from_datetime(now);
        let _lock = Flock::exclusive(&self.path)?;

        let mut records: Vec<QuotaRecord> = read_records(&self.path)?;
        let existing = records
            .iter()
            .position(|r| &r.owner == owner && r.month == month);

        let used = existing.map(|i| records[i].created).unwrap_or(0);
        if used >= limit {
            return Ok(Reservation::Denied { used, limit });
        }

        match existing {
            Some(i) => records[i].created += 1,
            None => records.push(QuotaRecord {
                owner: owner.clone(),
                month,
                created: 1,
            }),
        }

        write_records(&self.path, &records)?;

        Ok(Reservation::Granted { used: used + 1 })
    }

    fn usage(&self, owner: &UserId, month: MonthKey) -> Result<u32, StoreError> {
        let _lock = Flock::shared(&self.path)?;

        let records: Vec<QuotaRecord> = read_records(&self.path)?;
        Ok(records
            .iter()
            .find(|r| &r.owner == owner && r.month == month)
            .map(|r| r.created)
            .unwrap_or(0))
    }
}
