//! Quota domain types
//!
//! Creation quotas are tracked per owner per UTC calendar month. The ledger
//! itself lives behind a store trait; these are the shared types.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Monthly creation ceiling applied when an owner has no profile record
pub const DEFAULT_MONTHLY_LIMIT: u32 = 20;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid month key: expected 'YYYY-MM', got '{0}'")]
pub struct MonthKeyError(String);

/// A UTC calendar month, e.g. `2025-03`
///
/// Quota records are keyed by (owner, month). The key rolls over at the UTC
/// month boundary, at which point usage effectively resets to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Derives the month key for a point in time
    pub fn from_datetime(now: DateTime<Utc>) -> Self {
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    /// Returns the key for the following month (used in tests for rollover)
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| MonthKeyError(s.to_string()))?;

        let year: i32 = year.parse().map_err(|_| MonthKeyError(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| MonthKeyError(s.to_string()))?;

        if !(1..=12).contains(&month) {
            return Err(MonthKeyError(s.to_string()));
        }

        Ok(Self { year, month })
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Team,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Team => "team",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "pro" => Ok(Tier::Pro),
            "team" => Ok(Tier::Team),
            other => Err(format!("unknown tier '{}'", other)),
        }
    }
}

/// Owner metadata read by the core: subscription tier and monthly ceiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub tier: Tier,
    pub monthly_limit: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            tier: Tier::Free,
            monthly_limit: DEFAULT_MONTHLY_LIMIT,
        }
    }
}

/// A point-in-time quota readout for one owner-month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaUsage {
    pub used: u32,
    pub limit: u32,
}

impl QuotaUsage {
    /// Creation slots still available this month
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }
}
