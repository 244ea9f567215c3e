//! Opaque identifiers for jotts and users
//!
//! ID Format:
//! - Jott IDs: `j-{7-char-hash}` (e.g., `j-7f2b4c1`)
//! - User IDs: `u-{7-char-hash}` (e.g., `u-9d3e5f2`)
//!
//! Hash is derived from a seed string + creation timestamp, ensuring
//! uniqueness. Same seed at different times produces different IDs (by
//! design).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid jott ID format: expected 'j-{{7-char-hash}}', got '{0}'")]
    InvalidJottId(String),

    #[error("Invalid user ID format: expected 'u-{{7-char-hash}}', got '{0}'")]
    InvalidUserId(String),
}

/// Generates a 7-character hash from a seed and timestamp
fn generate_hash(seed: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", seed, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

fn valid_hash(hash: &str) -> bool {
    hash.len() == 7 && hash.chars().all(|c| c.is_ascii_hexdigit())
}

/// Jott ID in the format `j-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JottId {
    hash: String,
}

impl JottId {
    /// Creates a new jott ID from the document title and creation timestamp
    pub fn new(title: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(title, timestamp),
        }
    }
}

impl fmt::Display for JottId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "j-{}", self.hash)
    }
}

impl FromStr for JottId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("j-")
            .ok_or_else(|| IdError::InvalidJottId(s.to_string()))?;

        if !valid_hash(hash) {
            return Err(IdError::InvalidJottId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for JottId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JottId> for String {
    fn from(id: JottId) -> Self {
        id.to_string()
    }
}

/// User ID in the format `u-{7-char-hash}`
///
/// Issued by the identity layer; the core treats it as opaque and stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId {
    hash: String,
}

impl UserId {
    /// Creates a new user ID from a seed (e.g., a username) and timestamp
    pub fn new(seed: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(seed, timestamp),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u-{}", self.hash)
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("u-")
            .ok_or_else(|| IdError::InvalidUserId(s.to_string()))?;

        if !valid_hash(hash) {
            return Err(IdError::InvalidUserId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.to_string()
    }
}
