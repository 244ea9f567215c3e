//! # Storage Layer
//!
//! File-backed implementations of the lifecycle service's collaborator
//! traits, with git-friendly formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Jotts | JSONL (one JSON per line) | `.jframe/jotts.jsonl` |
//! | Quota records | JSONL | `.jframe/quota.jsonl` |
//! | Profiles | JSONL | `.jframe/profiles.jsonl` |
//! | Config | TOML | `.jframe/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - Mutations hold an exclusive lock (`fs2`) on a sidecar `.lock` file for
//!   the whole read-modify-write; reads take a shared lock
//! - All rewrites are atomic (temp file + rename)
//! - Quota reservation and view counting therefore behave as per-key atomic
//!   operations across processes
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point for accessing a jframe workspace
//! - [`FileJottStore`] - Jott documents as JSONL
//! - [`FileQuotaLedger`] - Per-owner-month creation counters
//! - [`FileProfileStore`] - Tier and monthly-limit records
//! - [`memory`] - Mutex-backed in-memory counterparts for tests/embedding

mod config;
mod jott_store;
mod jsonl;
pub mod memory;
mod profiles;
mod quota;
mod workspace;

pub use config::{Config, ConfigError, GlobalConfig, WorkspaceConfig};
pub use jott_store::FileJottStore;
pub use profiles::FileProfileStore;
pub use quota::FileQuotaLedger;
pub use workspace::{Workspace, WorkspaceError};
