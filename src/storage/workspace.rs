//! Workspace management
//!
//! Handles workspace initialization and provides access to the file-backed
//! stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use thiserror::Error;

use crate::domain::UserId;

use super::config::{Config, WorkspaceConfig};
use super::jott_store::FileJottStore;
use super::profiles::FileProfileStore;
use super::quota::FileQuotaLedger;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in a jframe workspace. Run 'jott init' first.")]
    NotInWorkspace,
}

/// A jframe workspace: a `.jframe/` directory holding the stores and config
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".jframe").is_dir() {
            return Err(WorkspaceError::NotInWorkspace.into());
        }

        let config = Config::for_workspace(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_workspace_root().ok_or(WorkspaceError::NotInWorkspace)?;

        Self::open(root)
    }

    /// Initializes a new workspace at the given path
    ///
    /// Signs in a fresh user derived from `handle` unless the directory was
    /// already initialized.
    pub fn init(root: impl Into<PathBuf>, handle: &str) -> Result<Self> {
        let root = root.into();
        let jframe_dir = root.join(".jframe");

        fs::create_dir_all(&jframe_dir).with_context(|| {
            format!(
                "Failed to create .jframe directory: {}",
                jframe_dir.display()
            )
        })?;

        let config_path = jframe_dir.join("config.toml");
        if !config_path.exists() {
            let actor = UserId::new(handle, Utc::now());
            let workspace_config = WorkspaceConfig {
                actor: Some(actor),
                handle: Some(handle.to_string()),
            };
            let content = toml::to_string_pretty(&workspace_config)
                .context("Failed to serialize workspace config")?;
            fs::write(&config_path, content)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = jframe_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = "# Lock and scratch files\n*.lock\n*.tmp\n";
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .jframe directory path
    pub fn jframe_dir(&self) -> PathBuf {
        self.root.join(".jframe")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Returns the jott store
    pub fn jott_store(&self) -> FileJottStore {
        FileJottStore::for_workspace(&self.root)
    }

    /// Returns the quota ledger
    pub fn quota_ledger(&self) -> FileQuotaLedger {
        FileQuotaLedger::for_workspace(&self.root)
    }

    /// Returns the profile store
    pub fn profile_store(&self) -> FileProfileStore {
        FileProfileStore::for_workspace(&self.root)
    }
}
