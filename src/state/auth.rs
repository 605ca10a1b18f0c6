//! Auth-mode store - a single JSON file under the user's home directory
//!
//! Reads degrade to `Unknown` when the file is missing or unparsable; writes
//! replace the file wholesale. No locking: concurrent switches are
//! last-write-wins, which matches how rarely the flag changes.

use crate::models::{AuthMode, AuthModeRecord};
use crate::{Context, Result};
use std::path::{Path, PathBuf};

/// User-scoped directory holding claudekit state
pub const STATE_DIR: &str = ".claudekit";

/// Filename of the auth-mode record inside [`STATE_DIR`]
pub const AUTH_MODE_FILE: &str = "auth-mode.json";

pub struct AuthStore {
    path: PathBuf,
}

impl AuthStore {
    /// Store at the conventional per-user location
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().context("Could not resolve home directory")?;
        Ok(Self {
            path: home.join(STATE_DIR).join(AUTH_MODE_FILE),
        })
    }

    /// Store over an arbitrary file (tests)
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current record; missing or unreadable files read as `Unknown`
    pub fn load(&self) -> AuthModeRecord {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Overwrite the record with a new mode and a fresh timestamp
    pub fn save(&self, mode: AuthMode) -> Result<AuthModeRecord> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let record = AuthModeRecord::new(mode);
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(record)
    }
}
