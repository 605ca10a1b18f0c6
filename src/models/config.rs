//! Optional per-repository tool configuration (claudekit.toml)

use crate::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional config file at the repository root
pub const CONFIG_FILE: &str = "claudekit.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory whose files override the embedded templates
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Extra directories scanned for *.log files by `usage`
    pub log_dirs: Vec<PathBuf>,
}

/// Root config structure; every field is optional and defaults apply when
/// the file is absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub templates: TemplatesConfig,
    pub usage: UsageConfig,
}

impl ToolConfig {
    /// Load claudekit.toml from the given directory. A missing file yields
    /// the defaults; a malformed file is a fatal usage error.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Template override directory, resolved relative to the repo root
    pub fn template_dir(&self, root: &Path) -> Option<PathBuf> {
        self.templates.dir.as_ref().map(|d| {
            if d.is_absolute() {
                d.clone()
            } else {
                root.join(d)
            }
        })
    }
}
