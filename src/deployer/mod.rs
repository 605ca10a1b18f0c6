//! Template deployer
//!
//! Deployment is split into plan and apply so `--dry-run` can print the
//! exact decision trace without touching the filesystem. All fatal
//! preconditions (missing target, unresolvable template overrides) surface
//! during planning, before any file is written. There is no rollback: when a
//! later copy fails, earlier copies stay in place.

use crate::manifest::{self, TemplateFile, REQUIRED_FILES};
use crate::{Context, Result};
use anyhow::bail;
use chrono::Local;
use std::path::{Path, PathBuf};

/// How existing files are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    /// Leave existing files untouched (default)
    SkipExisting,
    /// Back up then overwrite existing files
    Replace,
}

/// Decision for a single required file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Skip,
    Replace,
}

/// One entry in the deployment plan, with its resolved content
#[derive(Debug)]
pub struct PlannedFile {
    pub template: &'static TemplateFile,
    pub action: Action,
    content: String,
}

/// The full decision trace for one deployment
#[derive(Debug)]
pub struct DeployPlan {
    pub files: Vec<PlannedFile>,
    /// Whether .gitignore lacks the claudekit marker block
    pub gitignore_needs_block: bool,
}

impl DeployPlan {
    pub fn replacements(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.action == Action::Replace)
            .count()
    }
}

/// What apply actually did
#[derive(Debug, Default)]
pub struct DeploySummary {
    pub created: usize,
    pub skipped: usize,
    pub replaced: usize,
    pub backups: Vec<PathBuf>,
    pub gitignore_updated: bool,
}

pub struct Deployer {
    target: PathBuf,
    mode: DeployMode,
    override_dir: Option<PathBuf>,
}

impl Deployer {
    pub fn new(target: impl Into<PathBuf>, mode: DeployMode) -> Self {
        Self {
            target: target.into(),
            mode,
            override_dir: None,
        }
    }

    pub fn with_override_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.override_dir = dir;
        self
    }

    /// Compute the decision trace. Resolves every template up front so a
    /// broken override directory aborts before anything is written.
    pub fn plan(&self) -> Result<DeployPlan> {
        if !self.target.is_dir() {
            bail!("Target directory not found: {}", self.target.display());
        }

        let mut files = Vec::with_capacity(REQUIRED_FILES.len());
        for template in REQUIRED_FILES {
            let content = template.resolve_content(self.override_dir.as_deref())?;
            let action = if !self.target.join(template.name).exists() {
                Action::Create
            } else {
                match self.mode {
                    DeployMode::SkipExisting => Action::Skip,
                    DeployMode::Replace => Action::Replace,
                }
            };
            files.push(PlannedFile {
                template,
                action,
                content,
            });
        }

        let gitignore = self.target.join(".gitignore");
        let gitignore_needs_block = match std::fs::read_to_string(&gitignore) {
            Ok(content) => !content.contains(manifest::GITIGNORE_MARKER),
            Err(_) => true,
        };

        Ok(DeployPlan {
            files,
            gitignore_needs_block,
        })
    }

    /// Execute a plan. The caller decides about dry-run (by not calling
    /// apply) and about interactive confirmation for replacements.
    pub fn apply(&self, plan: &DeployPlan) -> Result<DeploySummary> {
        self.probe_writable()?;

        let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let mut summary = DeploySummary::default();

        for planned in &plan.files {
            let dest = self.target.join(planned.template.name);
            match planned.action {
                Action::Skip => summary.skipped += 1,
                Action::Create => {
                    self.write_artifact(&dest, planned)?;
                    summary.created += 1;
                }
                Action::Replace => {
                    let backup = self
                        .target
                        .join(format!("{}.backup-{}", planned.template.name, stamp));
                    std::fs::copy(&dest, &backup).with_context(|| {
                        format!("Failed to back up {}", dest.display())
                    })?;
                    self.write_artifact(&dest, planned)?;
                    summary.backups.push(backup);
                    summary.replaced += 1;
                }
            }
        }

        if plan.gitignore_needs_block {
            self.append_gitignore_block()?;
            summary.gitignore_updated = true;
        }

        Ok(summary)
    }

    fn write_artifact(&self, dest: &Path, planned: &PlannedFile) -> Result<()> {
        std::fs::write(dest, &planned.content)
            .with_context(|| format!("Failed to write {}", dest.display()))?;

        #[cfg(unix)]
        if planned.template.executable {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(dest)?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(dest, perms)?;
        }

        Ok(())
    }

    fn append_gitignore_block(&self) -> Result<()> {
        let path = self.target.join(".gitignore");
        let mut content = match std::fs::read_to_string(&path) {
            Ok(existing) => existing,
            Err(_) => String::new(),
        };

        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(manifest::GITIGNORE_BLOCK);

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to update {}", path.display()))
    }

    /// Confirm the target is writable before the first artifact is touched
    fn probe_writable(&self) -> Result<()> {
        let probe = self.target.join(".claudekit-write-probe");
        std::fs::write(&probe, b"")
            .with_context(|| format!("Target directory not writable: {}", self.target.display()))?;
        let _ = std::fs::remove_file(&probe);
        Ok(())
    }
}
