//! Repository health checker
//!
//! Inspects the target directory against the shared template manifest and
//! produces a [`CheckReport`]. Results are recomputed on every run.

pub mod checks;

pub use checks::{check_file, has_placeholder_tokens, JsonCapability};

use crate::git;
use crate::manifest::{self, REQUIRED_FILES};
use crate::models::{CheckReport, RepoStatus};
use std::path::{Path, PathBuf};

pub struct Validator {
    target: PathBuf,
    json: JsonCapability,
}

impl Validator {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            json: JsonCapability::Available,
        }
    }

    /// Override the JSON capability; tests use this to force the
    /// assume-valid branch.
    pub fn with_json_capability(mut self, json: JsonCapability) -> Self {
        self.json = json;
        self
    }

    pub fn json_capability(&self) -> JsonCapability {
        self.json
    }

    /// Run every check and aggregate the report
    pub fn run(&self) -> CheckReport {
        let files = REQUIRED_FILES
            .iter()
            .map(|template| check_file(&self.target, template, self.json))
            .collect();

        CheckReport::from_files(
            files,
            REQUIRED_FILES.len(),
            gitignore_marker_present(&self.target),
            repo_status(&self.target),
        )
    }
}

fn gitignore_marker_present(target: &Path) -> bool {
    std::fs::read_to_string(target.join(".gitignore"))
        .map(|content| content.contains(manifest::GITIGNORE_MARKER))
        .unwrap_or(false)
}

fn repo_status(target: &Path) -> RepoStatus {
    match git::discover_repo(target) {
        Ok(repo) if repo.workdir().is_some() => RepoStatus {
            is_git_repo: true,
            uncommitted_changes: git::uncommitted_count(&repo),
        },
        _ => RepoStatus {
            is_git_repo: false,
            uncommitted_changes: None,
        },
    }
}
