//! Health-check report data model
//!
//! Recomputed fresh on every `check` invocation, never persisted. The same
//! structure backs both the human-readable output and `--json`.

use serde::{Deserialize, Serialize};

/// Per-file check outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// Present with no issues
    FoundValid,
    /// Present but at least one issue was detected
    FoundWithIssues,
    Missing,
}

impl FileStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            FileStatus::FoundValid => "✓",
            FileStatus::FoundWithIssues => "⚠",
            FileStatus::Missing => "✗",
        }
    }
}

/// Check result for one required file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCheck {
    pub name: String,
    pub status: FileStatus,
    /// Human-readable issue descriptions, empty when found-valid
    pub issues: Vec<String>,
}

impl FileCheck {
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: FileStatus::Missing,
            issues: Vec::new(),
        }
    }

    pub fn found(name: impl Into<String>, issues: Vec<String>) -> Self {
        let status = if issues.is_empty() {
            FileStatus::FoundValid
        } else {
            FileStatus::FoundWithIssues
        };
        Self {
            name: name.into(),
            status,
            issues,
        }
    }
}

/// Version-control state of the target directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoStatus {
    /// Whether the target is inside a git work tree
    pub is_git_repo: bool,
    /// Uncommitted-change count; None when not a repository or the status
    /// query failed
    pub uncommitted_changes: Option<usize>,
}

/// Aggregate health-check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub files: Vec<FileCheck>,
    pub found: usize,
    pub missing: usize,
    pub with_issues: usize,
    /// True iff every required file is present (issues do not break
    /// completeness)
    pub complete: bool,
    /// Whether .gitignore carries the claudekit marker block
    pub gitignore_marker_present: bool,
    pub repo: RepoStatus,
}

impl CheckReport {
    /// Build the aggregate counts from per-file results
    pub fn from_files(
        files: Vec<FileCheck>,
        required: usize,
        gitignore_marker_present: bool,
        repo: RepoStatus,
    ) -> Self {
        let found = files
            .iter()
            .filter(|f| f.status != FileStatus::Missing)
            .count();
        let missing = files.len() - found;
        let with_issues = files
            .iter()
            .filter(|f| f.status == FileStatus::FoundWithIssues)
            .count();

        Self {
            files,
            found,
            missing,
            with_issues,
            complete: found == required,
            gitignore_marker_present,
            repo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_status() -> RepoStatus {
        RepoStatus {
            is_git_repo: true,
            uncommitted_changes: Some(0),
        }
    }

    #[test]
    fn test_found_with_no_issues_is_valid() {
        let check = FileCheck::found("CLAUDE.md", vec![]);
        assert_eq!(check.status, FileStatus::FoundValid);
    }

    #[test]
    fn test_found_with_issues() {
        let check = FileCheck::found("CLAUDE.md", vec!["placeholder tokens present".into()]);
        assert_eq!(check.status, FileStatus::FoundWithIssues);
    }

    #[test]
    fn test_aggregate_counts() {
        let files = vec![
            FileCheck::found("a", vec![]),
            FileCheck::found("b", vec!["empty file".into()]),
            FileCheck::missing("c"),
        ];
        let report = CheckReport::from_files(files, 3, true, repo_status());

        assert_eq!(report.found, 2);
        assert_eq!(report.missing, 1);
        assert_eq!(report.with_issues, 1);
        assert!(!report.complete);
    }

    #[test]
    fn test_complete_despite_issues() {
        let files = vec![
            FileCheck::found("a", vec!["placeholder tokens present".into()]),
            FileCheck::found("b", vec![]),
        ];
        let report = CheckReport::from_files(files, 2, false, repo_status());
        assert!(report.complete);
        assert_eq!(report.with_issues, 1);
    }

    #[test]
    fn test_json_output_shape() {
        let files = vec![FileCheck::missing("CLAUDE.md")];
        let report = CheckReport::from_files(files, 1, false, repo_status());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["complete"], false);
        assert_eq!(json["files"][0]["status"], "missing");
        assert_eq!(json["repo"]["is_git_repo"], true);
    }
}
