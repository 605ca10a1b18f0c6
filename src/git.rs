//! Thin wrappers around git2 queries
//!
//! Every query degrades to a sentinel value instead of failing: branch and
//! commit fall back to "unknown", status counts to None. Only repository
//! discovery itself is fatal, since the session store requires a work tree.

use anyhow::{bail, Context, Result};
use git2::{Repository, StatusOptions};
use std::path::{Path, PathBuf};

/// Sentinel used when a git query fails (unborn HEAD, detached state, ...)
pub const UNKNOWN: &str = "unknown";

/// Discover the repository containing `start`, failing with a clear error
/// when outside any work tree.
pub fn discover_repo(start: &Path) -> Result<Repository> {
    Repository::discover(start)
        .with_context(|| format!("Not inside a git repository: {}", start.display()))
}

/// Work-tree root of a discovered repository
pub fn repo_root(repo: &Repository) -> Result<PathBuf> {
    match repo.workdir() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => bail!("Repository has no work tree (bare repository)"),
    }
}

/// Whether `path` is inside a git work tree
pub fn is_work_tree(path: &Path) -> bool {
    Repository::discover(path)
        .map(|r| r.workdir().is_some())
        .unwrap_or(false)
}

/// Current branch name, or "unknown" (unborn HEAD, detached HEAD)
pub fn head_branch(repo: &Repository) -> String {
    match repo.head() {
        Ok(head) if head.is_branch() => head
            .shorthand()
            .map(|s| s.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        _ => UNKNOWN.to_string(),
    }
}

/// Short hash of the HEAD commit, or "unknown"
pub fn head_commit(repo: &Repository) -> String {
    let Ok(head) = repo.head() else {
        return UNKNOWN.to_string();
    };
    match head.peel_to_commit() {
        Ok(commit) => {
            let id = commit.id().to_string();
            id.chars().take(7).collect()
        }
        Err(_) => UNKNOWN.to_string(),
    }
}

/// Number of uncommitted changes (staged, unstaged, and untracked), or None
/// when the status query fails.
pub fn uncommitted_count(repo: &Repository) -> Option<usize> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true);
    repo.statuses(Some(&mut opts)).ok().map(|s| s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo_with_commit(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "test").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();

            std::fs::write(dir.join("README.md"), "# test").unwrap();
            let mut index = repo.index().unwrap();
            index.add_path(Path::new("README.md")).unwrap();
            index.write().unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = repo.signature().unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
                .unwrap();
        }
        repo
    }

    #[test]
    fn test_discover_outside_repo_fails() {
        let temp = TempDir::new().unwrap();
        assert!(discover_repo(temp.path()).is_err());
        assert!(!is_work_tree(temp.path()));
    }

    #[test]
    fn test_branch_and_commit_after_initial_commit() {
        let temp = TempDir::new().unwrap();
        let repo = init_repo_with_commit(temp.path());

        let branch = head_branch(&repo);
        // Default branch name depends on git config; both are common
        assert!(branch == "main" || branch == "master");

        let commit = head_commit(&repo);
        assert_eq!(commit.len(), 7);
        assert!(commit.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_unborn_head_is_unknown() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        assert_eq!(head_branch(&repo), UNKNOWN);
        assert_eq!(head_commit(&repo), UNKNOWN);
    }

    #[test]
    fn test_uncommitted_count_sees_untracked() {
        let temp = TempDir::new().unwrap();
        let repo = init_repo_with_commit(temp.path());

        assert_eq!(uncommitted_count(&repo), Some(0));

        std::fs::write(temp.path().join("new-file.txt"), "dirty").unwrap();
        assert_eq!(uncommitted_count(&repo), Some(1));
    }

    #[test]
    fn test_repo_root_matches_init_dir() {
        let temp = TempDir::new().unwrap();
        let repo = init_repo_with_commit(temp.path());
        let root = repo_root(&repo).unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }
}
