//! Session store - JSON record CRUD in a repository-scoped directory
//!
//! Each record is one pretty-printed JSON file under
//! `<repo-root>/.claude-sessions/<name>.json`. The store is an explicit
//! object constructed from a directory so tests can point it anywhere.

use crate::git;
use crate::models::{ContextFlags, SessionRecord};
use chrono::Utc;
use colored::Colorize;
use git2::Repository;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Name of the repository-scoped session directory
pub const SESSION_DIR: &str = ".claude-sessions";

/// Records older than this are removed by `clean`
pub const RETENTION_DAYS: u64 = 30;

/// Result type for session store operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur when working with session records
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session '{0}' not found")]
    NotFound(String),

    #[error("Session '{0}' already exists (pass --force to overwrite)")]
    AlreadyExists(String),

    #[error("Failed to access session store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize session record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Capture a fresh record from live repository state
///
/// Branch and commit degrade to "unknown" when the git queries fail; the
/// marker-file flags reflect the repository root at this instant.
pub fn capture_record(
    name: impl Into<String>,
    repo: &Repository,
    repo_root: &Path,
    notes: impl Into<String>,
) -> SessionRecord {
    SessionRecord {
        name: name.into(),
        repository: repo_root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| repo_root.display().to_string()),
        timestamp: Utc::now(),
        branch: git::head_branch(repo),
        commit: git::head_commit(repo),
        context: ContextFlags {
            project_context_present: repo_root.join("CLAUDE.md").exists(),
            claude_config_present: repo_root.join("claude-config.json").exists(),
        },
        notes: notes.into(),
    }
}

pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Store rooted at `<repo_root>/.claude-sessions`
    pub fn new(repo_root: &Path) -> Self {
        Self {
            dir: repo_root.join(SESSION_DIR),
        }
    }

    /// Store over an arbitrary directory (tests)
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.record_path(name).exists()
    }

    /// Persist a record. An existing name is rejected unless `overwrite`
    /// is set.
    pub fn save(&self, record: &SessionRecord, overwrite: bool) -> SessionResult<PathBuf> {
        let path = self.record_path(&record.name);
        if path.exists() && !overwrite {
            return Err(SessionError::AlreadyExists(record.name.clone()));
        }

        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> SessionResult<SessionRecord> {
        let path = self.record_path(name);
        if !path.exists() {
            return Err(SessionError::NotFound(name.to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// All records, newest first (timestamp descending, name as tie-break).
    /// Unparsable record files are skipped with a warning.
    pub fn list(&self) -> SessionResult<Vec<SessionRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<SessionRecord>(&content) {
                Ok(record) => records.push(record),
                Err(e) => {
                    eprintln!(
                        "{}",
                        format!("⚠️  Skipping unreadable record {}: {}", path.display(), e)
                            .yellow()
                    );
                }
            }
        }

        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(records)
    }

    pub fn delete(&self, name: &str) -> SessionResult<()> {
        let path = self.record_path(name);
        if !path.exists() {
            return Err(SessionError::NotFound(name.to_string()));
        }
        std::fs::remove_file(&path)?;
        Ok(())
    }

    /// Remove every record older than [`RETENTION_DAYS`], returning the
    /// removed names. Zero removals is a normal outcome.
    pub fn clean(&self) -> SessionResult<Vec<String>> {
        let cutoff = SystemTime::now() - Duration::from_secs(RETENTION_DAYS * 24 * 60 * 60);
        self.clean_older_than(cutoff)
    }

    /// Age is judged by file modification time, not the recorded timestamp
    pub fn clean_older_than(&self, cutoff: SystemTime) -> SessionResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut removed = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let modified = entry.metadata()?.modified()?;
            if modified < cutoff {
                std::fs::remove_file(&path)?;
                if let Some(stem) = path.file_stem() {
                    removed.push(stem.to_string_lossy().to_string());
                }
            }
        }

        removed.sort();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(name: &str) -> SessionRecord {
        SessionRecord {
            name: name.to_string(),
            repository: "repo".to_string(),
            timestamp: Utc::now(),
            branch: "main".to_string(),
            commit: "abc1234".to_string(),
            context: ContextFlags::default(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::at(temp.path().join("sessions"));

        store.save(&sample("demo"), false).unwrap();
        let loaded = store.load("demo").unwrap();
        assert_eq!(loaded.name, "demo");
        assert_eq!(loaded.branch, "main");
    }

    #[test]
    fn test_save_collision_rejected_without_force() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::at(temp.path().join("sessions"));

        store.save(&sample("demo"), false).unwrap();
        let err = store.save(&sample("demo"), false).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyExists(_)));

        // And succeeds with overwrite
        store.save(&sample("demo"), true).unwrap();
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::at(temp.path().join("sessions"));
        let err = store.load("ghost").unwrap_err();
        assert!(matches!(err, SessionError::NotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_delete_missing_leaves_store_untouched() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::at(temp.path().join("sessions"));
        store.save(&sample("keep"), false).unwrap();

        let err = store.delete("ghost").unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
        assert!(store.exists("keep"));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_sorted_newest_first() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::at(temp.path().join("sessions"));

        let mut old = sample("older");
        old.timestamp = Utc::now() - chrono::Duration::hours(2);
        store.save(&old, false).unwrap();
        store.save(&sample("newer"), false).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "newer");
        assert_eq!(listed[1].name, "older");
    }

    #[test]
    fn test_list_skips_corrupt_records() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::at(temp.path().join("sessions"));
        store.save(&sample("good"), false).unwrap();
        std::fs::write(store.dir().join("bad.json"), "{not json").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "good");
    }

    #[test]
    fn test_clean_removes_only_old_records() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::at(temp.path().join("sessions"));

        store.save(&sample("old-session"), false).unwrap();
        // Ensure a distinct mtime ordering between the two files
        std::thread::sleep(std::time::Duration::from_millis(50));
        let cutoff = SystemTime::now();
        std::thread::sleep(std::time::Duration::from_millis(50));
        store.save(&sample("new-session"), false).unwrap();

        let removed = store.clean_older_than(cutoff).unwrap();
        assert_eq!(removed, vec!["old-session".to_string()]);
        assert!(!store.exists("old-session"));
        assert!(store.exists("new-session"));
    }

    #[test]
    fn test_clean_empty_store_reports_zero() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::at(temp.path().join("sessions"));
        assert!(store.clean().unwrap().is_empty());
    }

    #[test]
    fn test_capture_record_from_live_repo() {
        let temp = TempDir::new().unwrap();
        let repo = git2::Repository::init(temp.path()).unwrap();
        std::fs::write(temp.path().join("CLAUDE.md"), "# ctx").unwrap();

        let record = capture_record("snap", &repo, temp.path(), "");
        assert_eq!(record.name, "snap");
        // Unborn HEAD degrades to the sentinel
        assert_eq!(record.branch, git::UNKNOWN);
        assert_eq!(record.commit, git::UNKNOWN);
        assert!(record.context.project_context_present);
        assert!(!record.context.claude_config_present);
    }
}
