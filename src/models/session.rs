//! Session record data model
//!
//! A session is a point-in-time snapshot of repository state: branch, commit,
//! and which Claude Code marker files were present. Records are immutable
//! after creation; there is no update operation, only delete.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Presence of the Claude Code marker files at save time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFlags {
    /// CLAUDE.md existed in the repository root
    pub project_context_present: bool,
    /// claude-config.json existed in the repository root
    pub claude_config_present: bool,
}

/// A persisted snapshot of repository state, identified by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique name within the repository's session directory
    pub name: String,

    /// Repository root directory name
    pub repository: String,

    /// Capture time (ISO 8601)
    pub timestamp: DateTime<Utc>,

    /// Branch name at capture time, or "unknown"
    pub branch: String,

    /// Short commit hash at capture time, or "unknown"
    pub commit: String,

    /// Marker file presence at capture time
    #[serde(default)]
    pub context: ContextFlags,

    /// Free-form user notes
    #[serde(default)]
    pub notes: String,
}

impl SessionRecord {
    /// Derive a session name from the current local time
    pub fn default_name() -> String {
        format!("session-{}", Local::now().format("%Y%m%d-%H%M%S"))
    }

    /// Render the record as a standalone markdown export, with the raw JSON
    /// embedded verbatim and a notes section left for the user to fill in.
    pub fn to_markdown(&self) -> String {
        let json = serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| "{}".to_string());

        format!(
            "# Session: {name}\n\n\
             | Field | Value |\n\
             |-------|-------|\n\
             | Repository | {repo} |\n\
             | Saved | {ts} |\n\
             | Branch | {branch} |\n\
             | Commit | {commit} |\n\
             | CLAUDE.md present | {ctx} |\n\
             | claude-config.json present | {cfg} |\n\n\
             ## Record\n\n```json\n{json}\n```\n\n\
             ## Notes\n\n{notes}\n",
            name = self.name,
            repo = self.repository,
            ts = self.timestamp.to_rfc3339(),
            branch = self.branch,
            commit = self.commit,
            ctx = self.context.project_context_present,
            cfg = self.context.claude_config_present,
            json = json,
            notes = if self.notes.is_empty() {
                "_(add notes here)_"
            } else {
                self.notes.as_str()
            },
        )
    }
}
