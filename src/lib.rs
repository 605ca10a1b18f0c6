// Claudekit - Repository toolkit for Claude Code
// Deploys assistant config templates, health-checks them, and tracks
// lightweight session metadata per repository.

pub mod cli;
pub mod deployer;
pub mod git;
pub mod manifest;
pub mod models;
pub mod state;
pub mod usage;
pub mod validator;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{AuthMode, AuthModeRecord, CheckReport, SessionRecord, ToolConfig};
pub use state::{AuthStore, SessionError, SessionStore};
