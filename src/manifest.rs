//! Required template set shared by the deployer and the checker
//!
//! Both sides consume the same declaration so the deployed set and the
//! checked set cannot drift apart.

use crate::{Context, Result};
use std::path::Path;

// Embedded template artifacts
const TPL_CONTEXT: &str = include_str!("../templates/CLAUDE.md");
const TPL_CONFIG: &str = include_str!("../templates/claude-config.json");
const TPL_RULES: &str = include_str!("../templates/claude-rules.md");
const TPL_HEALTH_CHECK: &str = include_str!("../templates/claude-health-check.sh");

/// Marker line identifying the claudekit block in .gitignore
pub const GITIGNORE_MARKER: &str = "# >>> claudekit >>>";

/// Ignore patterns appended to .gitignore on deploy
pub const GITIGNORE_BLOCK: &str = "\
# >>> claudekit >>>
.claude-sessions/
*.backup-*
session-*.md
# <<< claudekit <<<
";

/// What kind of artifact a template is; drives per-file validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Markdown documentation, checked for placeholder tokens
    Markdown,
    /// JSON configuration, checked for syntax and placeholder tokens
    Json,
    /// Shell script, checked for the executable bit
    Script,
}

/// A single required template artifact
#[derive(Debug, Clone, Copy)]
pub struct TemplateFile {
    /// Filename relative to the target repository root
    pub name: &'static str,
    pub kind: ArtifactKind,
    /// Embedded default content
    default_content: &'static str,
    /// Whether the deployed copy gets the executable bit (Unix)
    pub executable: bool,
}

impl TemplateFile {
    /// Resolve template content, preferring a file of the same name in the
    /// override directory when one is configured. A configured override
    /// directory that lacks the file is an error, reported before any
    /// deployment begins.
    pub fn resolve_content(&self, override_dir: Option<&Path>) -> Result<String> {
        match override_dir {
            Some(dir) => {
                let path = dir.join(self.name);
                std::fs::read_to_string(&path).with_context(|| {
                    format!("Template override not found: {}", path.display())
                })
            }
            None => Ok(self.default_content.to_string()),
        }
    }
}

/// The required file set, in deploy order
pub const REQUIRED_FILES: &[TemplateFile] = &[
    TemplateFile {
        name: "CLAUDE.md",
        kind: ArtifactKind::Markdown,
        default_content: TPL_CONTEXT,
        executable: false,
    },
    TemplateFile {
        name: "claude-config.json",
        kind: ArtifactKind::Json,
        default_content: TPL_CONFIG,
        executable: false,
    },
    TemplateFile {
        name: "claude-rules.md",
        kind: ArtifactKind::Markdown,
        default_content: TPL_RULES,
        executable: false,
    },
    TemplateFile {
        name: "claude-health-check.sh",
        kind: ArtifactKind::Script,
        default_content: TPL_HEALTH_CHECK,
        executable: true,
    },
];

/// Look up a required file by name
pub fn required_file(name: &str) -> Option<&'static TemplateFile> {
    REQUIRED_FILES.iter().find(|f| f.name == name)
}
