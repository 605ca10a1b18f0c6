//! Per-file health checks

use crate::manifest::{ArtifactKind, TemplateFile};
use crate::models::FileCheck;
use regex::Regex;
use std::path::Path;

/// Whether a JSON parser is available for config validation
///
/// Always `Available` in production (serde_json is compiled in); tests force
/// `Unavailable` to exercise the assume-valid degradation deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonCapability {
    Available,
    Unavailable,
}

/// Bracketed placeholder tokens left over from the templates, e.g.
/// `[PROJECT_NAME]`
pub fn has_placeholder_tokens(content: &str) -> bool {
    let re = Regex::new(r"\[[A-Z][A-Z0-9_]*\]").unwrap();
    re.is_match(content)
}

/// Run every applicable check for one required file
pub fn check_file(target: &Path, template: &TemplateFile, json: JsonCapability) -> FileCheck {
    let path = target.join(template.name);
    if !path.exists() {
        return FileCheck::missing(template.name);
    }

    let mut issues = Vec::new();

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            issues.push(format!("unreadable: {}", e));
            return FileCheck::found(template.name, issues);
        }
    };

    if content.is_empty() {
        issues.push("empty file".to_string());
        return FileCheck::found(template.name, issues);
    }

    match template.kind {
        ArtifactKind::Json => {
            if json == JsonCapability::Available {
                if let Err(e) = serde_json::from_str::<serde_json::Value>(&content) {
                    issues.push(format!("invalid JSON: {}", e));
                }
            }
            if has_placeholder_tokens(&content) {
                issues.push("placeholder tokens present".to_string());
            }
        }
        ArtifactKind::Markdown => {
            if has_placeholder_tokens(&content) {
                issues.push("placeholder tokens present".to_string());
            }
        }
        ArtifactKind::Script => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let executable = std::fs::metadata(&path)
                    .map(|m| m.permissions().mode() & 0o111 != 0)
                    .unwrap_or(false);
                if !executable {
                    issues.push("not executable".to_string());
                }
            }
        }
    }

    FileCheck::found(template.name, issues)
}
