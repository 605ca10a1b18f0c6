use crate::deployer::{Action, DeployMode, DeployPlan, Deployer};
use crate::models::ToolConfig;
use crate::Result;
use colored::Colorize;
use dialoguer::Confirm;
use std::env;
use std::path::Path;

pub fn run(replace: bool, yes: bool, dry_run: bool) -> Result<()> {
    let target = env::current_dir()?;
    run_impl(&target, replace, yes, dry_run)
}

/// Internal implementation that accepts the target for testability.
/// This prevents tests from mutating the global CWD.
pub(crate) fn run_impl(target: &Path, replace: bool, yes: bool, dry_run: bool) -> Result<()> {
    let config = ToolConfig::load(target)?;
    let mode = if replace {
        DeployMode::Replace
    } else {
        DeployMode::SkipExisting
    };

    let deployer = Deployer::new(target, mode).with_override_dir(config.template_dir(target));
    let plan = deployer.plan()?;

    if dry_run {
        println!("{}", "🚀 Deploying Claude Code files (dry run)...".cyan());
    } else {
        println!("{}", "🚀 Deploying Claude Code files...".cyan());
    }
    println!();
    print_trace(&plan);
    println!();

    if dry_run {
        println!("{}", "Dry run - nothing was written.".yellow());
        return Ok(());
    }

    if plan.replacements() > 0 && !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Overwrite {} existing file(s)? Backups are written first",
                plan.replacements()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Aborted - nothing was written.".yellow());
            return Ok(());
        }
    }

    let summary = deployer.apply(&plan)?;

    println!(
        "{}",
        format!(
            "✅ Done: {} created, {} skipped, {} replaced",
            summary.created, summary.skipped, summary.replaced
        )
        .green()
        .bold()
    );
    for backup in &summary.backups {
        println!("   💾 backup: {}", backup.display());
    }
    if summary.gitignore_updated {
        println!("   ✓ .gitignore updated");
    }
    println!();
    println!(
        "⏭️  Next: fill in the bracketed placeholders, then run {}",
        "claudekit check".cyan()
    );

    Ok(())
}

/// The decision trace, printed identically for real runs and dry runs
fn print_trace(plan: &DeployPlan) {
    for planned in &plan.files {
        match planned.action {
            Action::Create => {
                println!("   {} {}", "+ create ".green(), planned.template.name);
            }
            Action::Skip => {
                println!(
                    "   {} {}",
                    "· skip   ".dimmed(),
                    format!("{} (exists)", planned.template.name).dimmed()
                );
            }
            Action::Replace => {
                println!(
                    "   {} {}",
                    "~ replace".yellow(),
                    format!("{} (backup first)", planned.template.name)
                );
            }
        }
    }
    if plan.gitignore_needs_block {
        println!(
            "   {} .gitignore (append claudekit block)",
            "+ update ".green()
        );
    } else {
        println!("   {}", "· skip    .gitignore (block present)".dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::REQUIRED_FILES;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Full content snapshot of a directory tree
    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut map = BTreeMap::new();
        for entry in walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            map.insert(
                entry.path().to_path_buf(),
                std::fs::read(entry.path()).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_dry_run_never_mutates() {
        let temp = TempDir::new().unwrap();
        // Pre-seed a mix: one existing file, the rest missing
        std::fs::write(temp.path().join("CLAUDE.md"), "# mine").unwrap();

        let before = snapshot(temp.path());
        run_impl(temp.path(), false, true, true).unwrap();
        assert_eq!(before, snapshot(temp.path()));

        // Replace-mode dry run must not mutate either
        run_impl(temp.path(), true, true, true).unwrap();
        assert_eq!(before, snapshot(temp.path()));
    }

    #[test]
    fn test_real_run_deploys_all_files() {
        let temp = TempDir::new().unwrap();
        run_impl(temp.path(), false, true, false).unwrap();

        for template in REQUIRED_FILES {
            assert!(temp.path().join(template.name).exists());
        }
        assert!(temp.path().join(".gitignore").exists());
    }

    #[test]
    fn test_config_override_dir_is_used() {
        let temp = TempDir::new().unwrap();
        let overrides = temp.path().join("overrides");
        std::fs::create_dir_all(&overrides).unwrap();
        for template in REQUIRED_FILES {
            std::fs::write(overrides.join(template.name), "custom content").unwrap();
        }
        std::fs::write(
            temp.path().join("claudekit.toml"),
            "[templates]\ndir = \"overrides\"\n",
        )
        .unwrap();

        run_impl(temp.path(), false, true, false).unwrap();
        let deployed = std::fs::read_to_string(temp.path().join("CLAUDE.md")).unwrap();
        assert_eq!(deployed, "custom content");
    }
}
