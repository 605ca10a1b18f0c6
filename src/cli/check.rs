use crate::models::{CheckReport, FileStatus};
use crate::validator::{JsonCapability, Validator};
use crate::Result;
use colored::Colorize;
use std::env;
use std::path::Path;

/// Returns the completeness flag so main can map it to the exit code.
/// `--json` mode always reports complete so pipelines can consume the
/// report and branch on its fields instead.
pub fn run(json: bool) -> Result<bool> {
    let target = env::current_dir()?;
    run_impl(&target, json, JsonCapability::Available)
}

pub(crate) fn run_impl(target: &Path, json: bool, capability: JsonCapability) -> Result<bool> {
    let report = Validator::new(target)
        .with_json_capability(capability)
        .run();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(true);
    }

    println!("{}", "🔍 Checking Claude Code setup...".cyan());
    println!();

    if capability == JsonCapability::Unavailable {
        println!(
            "{}",
            "⚠️  JSON validation unavailable - assuming claude-config.json is valid".yellow()
        );
    }

    print_report(&report);
    Ok(report.complete)
}

fn print_report(report: &CheckReport) {
    for file in &report.files {
        let line = format!("{} {}", file.status.symbol(), file.name);
        match file.status {
            FileStatus::FoundValid => println!("   {}", line.green()),
            FileStatus::FoundWithIssues => {
                println!("   {}", line.yellow());
                for issue in &file.issues {
                    println!("      - {}", issue.dimmed());
                }
            }
            FileStatus::Missing => println!("   {}", line.red()),
        }
    }

    println!();
    println!(
        "   Found: {}/{}   With issues: {}   Missing: {}",
        report.found,
        report.files.len(),
        report.with_issues,
        report.missing
    );

    let marker = if report.gitignore_marker_present {
        "✓ .gitignore carries the claudekit block".green()
    } else {
        "✗ .gitignore is missing the claudekit block".yellow()
    };
    println!("   {}", marker);

    match (report.repo.is_git_repo, report.repo.uncommitted_changes) {
        (true, Some(0)) => println!("   {}", "✓ git repository, working tree clean".green()),
        (true, Some(n)) => println!(
            "   {}",
            format!("⚠ git repository, {} uncommitted change(s)", n).yellow()
        ),
        (true, None) => println!("   {}", "⚠ git repository, status unavailable".yellow()),
        (false, _) => println!("   {}", "✗ not a git repository".red()),
    }

    println!();
    if report.complete {
        println!("{}", "✅ Setup complete".green().bold());
    } else {
        println!("{}", "❌ Setup incomplete".red().bold());
        println!(
            "   Run {} to deploy the missing files",
            "claudekit init".cyan()
        );
    }
}
