use crate::models::ToolConfig;
use crate::usage::{self, UsageReport};
use crate::Result;
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};

pub fn run(days: u64, csv: bool) -> Result<()> {
    let cwd = env::current_dir()?;
    run_impl(&cwd, days, csv)
}

pub(crate) fn run_impl(cwd: &Path, days: u64, csv: bool) -> Result<()> {
    let report = build_report(cwd, days)?;

    println!(
        "{}",
        format!("📊 Usage estimate, last {} day(s)", report.window_days).cyan()
    );
    println!();

    if report.no_logs_found() {
        println!(
            "{}",
            "⚠️  No log files found in the conventional locations - reporting zero usage"
                .yellow()
        );
    } else {
        for file in &report.files {
            println!(
                "   {:<50} {:>6} request(s)  {:>4} error(s)",
                file.path.display(),
                file.requests,
                file.errors
            );
        }
    }

    println!();
    println!(
        "   Requests: {}   Errors/failures: {}",
        report.total_requests, report.total_errors
    );
    println!(
        "{}",
        format!("   Estimated cost: ${:.2}", report.estimated_cost_usd)
            .green()
            .bold()
    );
    println!(
        "   {}",
        "Estimate assumes a fixed token split per request; actual costs vary.".dimmed()
    );

    if csv {
        let path = usage::export_csv(&report, cwd)?;
        println!();
        println!("{}", format!("📄 CSV written to {}", path.display()).green());
    }

    Ok(())
}

/// Load the config, resolve relative log dirs against the invocation
/// directory, and scan.
fn build_report(cwd: &Path, days: u64) -> Result<UsageReport> {
    let config = ToolConfig::load(cwd)?;
    let extra: Vec<PathBuf> = config
        .usage
        .log_dirs
        .iter()
        .map(|d| if d.is_absolute() { d.clone() } else { cwd.join(d) })
        .collect();
    let dirs = usage::candidate_log_dirs(&extra);
    Ok(usage::scan(&dirs, days))
}
