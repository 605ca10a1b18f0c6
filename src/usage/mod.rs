//! Usage estimator - crude counters over local text logs
//!
//! The estimate is a crude approximation: it greps log lines for request
//! and error markers and multiplies by a fixed per-request cost. It knows
//! nothing about real token counts or structured log schemas.

use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

pub const DEFAULT_LOOKBACK_DAYS: u64 = 7;

// Cost assumptions: a typical request is taken to spend a fixed token split,
// priced at fixed per-1000-token rates.
const ASSUMED_INPUT_TOKENS_PER_REQUEST: f64 = 1500.0;
const ASSUMED_OUTPUT_TOKENS_PER_REQUEST: f64 = 800.0;
const INPUT_COST_PER_1K_TOKENS_USD: f64 = 0.003;
const OUTPUT_COST_PER_1K_TOKENS_USD: f64 = 0.015;

/// Estimated cost of one request under the fixed assumptions
pub fn cost_per_request() -> f64 {
    ASSUMED_INPUT_TOKENS_PER_REQUEST / 1000.0 * INPUT_COST_PER_1K_TOKENS_USD
        + ASSUMED_OUTPUT_TOKENS_PER_REQUEST / 1000.0 * OUTPUT_COST_PER_1K_TOKENS_USD
}

/// Counters for a single log file
#[derive(Debug, Clone, Serialize)]
pub struct LogFileCounts {
    pub path: PathBuf,
    pub requests: usize,
    pub errors: usize,
}

/// Aggregated usage estimate over the lookback window
#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub window_days: u64,
    pub files: Vec<LogFileCounts>,
    pub total_requests: usize,
    pub total_errors: usize,
    pub estimated_cost_usd: f64,
}

impl UsageReport {
    pub fn no_logs_found(&self) -> bool {
        self.files.is_empty()
    }

    /// Per-file rows plus a totals row
    pub fn to_csv(&self) -> String {
        let mut out = String::from("file,requests,errors\n");
        for file in &self.files {
            out.push_str(&format!(
                "{},{},{}\n",
                file.path.display(),
                file.requests,
                file.errors
            ));
        }
        out.push_str(&format!(
            "total,{},{}\nestimated_cost_usd,{:.4},\n",
            self.total_requests, self.total_errors, self.estimated_cost_usd
        ));
        out
    }

    /// Export filename with an embedded timestamp
    pub fn csv_filename() -> String {
        format!("claude-usage-{}.csv", Local::now().format("%Y%m%d-%H%M%S"))
    }
}

/// Conventional log locations, plus any configured extras
pub fn candidate_log_dirs(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".claude/logs"));
        dirs.push(home.join(".config/claude/logs"));
        dirs.push(home.join(".claudekit/logs"));
    }
    dirs.extend(extra.iter().cloned());
    dirs
}

/// Count lines mentioning a request and lines mentioning an error/failure
/// (case-insensitive substring match, one count per line)
pub fn count_matches(content: &str) -> (usize, usize) {
    let mut requests = 0;
    let mut errors = 0;
    for line in content.lines() {
        let lower = line.to_ascii_lowercase();
        if lower.contains("request") {
            requests += 1;
        }
        if lower.contains("error") || lower.contains("failed") {
            errors += 1;
        }
    }
    (requests, errors)
}

/// Collect `*.log` files in the candidate directories, recursing one level
/// into subdirectories, keeping only files modified inside the window.
fn collect_log_files(dirs: &[PathBuf], cutoff: SystemTime) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(dir)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "log"))
        {
            let recent = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(|mtime| mtime >= cutoff)
                .unwrap_or(false);
            if recent {
                files.push(entry.path().to_path_buf());
            }
        }
    }
    files.sort();
    files
}

/// Scan the given directories and build the usage estimate
pub fn scan(dirs: &[PathBuf], window_days: u64) -> UsageReport {
    let cutoff = SystemTime::now() - Duration::from_secs(window_days * 24 * 60 * 60);
    scan_with_cutoff(dirs, window_days, cutoff)
}

fn scan_with_cutoff(dirs: &[PathBuf], window_days: u64, cutoff: SystemTime) -> UsageReport {
    let mut files = Vec::new();
    let mut total_requests = 0;
    let mut total_errors = 0;

    for path in collect_log_files(dirs, cutoff) {
        // Unreadable files count as zero
        let (requests, errors) = std::fs::read_to_string(&path)
            .map(|content| count_matches(&content))
            .unwrap_or((0, 0));

        total_requests += requests;
        total_errors += errors;
        files.push(LogFileCounts {
            path,
            requests,
            errors,
        });
    }

    UsageReport {
        window_days,
        files,
        total_requests,
        total_errors,
        estimated_cost_usd: total_requests as f64 * cost_per_request(),
    }
}

/// Write the CSV export into `dir`, returning its path
pub fn export_csv(report: &UsageReport, dir: &Path) -> std::io::Result<PathBuf> {
    let path = dir.join(UsageReport::csv_filename());
    std::fs::write(&path, report.to_csv())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_count_matches() {
        let log = "\
2026-08-01 sending request to api\n\
2026-08-01 response ok\n\
2026-08-01 Request retried after ERROR: timeout\n\
2026-08-01 upload failed\n";
        let (requests, errors) = count_matches(log);
        assert_eq!(requests, 2);
        assert_eq!(errors, 2);
    }

    #[test]
    fn test_cost_per_request_is_positive_and_small() {
        let cost = cost_per_request();
        assert!(cost > 0.0);
        assert!(cost < 1.0);
    }

    #[test]
    fn test_scan_counts_across_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.log"), "request\nrequest\n").unwrap();
        std::fs::write(temp.path().join("b.log"), "request\nerror\n").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "request\n").unwrap();

        let report = scan(&[temp.path().to_path_buf()], 7);
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.total_requests, 3);
        assert_eq!(report.total_errors, 1);
        assert!((report.estimated_cost_usd - 3.0 * cost_per_request()).abs() < 1e-9);
    }

    #[test]
    fn test_scan_recurses_one_level() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("api");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("requests.log"), "request\n").unwrap();

        let report = scan(&[temp.path().to_path_buf()], 7);
        assert_eq!(report.total_requests, 1);
    }

    #[test]
    fn test_missing_dirs_yield_empty_report() {
        let temp = TempDir::new().unwrap();
        let report = scan(&[temp.path().join("nope")], 7);
        assert!(report.no_logs_found());
        assert_eq!(report.total_requests, 0);
        assert_eq!(report.estimated_cost_usd, 0.0);
    }

    #[test]
    fn test_files_outside_window_excluded() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.log"), "request\n").unwrap();

        // A cutoff in the future excludes everything
        let future = SystemTime::now() + Duration::from_secs(60);
        let report = scan_with_cutoff(&[temp.path().to_path_buf()], 7, future);
        assert!(report.no_logs_found());
    }

    #[test]
    fn test_csv_shape() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.log"), "request\nfailed\n").unwrap();

        let report = scan(&[temp.path().to_path_buf()], 7);
        let csv = report.to_csv();
        assert!(csv.starts_with("file,requests,errors\n"));
        assert!(csv.contains("a.log,1,1\n"));
        assert!(csv.contains("total,1,1\n"));

        let path = export_csv(&report, temp.path()).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("claude-usage-"));
        assert!(path.exists());
    }
}
