use crate::git;
use crate::models::SessionRecord;
use crate::state::{capture_record, SessionStore, RETENTION_DAYS};
use crate::Result;
use clap::Subcommand;
use colored::Colorize;
use std::env;
use std::path::Path;

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Snapshot the current repository state
    Save {
        /// Session name (derived from the current time when omitted)
        name: Option<String>,

        /// Free-form notes stored with the record
        #[arg(long)]
        notes: Option<String>,

        /// Overwrite an existing session of the same name
        #[arg(short, long)]
        force: bool,
    },

    /// List saved sessions, newest first
    List,

    /// Print a saved session in full
    Show {
        /// Session name
        name: String,
    },

    /// Compare a saved session against the live repository state
    Resume {
        /// Session name
        name: String,
    },

    /// Delete a saved session
    Delete {
        /// Session name
        name: String,
    },

    /// Write a markdown export of a session to the repository root
    Export {
        /// Session name
        name: String,
    },

    /// Remove sessions older than the retention window
    Clean,
}

pub fn run(cmd: SessionCommands) -> Result<()> {
    // Every session action requires a work tree; fail before any store I/O
    let cwd = env::current_dir()?;
    let repo = git::discover_repo(&cwd)?;
    let root = git::repo_root(&repo)?;
    let store = SessionStore::new(&root);

    match cmd {
        SessionCommands::Save { name, notes, force } => {
            let name = name.unwrap_or_else(SessionRecord::default_name);
            let record = capture_record(&name, &repo, &root, notes.unwrap_or_default());
            let path = store.save(&record, force)?;

            println!("{}", format!("💾 Saved session '{}'", name).green());
            println!("   branch: {}   commit: {}", record.branch, record.commit);
            println!("   {}", path.display().to_string().dimmed());
        }

        SessionCommands::List => {
            let records = store.list()?;
            if records.is_empty() {
                println!("{}", "No sessions saved yet.".yellow());
                return Ok(());
            }

            println!("{}", "📋 Saved sessions:".cyan());
            println!();
            println!(
                "{:<28} {:<22} {}",
                "Name".bold(),
                "Saved".bold(),
                "Branch".bold()
            );
            for record in records {
                println!(
                    "{:<28} {:<22} {}",
                    record.name,
                    record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    record.branch
                );
            }
        }

        SessionCommands::Show { name } => {
            let record = store.load(&name)?;
            println!("{}", format!("Session: {}", record.name).cyan().bold());
            println!();
            println!("   Repository: {}", record.repository);
            println!("   Saved:      {}", record.timestamp.to_rfc3339());
            println!("   Branch:     {}", record.branch);
            println!("   Commit:     {}", record.commit);
            println!(
                "   CLAUDE.md present:          {}",
                record.context.project_context_present
            );
            println!(
                "   claude-config.json present: {}",
                record.context.claude_config_present
            );
            if !record.notes.is_empty() {
                println!("   Notes:      {}", record.notes);
            }
        }

        SessionCommands::Resume { name } => {
            let record = store.load(&name)?;
            let live_branch = git::head_branch(&repo);
            let live_commit = git::head_commit(&repo);

            println!(
                "{}",
                format!("⏪ Session '{}' vs current state:", name).cyan()
            );
            println!();
            print_comparison("Branch", &record.branch, &live_branch);
            print_comparison("Commit", &record.commit, &live_commit);
            println!("   Saved at: {}", record.timestamp.to_rfc3339());
        }

        SessionCommands::Delete { name } => {
            store.delete(&name)?;
            println!("{}", format!("🗑  Deleted session '{}'", name).green());
        }

        SessionCommands::Export { name } => {
            let path = export_session(&store, &root, &name)?;
            println!(
                "{}",
                format!("📄 Exported session '{}' to {}", name, path.display()).green()
            );
        }

        SessionCommands::Clean => {
            let removed = store.clean()?;
            println!(
                "{}",
                format!(
                    "🧹 Removed {} session(s) older than {} days",
                    removed.len(),
                    RETENTION_DAYS
                )
                .green()
            );
            for name in removed {
                println!("   - {}", name);
            }
        }
    }

    Ok(())
}

fn print_comparison(label: &str, saved: &str, live: &str) {
    if saved == live {
        println!("   {:<8} {} {}", label, saved, "(unchanged)".green());
    } else {
        println!(
            "   {:<8} {} {} {}",
            label,
            saved,
            "→".yellow(),
            format!("{} (changed)", live).yellow()
        );
    }
}

/// Render the markdown export next to the repository root
pub(crate) fn export_session(
    store: &SessionStore,
    repo_root: &Path,
    name: &str,
) -> Result<std::path::PathBuf> {
    let record = store.load(name)?;
    let path = repo_root.join(format!("session-{}.md", name));
    std::fs::write(&path, record.to_markdown())?;
    Ok(path)
}
