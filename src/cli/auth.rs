use crate::models::AuthMode;
use crate::state::AuthStore;
use crate::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Credential variable gating the api mode
pub const CREDENTIAL_VAR: &str = "ANTHROPIC_API_KEY";

/// Shell profiles scanned for leftover credential exports
const SHELL_PROFILES: &[&str] = &[".bashrc", ".zshrc", ".profile"];

/// Clipboard helpers, tried in order; degrade to print-only when none work
const CLIPBOARD_TOOLS: &[&str] = &["pbcopy", "wl-copy", "xclip"];

const CLIPBOARD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Show the recorded auth mode and the live credential state
    Status,

    /// Switch between api and subscription auth
    Switch {
        /// Target mode: api or subscription
        mode: AuthMode,

        /// Skip the shell-profile edit confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn run(cmd: AuthCommands) -> Result<()> {
    let store = AuthStore::default_location()?;
    match cmd {
        AuthCommands::Status => status(&store),
        AuthCommands::Switch { mode, yes } => switch(&store, mode, yes),
    }
}

fn status(store: &AuthStore) -> Result<()> {
    let record = store.load();
    let key_set = std::env::var(CREDENTIAL_VAR).is_ok();

    println!("{}", "🔑 Auth mode".cyan().bold());
    println!();
    println!("   Mode:      {}", record.mode);
    println!("   Recorded:  {}", record.timestamp.to_rfc3339());
    println!(
        "   {}: {}",
        CREDENTIAL_VAR,
        if key_set { "set" } else { "not set" }
    );

    match (record.mode, key_set) {
        (AuthMode::Subscription, true) => println!(
            "\n{}",
            format!(
                "⚠️  {} is set but subscription mode is recorded - the key may take precedence",
                CREDENTIAL_VAR
            )
            .yellow()
        ),
        (AuthMode::Api, false) => println!(
            "\n{}",
            format!("⚠️  api mode is recorded but {} is not set", CREDENTIAL_VAR).yellow()
        ),
        _ => {}
    }

    Ok(())
}

fn switch(store: &AuthStore, mode: AuthMode, yes: bool) -> Result<()> {
    println!("{}", format!("🔄 Switching auth mode to {}...", mode).cyan());

    match mode {
        AuthMode::Subscription => scrub_credential_exports(yes)?,
        AuthMode::Api => {
            let line = format!("export {}=<your-key>", CREDENTIAL_VAR);
            println!("   Add your key to the shell environment:");
            println!("      {}", line.cyan());
            if copy_to_clipboard(&line) {
                println!("   {}", "(copied to clipboard)".dimmed());
            }
        }
        AuthMode::Unknown => {}
    }

    let record = store.save(mode)?;
    println!(
        "{}",
        format!("✅ Auth mode set to {} ({})", record.mode, store.path().display()).green()
    );
    Ok(())
}

/// Comment out `export ANTHROPIC_API_KEY=...` lines in the conventional
/// shell profiles so the key stops shadowing subscription auth.
fn scrub_credential_exports(yes: bool) -> Result<()> {
    let Some(home) = dirs::home_dir() else {
        println!(
            "{}",
            "⚠️  Could not resolve home directory - skipping profile cleanup".yellow()
        );
        return Ok(());
    };

    let mut pending: Vec<(PathBuf, String, usize)> = Vec::new();
    for profile in SHELL_PROFILES {
        let path = home.join(profile);
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        let (scrubbed, hits) = comment_out_exports(&content, CREDENTIAL_VAR);
        if hits > 0 {
            pending.push((path, scrubbed, hits));
        }
    }

    if pending.is_empty() {
        println!("   No credential exports found in shell profiles");
        return Ok(());
    }

    for (path, _, hits) in &pending {
        println!(
            "   {} {} export line(s) in {}",
            "~".yellow(),
            hits,
            path.display()
        );
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Comment out these export lines?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("   Skipping profile cleanup");
            return Ok(());
        }
    }

    for (path, scrubbed, _) in pending {
        std::fs::write(&path, scrubbed)?;
        println!("   ✓ updated {}", path.display());
    }
    println!(
        "   {}",
        "Open shells keep the old environment until restarted".dimmed()
    );
    Ok(())
}

/// Prefix matching export lines with `# `, preserving everything else.
/// Returns the rewritten content and the number of lines touched.
pub(crate) fn comment_out_exports(content: &str, var: &str) -> (String, usize) {
    let prefix = format!("export {}=", var);
    let mut out = String::with_capacity(content.len());
    let mut hits = 0;

    for line in content.lines() {
        if line.trim_start().starts_with(&prefix) {
            out.push_str("# ");
            hits += 1;
        }
        out.push_str(line);
        out.push('\n');
    }
    (out, hits)
}

/// Best-effort clipboard copy through the first tool that spawns, guarded
/// by a fixed timeout so a wedged helper cannot hang the switch.
fn copy_to_clipboard(text: &str) -> bool {
    for tool in CLIPBOARD_TOOLS {
        let mut command = Command::new(tool);
        if *tool == "xclip" {
            command.args(["-selection", "clipboard"]);
        }
        let Ok(mut child) = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        else {
            continue;
        };

        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(text.as_bytes());
        }

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return status.success(),
                Ok(None) if started.elapsed() > CLIPBOARD_TIMEOUT => {
                    let _ = child.kill();
                    return false;
                }
                Ok(None) => std::thread::sleep(Duration::from_millis(50)),
                Err(_) => return false,
            }
        }
    }
    false
}
