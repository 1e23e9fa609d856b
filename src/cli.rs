//! CLI interface for issuebot.
//!
//! Two commands:
//!
//! - `issuebot sync <rate>` — one reconciliation pass against the tracker.
//! - `issuebot evaluate <rate> [file]` — evaluate a single comment body
//!   locally, without touching the tracker.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::evaluate::evaluate;
use crate::irr;
use crate::report::Markdown;
use crate::sync;
use crate::tracker::{GhTracker, host_from_url};

/// issuebot — rank open issues by internal rate of return.
#[derive(Debug, Parser)]
#[command(name = "issuebot", after_long_help = DIRECTIVE_HELP)]
pub struct Cli {
    /// Log per-issue and per-comment progress.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

const DIRECTIVE_HELP: &str = r"Directive syntax (in any issue comment):
  Optional notes...
  irr <cost> <cost_term_days> <benefit> <benefit_term_days>

Example:
  Caching deps saves an hour a day.
  irr 100 0 150 365

sync rewrites each such comment with the computed figures, closed by an
`irrend` line, and publishes the ranking to the issue titled 'issuebot report'.";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan open issues, rewrite directive comments, and publish the report.
    ///
    /// Every matched comment and the report issue are overwritten on every
    /// run. Safe to rerun after a failure.
    Sync {
        /// Discount rate as a fraction (e.g. `0.08` for 8%).
        #[arg(value_parser = parse_rate, allow_negative_numbers = true)]
        rate: f64,

        /// Config file (defaults to `~/.issuebot/config.toml`).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate one comment body and print its rewrite.
    ///
    /// Reads the body from FILE, or stdin when omitted.
    Evaluate {
        /// Discount rate as a fraction (e.g. `0.08` for 8%).
        #[arg(value_parser = parse_rate, allow_negative_numbers = true)]
        rate: f64,

        /// File holding the comment body.
        file: Option<PathBuf>,

        /// Report issue number to link back to.
        #[arg(long, default_value_t = 0)]
        report: u64,

        /// Print the computed result as JSON instead of the rewritten body.
        #[arg(long)]
        json: bool,
    },
}

/// Parse and validate a discount rate argument.
fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    irr::validate_rate(rate).map_err(|e| e.to_string())?;
    Ok(rate)
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Sync { rate, config } => cmd_sync(rate, config.as_deref()),
        Command::Evaluate {
            rate,
            file,
            report,
            json,
        } => cmd_evaluate(rate, file.as_deref(), report, json),
    }
}

fn cmd_sync(rate: f64, config: Option<&Path>) -> Result<(), String> {
    let config = Config::load(config)?;

    let config_dir = match &config.identity {
        Some(identity) => Some(gh_config_dir(identity)?),
        None => None,
    };

    let host = config.url.as_deref().map(host_from_url).transpose()?;

    let mut tracker = GhTracker::new(&config.owner, &config.repo)
        .with_host(host)
        .with_token(config.token())
        .with_config_dir(config_dir);

    let summary = sync::run(&mut tracker, rate).map_err(|e| format!("sync failed: {e}"))?;

    eprintln!(
        "Synced {} issue(s): {} directive(s), {} skipped → report #{}",
        summary.issues, summary.computed, summary.skipped, summary.report
    );
    if summary.created_report {
        eprintln!("Created report issue #{}", summary.report);
    }

    Ok(())
}

fn cmd_evaluate(rate: f64, file: Option<&Path>, report: u64, json: bool) -> Result<(), String> {
    let text = match file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            text
        }
    };

    let evaluation = evaluate(rate, &text, report, &Markdown)
        .map_err(|e| e.to_string())?
        .ok_or("no irr directive found")?;

    if json {
        let json = serde_json::to_string_pretty(&evaluation.result)
            .map_err(|e| format!("failed to serialize result: {e}"))?;
        println!("{json}");
    } else {
        print!("{}", evaluation.body);
    }

    Ok(())
}

/// Resolve the `GH_CONFIG_DIR` for a given identity.
///
/// Each identity has its own config directory under
/// `~/.issuebot/gh-config/<identity>/`. The directory must exist and contain
/// valid `gh` auth.
fn gh_config_dir(identity: &str) -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("could not determine home directory")?;
    let config_dir = home.join(".issuebot").join("gh-config").join(identity);
    if !config_dir.exists() {
        return Err(format!(
            "no GitHub config for identity '{identity}' — \
             expected directory at {}\n\
             Set up with: GH_CONFIG_DIR={} gh auth login",
            config_dir.display(),
            config_dir.display(),
        ));
    }
    Ok(config_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_accepts_fraction() {
        assert_eq!(parse_rate("0.08").unwrap(), 0.08);
        assert_eq!(parse_rate("-0.5").unwrap(), -0.5);
    }

    #[test]
    fn rate_rejects_garbage() {
        assert!(parse_rate("eight").unwrap_err().contains("not a number"));
    }

    #[test]
    fn rate_rejects_minus_one_and_below() {
        assert!(parse_rate("-1").is_err());
        assert!(parse_rate("-3").is_err());
        assert!(parse_rate("NaN").is_err());
    }

    #[test]
    fn parses_sync_command() {
        let cli = Cli::try_parse_from(["issuebot", "sync", "0.08", "--config", "c.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Sync { rate, config: Some(_) } if rate == 0.08
        ));
    }

    #[test]
    fn parses_evaluate_command() {
        let cli =
            Cli::try_parse_from(["issuebot", "-v", "evaluate", "0.1", "--report", "4", "--json"])
                .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Evaluate {
                file: None,
                report: 4,
                json: true,
                ..
            }
        ));
    }

    #[test]
    fn evaluate_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("comment.md");
        fs::write(&path, "irr 100 0 150 365\n").unwrap();

        assert!(cmd_evaluate(0.08, Some(&path), 1, true).is_ok());
    }

    #[test]
    fn sync_rejects_non_github_url_before_any_request() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "owner = \"acme\"\nrepo = \"widgets\"\nurl = \"https://git.acme.dev/api/v1\"\n",
        )
        .unwrap();

        let err = cmd_sync(0.08, Some(&path)).unwrap_err();
        assert!(err.contains("unsupported API path /api/v1"), "{err}");
    }

    #[test]
    fn evaluate_without_directive_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("comment.md");
        fs::write(&path, "just chatting").unwrap();

        let err = cmd_evaluate(0.08, Some(&path), 1, false).unwrap_err();
        assert_eq!(err, "no irr directive found");
    }
}
