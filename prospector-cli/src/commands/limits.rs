//! Limits command - show per-source rate-limit budgets.

use anyhow::Result;
use clap::Args;
use prospector_limiter::default_state_path;
use std::path::PathBuf;

use crate::commands::{load_limiter, parse_source_selection};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the limits command.
#[derive(Args, Default)]
pub struct LimitsArgs {
    /// Sources to show (comma-separated, or "all").
    #[arg(long, short)]
    pub source: Option<String>,

    /// Limiter state file (defaults to the platform data directory).
    #[arg(long)]
    pub state_file: Option<PathBuf>,
}

/// Runs the limits command.
pub async fn run(args: &LimitsArgs, cli: &Cli) -> Result<()> {
    let selection = parse_source_selection(args.source.as_ref())?;
    let state_path = args.state_file.clone().unwrap_or_else(default_state_path);
    let limiter = load_limiter(&state_path).await?;

    let mut statuses = Vec::with_capacity(selection.len());
    for source in selection {
        if source.is_manual() {
            continue;
        }
        statuses.push((source, limiter.get_status(source).await));
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_limits(&statuses));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&statuses)?);
        }
    }

    Ok(())
}
