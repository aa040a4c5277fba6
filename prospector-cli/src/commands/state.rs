//! State command - export, import, or clear persisted limiter state.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use prospector_limiter::{default_state_path, save_state};
use std::path::PathBuf;

use crate::commands::load_limiter;
use crate::Cli;

/// Arguments for the state command.
#[derive(Args)]
pub struct StateArgs {
    /// What to do with the persisted state.
    #[command(subcommand)]
    pub action: StateAction,

    /// Limiter state file (defaults to the platform data directory).
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,
}

/// State subcommands.
#[derive(Subcommand)]
pub enum StateAction {
    /// Print the current limiter state as JSON.
    Export {
        /// Write to a file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the limiter state from a JSON file.
    Import {
        /// File produced by `state export`.
        file: PathBuf,
    },
    /// Delete the persisted limiter state.
    Clear,
}

/// Runs the state command.
pub async fn run(args: &StateArgs, cli: &Cli) -> Result<()> {
    let state_path = args.state_file.clone().unwrap_or_else(default_state_path);

    match &args.action {
        StateAction::Export { output } => {
            let limiter = load_limiter(&state_path).await?;
            let state = limiter.export_state().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(path, &state)
                        .await
                        .with_context(|| format!("writing {}", path.display()))?;
                    if !cli.quiet {
                        eprintln!("State written to {}", path.display());
                    }
                }
                None => println!("{state}"),
            }
        }
        StateAction::Import { file } => {
            let raw = tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;

            // Import replaces the record set wholesale, discarding
            // whatever was persisted before.
            let limiter = load_limiter(&state_path).await?;
            limiter.import_state(&raw).await;
            save_state(&limiter, &state_path).await?;
            if !cli.quiet {
                eprintln!("State imported from {}", file.display());
            }
        }
        StateAction::Clear => {
            match tokio::fs::remove_file(&state_path).await {
                Ok(()) => {
                    if !cli.quiet {
                        eprintln!("State cleared");
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    if !cli.quiet {
                        eprintln!("No state to clear");
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
