// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Prospector CLI - rate-limited multi-source lead discovery.
//!
//! # Examples
//!
//! ```bash
//! # Hunt for leads at a domain across all configured sources
//! prospector hunt --domain example.com
//!
//! # Hunt specific sources with a title filter
//! prospector hunt --domain example.com --position CTO --source hunter,apollo
//!
//! # Show per-source budgets (default if no command given)
//! prospector limits
//!
//! # List sources and whether they are configured
//! prospector sources
//!
//! # Persist/restore limiter state by hand
//! prospector state export
//! prospector state import backup.json
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{hunt, limits, sources, state};

// ============================================================================
// CLI Definition
// ============================================================================

/// Prospector CLI - multi-source lead discovery.
#[derive(Parser)]
#[command(name = "prospector")]
#[command(about = "Rate-limited multi-source lead discovery CLI")]
#[command(long_about = r#"
Prospector runs bounded discovery sessions ("hunts") across several
contact-discovery providers, pacing requests to stay inside each
provider's rate-limit contract.

Supported sources:
  • Hunter.io (hunter)
  • Apollo.io (apollo)
  • Snov.io (snov)
  • Clearbit Prospector (clearbit)
  • Manual entry (manual)

Credentials come from environment variables (see `prospector sources`).

Examples:
  prospector hunt --domain example.com       # All configured sources
  prospector hunt -d example.com -s hunter   # One source
  prospector limits                          # Budget overview
  prospector --format json limits            # JSON output
"#)]
#[command(version)]
#[command(author = "Prospector Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'limits' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run a discovery session across the configured sources.
    #[command(visible_alias = "h")]
    Hunt(hunt::HuntArgs),

    /// Show per-source rate-limit budgets.
    #[command(visible_alias = "l")]
    Limits(limits::LimitsArgs),

    /// List available sources and their configuration status.
    #[command(visible_alias = "s")]
    Sources,

    /// Export, import, or clear persisted limiter state.
    State(state::StateArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// No usable source was configured.
    SourceMissing = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("prospector=debug,info")
    } else {
        EnvFilter::new("prospector=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Hunt(args)) => hunt::run(args, &cli).await,
        Some(Commands::Limits(args)) => limits::run(args, &cli).await,
        Some(Commands::Sources) => sources::run(&cli),
        Some(Commands::State(args)) => state::run(args, &cli).await,
        None => {
            // Default to the budget overview
            limits::run(&limits::LimitsArgs::default(), &cli).await
        }
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
