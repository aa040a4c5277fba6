//! Hunt command - run one discovery session.

use anyhow::Result;
use clap::Args;
use prospector_core::{HuntConfig, HuntState, SearchFilters};
use prospector_hunt::HuntOrchestrator;
use prospector_limiter::{default_state_path, save_state};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::commands::{load_limiter, parse_source_selection};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the hunt command.
#[derive(Args, Default)]
pub struct HuntArgs {
    /// Seed company domain.
    #[arg(long, short)]
    pub domain: Option<String>,

    /// Desired contact position/title.
    #[arg(long, short)]
    pub position: Option<String>,

    /// Desired location.
    #[arg(long, short)]
    pub location: Option<String>,

    /// Free-text keywords (comma-separated).
    #[arg(long, short)]
    pub keywords: Option<String>,

    /// Sources to hunt (comma-separated, or "all").
    #[arg(long, short)]
    pub source: Option<String>,

    /// Maximum leads collected from any single source.
    #[arg(long, default_value = "25")]
    pub max_results: usize,

    /// Ignore rate-limit budgets (plain round-robin over sources).
    #[arg(long)]
    pub ignore_limits: bool,

    /// Limiter state file (defaults to the platform data directory).
    #[arg(long)]
    pub state_file: Option<PathBuf>,
}

/// Runs the hunt command.
pub async fn run(args: &HuntArgs, cli: &Cli) -> Result<()> {
    let filters = build_filters(args)?;
    let sources = parse_source_selection(args.source.as_ref())?;

    let state_path = args.state_file.clone().unwrap_or_else(default_state_path);
    let limiter = load_limiter(&state_path).await?;

    let mut config = HuntConfig::new(filters, sources);
    config.max_results_per_source = args.max_results;
    config.respect_rate_limits = !args.ignore_limits;

    let (progress_tx, mut progress_rx) = mpsc::channel(64);
    let orchestrator =
        HuntOrchestrator::new(config, Arc::clone(&limiter)).with_progress(progress_tx);

    if orchestrator.source_count() == 0 {
        if !cli.quiet {
            eprintln!("No usable source configured, set the API key environment variables");
            for (kind, reason) in orchestrator.rejected_sources() {
                eprintln!("  {kind}: {reason}");
            }
        }
        std::process::exit(ExitCode::SourceMissing as i32);
    }

    // Ctrl-C aborts at the next suspension point
    let cancel = orchestrator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, aborting hunt");
            cancel.cancel();
        }
    });

    let show_progress = !cli.quiet && cli.format == OutputFormat::Text;
    let progress_task = tokio::spawn(async move {
        while let Some(snapshot) = progress_rx.recv().await {
            if show_progress {
                let current = snapshot
                    .current_source
                    .map_or_else(|| "-".to_string(), |s| s.to_string());
                eprintln!(
                    "  {} leads | {} of {} sources done | current: {}",
                    snapshot.total_leads,
                    snapshot.completed_sources.len(),
                    snapshot.source_stats.len(),
                    current
                );
            }
        }
    });

    info!("Starting hunt");
    let result = orchestrator.run().await;
    // The progress sender is dropped with the orchestrator
    let _ = progress_task.await;

    save_state(&limiter, &state_path).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_result(&result));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&result)?);
        }
    }

    if result.state == HuntState::Aborted && !cli.quiet {
        eprintln!("Hunt aborted, partial results shown");
    }

    Ok(())
}

/// Builds search filters, requiring at least one criterion.
fn build_filters(args: &HuntArgs) -> Result<SearchFilters> {
    let keywords: Vec<String> = args
        .keywords
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

    if args.domain.is_none() && args.position.is_none() && keywords.is_empty() {
        anyhow::bail!("At least one of --domain, --position, or --keywords is required");
    }

    Ok(SearchFilters {
        domain: args.domain.clone(),
        keywords,
        position: args.position.clone(),
        location: args.location.clone(),
        page: 1,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_require_a_criterion() {
        assert!(build_filters(&HuntArgs::default()).is_err());
    }

    #[test]
    fn test_filters_parse_keywords() {
        let args = HuntArgs {
            keywords: Some("fintech, payments,, ".to_string()),
            ..HuntArgs::default()
        };
        let filters = build_filters(&args).unwrap();
        assert_eq!(filters.keywords, vec!["fintech", "payments"]);
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn test_filters_carry_domain_and_position() {
        let args = HuntArgs {
            domain: Some("example.com".to_string()),
            position: Some("CTO".to_string()),
            ..HuntArgs::default()
        };
        let filters = build_filters(&args).unwrap();
        assert_eq!(filters.domain.as_deref(), Some("example.com"));
        assert_eq!(filters.position.as_deref(), Some("CTO"));
    }
}
