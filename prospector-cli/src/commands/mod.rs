//! CLI command implementations.

pub mod hunt;
pub mod limits;
pub mod sources;
pub mod state;

use anyhow::Result;
use prospector_core::SourceKind;
use prospector_limiter::{load_state, RateLimiter};
use prospector_sources::SourceRegistry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Builds the limiter with every source's default budget and restores any
/// persisted state.
pub async fn load_limiter(state_path: &Path) -> Result<Arc<RateLimiter>> {
    let limits: HashMap<SourceKind, _> = SourceKind::all()
        .iter()
        .filter(|kind| !kind.is_manual())
        .map(|&kind| (kind, SourceRegistry::default_limits(kind)))
        .collect();

    let limiter = Arc::new(RateLimiter::new(limits));
    load_state(&limiter, state_path).await?;
    Ok(limiter)
}

/// Parses a source selection argument.
///
/// `None` or `"all"` selects every API-backed source; otherwise the value
/// is a comma-separated list of CLI names.
pub fn parse_source_selection(arg: Option<&String>) -> Result<Vec<SourceKind>> {
    match arg.map(|s| s.to_lowercase()).as_deref() {
        None | Some("all") => Ok(SourceRegistry::all().iter().map(|d| d.id).collect()),
        Some(names) => {
            let mut sources = Vec::new();
            for name in names.split(',') {
                let name = name.trim();
                match SourceKind::from_cli_name(name) {
                    Some(kind) => sources.push(kind),
                    None => anyhow::bail!("Unknown source: {}", name),
                }
            }
            if sources.is_empty() {
                anyhow::bail!("No valid sources specified");
            }
            Ok(sources)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
