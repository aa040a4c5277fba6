//! The hunt orchestrator.
//!
//! One instance drives one discovery session: select a source, consume
//! budget, execute one query page, merge unique leads, report progress,
//! repeat. Exactly one source is queried at a time because the protected
//! resource is each provider's global rate budget, and concurrent calls
//! from the same process would race on it.

use prospector_core::{
    HuntConfig, HuntProgress, HuntResult, HuntState, Lead, LeadSource, SourceError, SourceKind,
    SourceStats,
};
use prospector_limiter::RateLimiter;
use prospector_sources::build_sources;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::selector::SourceSelector;

/// How many rate-limit failures one source may accumulate in one hunt
/// before it is retired.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Cross-source cool-down when no source is currently available.
const NO_SOURCE_COOLDOWN: Duration = Duration::from_secs(5);

/// Fallback wait when a rate-limit error carries no retry-after hint.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Inter-call jitter bounds, to reduce provider-side burst detection.
const MIN_JITTER_MS: u64 = 250;
const MAX_JITTER_MS: u64 = 750;

/// Callback invoked with each batch of newly discovered unique leads.
pub type LeadsCallback =
    Box<dyn Fn(&[Lead]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync>;

// ============================================================================
// Hunt Orchestrator
// ============================================================================

/// Drives one hunt from `Running` to `Completed` or `Aborted`.
pub struct HuntOrchestrator {
    config: HuntConfig,
    sources: Vec<Arc<dyn LeadSource>>,
    rejected: Vec<(SourceKind, String)>,
    limiter: Arc<RateLimiter>,
    cancel: CancellationToken,
    state: HuntState,
    progress_tx: Option<mpsc::Sender<HuntProgress>>,
    on_leads_found: Option<LeadsCallback>,
}

impl HuntOrchestrator {
    /// Creates an orchestrator, building source adapters from the config.
    ///
    /// Sources without usable credentials are rejected here and reported
    /// in the final result's stats; they never enter the loop.
    pub fn new(config: HuntConfig, limiter: Arc<RateLimiter>) -> Self {
        let built = build_sources(&config);
        Self {
            config,
            sources: built.sources,
            rejected: built.rejected,
            limiter,
            cancel: CancellationToken::new(),
            state: HuntState::Idle,
            progress_tx: None,
            on_leads_found: None,
        }
    }

    /// Creates an orchestrator over pre-built sources.
    ///
    /// Used when the caller wires its own adapters.
    pub fn with_sources(
        config: HuntConfig,
        sources: Vec<Arc<dyn LeadSource>>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            config,
            sources,
            rejected: Vec::new(),
            limiter,
            cancel: CancellationToken::new(),
            state: HuntState::Idle,
            progress_tx: None,
            on_leads_found: None,
        }
    }

    /// Streams a [`HuntProgress`] snapshot after every loop iteration.
    ///
    /// Snapshots are sent with `try_send`; a slow consumer drops snapshots
    /// rather than stalling the hunt.
    pub fn with_progress(mut self, tx: mpsc::Sender<HuntProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Invokes `callback` with each batch of new unique leads, at most once
    /// per lead per hunt. A callback error is logged and the hunt continues.
    pub fn with_leads_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[Lead]) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
            + Send
            + Sync
            + 'static,
    {
        self.on_leads_found = Some(Box::new(callback));
        self
    }

    /// A token the caller can use to cancel the hunt. Cancellation takes
    /// effect at the next suspension point, not mid-call.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Number of usable sources this hunt will loop over.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Sources rejected at construction, with the reason.
    pub fn rejected_sources(&self) -> &[(SourceKind, String)] {
        &self.rejected
    }

    /// Current lifecycle state: `Idle` until [`run`](Self::run) is called.
    pub fn state(&self) -> HuntState {
        self.state
    }

    /// Runs the hunt to completion.
    ///
    /// Never fails as a whole: partial results are always returned, with
    /// per-source error and rate-limit flags explaining any shortfall.
    pub async fn run(mut self) -> HuntResult {
        self.state = HuntState::Running;
        let respect = self.config.respect_rate_limits;
        let mut remaining = self.sources.clone();
        let mut stats: HashMap<SourceKind, SourceStats> = HashMap::new();
        let mut leads: Vec<Lead> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut next_page: HashMap<SourceKind, u32> = HashMap::new();
        let mut rate_limit_retries: HashMap<SourceKind, u32> = HashMap::new();

        for source in &remaining {
            stats.entry(source.kind()).or_default();
            next_page.insert(source.kind(), self.config.filters.page);
        }
        for (kind, reason) in &self.rejected {
            debug!(source = %kind, reason = %reason, "Source rejected before hunt start");
            let entry = stats.entry(*kind).or_default();
            entry.errors += 1;
            entry.completed = true;
        }

        info!(
            sources = remaining.len(),
            rejected = self.rejected.len(),
            respect_limits = respect,
            "Starting hunt"
        );

        let state = loop {
            if self.cancel.is_cancelled() {
                break HuntState::Aborted;
            }
            if remaining.is_empty() {
                break HuntState::Completed;
            }

            let kinds: Vec<SourceKind> = remaining.iter().map(|s| s.kind()).collect();
            let Some(kind) = SourceSelector::next(&kinds, &self.limiter, respect).await else {
                if respect {
                    // A sliding-window denial clears by waiting; a spent
                    // monthly or credit budget does not, so those sources
                    // are retired instead of looping on the cool-down.
                    for kind in kinds {
                        let status = self.limiter.get_status(kind).await;
                        let credits_spent =
                            status.credits_remaining.is_some_and(|c| c <= 0.0);
                        if status.requests_remaining == 0 || credits_spent {
                            debug!(source = %kind, "Budget spent for this cycle, retiring");
                            stats.entry(kind).or_default().rate_limited = true;
                            retire(&mut remaining, &mut stats, kind);
                        }
                    }
                    if remaining.is_empty() {
                        break HuntState::Completed;
                    }
                    debug!("No source currently available, cooling down");
                    if !self.sleep_unless_cancelled(NO_SOURCE_COOLDOWN).await {
                        break HuntState::Aborted;
                    }
                    continue;
                }
                // Nothing selectable and budgets are ignored anyway
                break HuntState::Completed;
            };

            // Consumption is recorded even when limits are ignored, so the
            // budget view stays honest for later hunts.
            let permitted = self.limiter.check_and_consume(kind).await;
            if respect && !permitted {
                // Another hunt consumed the budget since selection
                warn!(source = %kind, "Budget gone since selection, retiring source");
                let entry = stats.entry(kind).or_default();
                entry.rate_limited = true;
                retire(&mut remaining, &mut stats, kind);
                self.emit_progress(leads.len(), &stats, Some(kind)).await;
                continue;
            }

            // The selector only picks from the remaining set
            let Some(source) = remaining.iter().find(|s| s.kind() == kind).cloned() else {
                continue;
            };
            let page_no = next_page.get(&kind).copied().unwrap_or(1);
            let filters = self.config.filters.at_page(page_no);

            match source.search(&filters).await {
                Ok(page) => {
                    let page_empty = page.leads.is_empty();
                    let mut new_leads = Vec::new();
                    for lead in page.leads {
                        if seen.insert(lead.source_id()) {
                            new_leads.push(lead);
                        }
                    }

                    let entry = stats.entry(kind).or_default();
                    entry.leads_found += new_leads.len();
                    debug!(
                        source = %kind,
                        page = page_no,
                        new = new_leads.len(),
                        total = entry.leads_found,
                        "Page merged"
                    );

                    if !new_leads.is_empty() {
                        if let Some(callback) = &self.on_leads_found {
                            if let Err(e) = callback(&new_leads) {
                                warn!(source = %kind, error = %e, "Leads callback failed");
                            }
                        }
                    }
                    leads.extend(new_leads);

                    let capped = entry.leads_found >= self.config.max_results_per_source;
                    if capped || page_empty || !page.has_more {
                        retire(&mut remaining, &mut stats, kind);
                    } else {
                        next_page.insert(kind, page_no + 1);
                    }
                }
                Err(SourceError::RateLimited {
                    retry_after,
                    endpoint,
                }) => {
                    let entry = stats.entry(kind).or_default();
                    entry.errors += 1;
                    entry.rate_limited = true;

                    let attempts = rate_limit_retries.entry(kind).or_insert(0);
                    *attempts += 1;
                    if *attempts >= MAX_RATE_LIMIT_RETRIES {
                        warn!(
                            source = %kind,
                            endpoint = %endpoint,
                            attempts = *attempts,
                            "Rate limit retries exhausted, retiring source"
                        );
                        retire(&mut remaining, &mut stats, kind);
                    } else {
                        let wait = Duration::from_secs(
                            retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
                        ) + inter_call_jitter();
                        warn!(
                            source = %kind,
                            endpoint = %endpoint,
                            wait_secs = wait.as_secs(),
                            "Source rate limited, will retry later"
                        );
                        if !self.sleep_unless_cancelled(wait).await {
                            break HuntState::Aborted;
                        }
                    }
                }
                Err(e) => {
                    // One attempt per source per hunt for permanent failures
                    warn!(source = %kind, error = %e, "Source failed, retiring");
                    let entry = stats.entry(kind).or_default();
                    entry.errors += 1;
                    retire(&mut remaining, &mut stats, kind);
                }
            }

            self.emit_progress(leads.len(), &stats, Some(kind)).await;

            if !remaining.is_empty() && !self.sleep_unless_cancelled(inter_call_jitter()).await {
                break HuntState::Aborted;
            }
        };

        self.state = state;
        info!(
            state = ?state,
            leads = leads.len(),
            "Hunt finished"
        );
        self.emit_progress(leads.len(), &stats, None).await;

        HuntResult {
            leads,
            source_stats: stats,
            limits: self.limiter.snapshot_all().await,
            state,
        }
    }

    /// Sleeps, racing the cancellation token. Returns false if cancelled.
    async fn sleep_unless_cancelled(&self, duration: Duration) -> bool {
        tokio::select! {
            () = self.cancel.cancelled() => false,
            () = tokio::time::sleep(duration) => true,
        }
    }

    async fn emit_progress(
        &self,
        total_leads: usize,
        stats: &HashMap<SourceKind, SourceStats>,
        current_source: Option<SourceKind>,
    ) {
        let Some(tx) = &self.progress_tx else {
            return;
        };

        let completed_sources = stats
            .iter()
            .filter(|(_, s)| s.completed)
            .map(|(kind, _)| *kind)
            .collect();

        let snapshot = HuntProgress {
            state: self.state,
            total_leads,
            source_stats: stats.clone(),
            completed_sources,
            current_source,
        };
        if tx.try_send(snapshot).is_err() {
            debug!("Progress consumer is behind, dropping snapshot");
        }
    }
}

/// Marks a source finished and removes it from the remaining set.
fn retire(
    remaining: &mut Vec<Arc<dyn LeadSource>>,
    stats: &mut HashMap<SourceKind, SourceStats>,
    kind: SourceKind,
) {
    stats.entry(kind).or_default().completed = true;
    remaining.retain(|s| s.kind() != kind);
}

fn inter_call_jitter() -> Duration {
    Duration::from_millis(rand::rng().random_range(MIN_JITTER_MS..=MAX_JITTER_MS))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prospector_core::{SearchFilters, SearchPage, SourceLimits};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A source that plays back a scripted sequence of page results and
    /// returns an empty terminal page once the script runs out.
    struct ScriptedSource {
        kind: SourceKind,
        script: Mutex<VecDeque<Result<SearchPage, SourceError>>>,
    }

    impl ScriptedSource {
        fn new(kind: SourceKind, script: Vec<Result<SearchPage, SourceError>>) -> Arc<Self> {
            Arc::new(Self {
                kind,
                script: Mutex::new(script.into()),
            })
        }
    }

    #[async_trait]
    impl LeadSource for ScriptedSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn search(&self, _filters: &SearchFilters) -> Result<SearchPage, SourceError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(SearchPage::last(Vec::new())))
        }
    }

    fn lead(kind: SourceKind, key: &str) -> Lead {
        Lead::new(kind, key, 80)
    }

    fn page(leads: Vec<Lead>, has_more: bool) -> Result<SearchPage, SourceError> {
        Ok(SearchPage {
            leads,
            total: None,
            has_more,
        })
    }

    fn unlimited_limiter() -> Arc<RateLimiter> {
        Arc::new(RateLimiter::new(HashMap::new()))
    }

    fn config(sources: Vec<SourceKind>) -> HuntConfig {
        HuntConfig::new(SearchFilters::for_domain("example.com"), sources)
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_still_completes() {
        // A returns 5 leads of which 2 duplicate already-seen keys,
        // B fails with a permanent error.
        let a = ScriptedSource::new(
            SourceKind::Hunter,
            vec![page(
                vec![
                    lead(SourceKind::Hunter, "a"),
                    lead(SourceKind::Hunter, "b"),
                    lead(SourceKind::Hunter, "c"),
                    lead(SourceKind::Hunter, "b"),
                    lead(SourceKind::Hunter, "a"),
                ],
                false,
            )],
        );
        let b = ScriptedSource::new(
            SourceKind::Apollo,
            vec![Err(SourceError::Other("boom".to_string()))],
        );

        let result = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter, SourceKind::Apollo]),
            vec![a, b],
            unlimited_limiter(),
        )
        .run()
        .await;

        assert_eq!(result.state, HuntState::Completed);
        assert_eq!(result.total_leads(), 3);
        assert_eq!(result.stats_for(SourceKind::Hunter).unwrap().leads_found, 3);
        assert_eq!(result.stats_for(SourceKind::Apollo).unwrap().errors, 1);
        assert!(!result.stats_for(SourceKind::Apollo).unwrap().rate_limited);
        assert!(result.stats_for(SourceKind::Hunter).unwrap().completed);
        assert!(result.stats_for(SourceKind::Apollo).unwrap().completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dedup_across_pages() {
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![
                page(
                    vec![lead(SourceKind::Hunter, "a"), lead(SourceKind::Hunter, "b")],
                    true,
                ),
                page(
                    vec![lead(SourceKind::Hunter, "b"), lead(SourceKind::Hunter, "c")],
                    false,
                ),
            ],
        );

        let result = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]),
            vec![source],
            unlimited_limiter(),
        )
        .run()
        .await;

        let keys: Vec<&str> = result.leads.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_key_from_different_sources_is_kept() {
        let a = ScriptedSource::new(
            SourceKind::Hunter,
            vec![page(vec![lead(SourceKind::Hunter, "x")], false)],
        );
        let b = ScriptedSource::new(
            SourceKind::Apollo,
            vec![page(vec![lead(SourceKind::Apollo, "x")], false)],
        );

        let result = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter, SourceKind::Apollo]),
            vec![a, b],
            unlimited_limiter(),
        )
        .run()
        .await;

        // Dedup is on the source-qualified id, not the bare key
        assert_eq!(result.total_leads(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_results_per_source_caps_pagination() {
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![
                page(
                    vec![lead(SourceKind::Hunter, "a"), lead(SourceKind::Hunter, "b")],
                    true,
                ),
                page(vec![lead(SourceKind::Hunter, "c")], true),
            ],
        );

        let result = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]).with_max_results(2),
            vec![source],
            unlimited_limiter(),
        )
        .run()
        .await;

        assert_eq!(result.total_leads(), 2);
        assert!(result.stats_for(SourceKind::Hunter).unwrap().completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_source_retries_then_retires() {
        let rate_limited = || {
            Err(SourceError::RateLimited {
                retry_after: Some(1),
                endpoint: "hunter/domain-search".to_string(),
            })
        };
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![rate_limited(), rate_limited(), rate_limited()],
        );

        let result = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]),
            vec![source],
            unlimited_limiter(),
        )
        .run()
        .await;

        let stats = result.stats_for(SourceKind::Hunter).unwrap();
        assert_eq!(result.state, HuntState::Completed);
        assert_eq!(stats.errors, 3);
        assert!(stats.rate_limited);
        assert!(stats.completed);
        assert_eq!(result.total_leads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_source_recovers_within_budget() {
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![
                Err(SourceError::RateLimited {
                    retry_after: Some(1),
                    endpoint: "hunter/domain-search".to_string(),
                }),
                page(vec![lead(SourceKind::Hunter, "a")], false),
            ],
        );

        let result = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]),
            vec![source],
            unlimited_limiter(),
        )
        .run()
        .await;

        let stats = result.stats_for(SourceKind::Hunter).unwrap();
        assert_eq!(result.total_leads(), 1);
        assert_eq!(stats.errors, 1);
        assert!(stats.rate_limited);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_before_first_call() {
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![page(vec![lead(SourceKind::Hunter, "a")], false)],
        );

        let orchestrator = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]),
            vec![source],
            unlimited_limiter(),
        );
        orchestrator.cancellation_token().cancel();

        let result = orchestrator.run().await;
        assert_eq!(result.state, HuntState::Aborted);
        assert_eq!(result.total_leads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_budget_retires_without_calling() {
        let mut limits = HashMap::new();
        limits.insert(SourceKind::Hunter, SourceLimits::monthly(0));
        // A script that would panic the test if the provider were called
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![Err(SourceError::Other("must not be called".to_string()))],
        );

        let result = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]),
            vec![source],
            Arc::new(RateLimiter::new(limits)),
        )
        .run()
        .await;

        // The provider is never called: the spent monthly budget retires
        // the source before any search.
        assert_eq!(result.state, HuntState::Completed);
        let stats = result.stats_for(SourceKind::Hunter).unwrap();
        assert_eq!(stats.leads_found, 0);
        assert_eq!(stats.errors, 0);
        assert!(stats.rate_limited);
        assert!(stats.completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_respect_limits_false_ignores_exhausted_budget() {
        let mut limits = HashMap::new();
        limits.insert(SourceKind::Hunter, SourceLimits::monthly(0));
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![page(vec![lead(SourceKind::Hunter, "a")], false)],
        );

        let mut cfg = config(vec![SourceKind::Hunter]);
        cfg.respect_rate_limits = false;

        let result =
            HuntOrchestrator::with_sources(cfg, vec![source], Arc::new(RateLimiter::new(limits)))
                .run()
                .await;

        assert_eq!(result.state, HuntState::Completed);
        assert_eq!(result.total_leads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_gets_new_leads_and_errors_are_not_fatal() {
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![
                page(
                    vec![lead(SourceKind::Hunter, "a"), lead(SourceKind::Hunter, "b")],
                    true,
                ),
                page(
                    vec![lead(SourceKind::Hunter, "b"), lead(SourceKind::Hunter, "c")],
                    false,
                ),
            ],
        );

        let delivered: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&delivered);

        let result = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]),
            vec![source],
            unlimited_limiter(),
        )
        .with_leads_callback(move |batch| {
            let mut sink = sink.lock().unwrap();
            sink.extend(batch.iter().map(|l| l.key.clone()));
            // The collaborator failing must not fail the hunt
            Err("persistence offline".into())
        })
        .run()
        .await;

        assert_eq!(result.state, HuntState::Completed);
        assert_eq!(result.total_leads(), 3);
        // At-most-once delivery per lead: the duplicate "b" never reappears
        assert_eq!(*delivered.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_snapshots_stream_out() {
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![
                page(vec![lead(SourceKind::Hunter, "a")], true),
                page(vec![lead(SourceKind::Hunter, "b")], false),
            ],
        );

        let (tx, mut rx) = mpsc::channel(16);
        let result = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]),
            vec![source],
            unlimited_limiter(),
        )
        .with_progress(tx)
        .run()
        .await;

        assert_eq!(result.total_leads(), 2);

        let mut snapshots = Vec::new();
        while let Ok(snapshot) = rx.try_recv() {
            snapshots.push(snapshot);
        }
        assert!(snapshots.len() >= 2);

        // Totals never decrease across snapshots
        let totals: Vec<usize> = snapshots.iter().map(|s| s.total_leads).collect();
        assert!(totals.windows(2).all(|w| w[0] <= w[1]));

        // In-flight snapshots report Running; the final one is terminal.
        let (last, mid) = snapshots.split_last().unwrap();
        assert!(mid.iter().all(|s| s.state == HuntState::Running));
        assert_eq!(last.state, HuntState::Completed);
        assert_eq!(last.total_leads, 2);
        assert!(last.completed_sources.contains(&SourceKind::Hunter));
        assert_eq!(last.current_source, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_orchestrator_is_idle_until_run() {
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![page(vec![lead(SourceKind::Hunter, "a")], false)],
        );

        let orchestrator = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]),
            vec![source],
            unlimited_limiter(),
        );
        assert_eq!(orchestrator.state(), HuntState::Idle);

        let result = orchestrator.run().await;
        assert_eq!(result.state, HuntState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_hunt_reports_aborted_in_final_snapshot() {
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![page(vec![lead(SourceKind::Hunter, "a")], false)],
        );

        let (tx, mut rx) = mpsc::channel(16);
        let orchestrator = HuntOrchestrator::with_sources(
            config(vec![SourceKind::Hunter]),
            vec![source],
            unlimited_limiter(),
        )
        .with_progress(tx);
        orchestrator.cancellation_token().cancel();

        let result = orchestrator.run().await;
        assert_eq!(result.state, HuntState::Aborted);

        let mut last = None;
        while let Ok(snapshot) = rx.try_recv() {
            last = Some(snapshot);
        }
        assert_eq!(last.unwrap().state, HuntState::Aborted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_includes_limit_snapshot() {
        let mut limits = HashMap::new();
        limits.insert(SourceKind::Hunter, SourceLimits::monthly(10));
        let source = ScriptedSource::new(
            SourceKind::Hunter,
            vec![page(vec![lead(SourceKind::Hunter, "a")], false)],
        );

        let result =
            HuntOrchestrator::with_sources(config(vec![SourceKind::Hunter]), vec![source], {
                Arc::new(RateLimiter::new(limits))
            })
            .run()
            .await;

        let (kind, status) = &result.limits[0];
        assert_eq!(*kind, SourceKind::Hunter);
        assert_eq!(status.requests_used, 1);
        assert_eq!(status.requests_remaining, 9);
    }
}
