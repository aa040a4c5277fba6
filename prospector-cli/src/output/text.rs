//! Human-readable text output.

use prospector_core::{HuntResult, HuntState, Lead, RateLimitStatus, SourceKind};
use std::fmt::Write as _;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Formats hunt results and budgets as colored text.
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    /// Creates a formatter, optionally with ANSI colors.
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Formats a finished hunt: headline, per-source stats, and leads.
    pub fn format_result(&self, result: &HuntResult) -> String {
        let mut out = String::new();

        let headline = match result.state {
            HuntState::Completed => self.paint(GREEN, "Hunt completed"),
            HuntState::Aborted => self.paint(YELLOW, "Hunt aborted"),
            _ => format!("Hunt {:?}", result.state),
        };
        let _ = writeln!(out, "{} — {} unique leads", headline, result.total_leads());

        // Stats in canonical source order for stable output
        for kind in SourceKind::all() {
            let Some(stats) = result.source_stats.get(kind) else {
                continue;
            };
            let mut notes = vec![format!("{} leads", stats.leads_found)];
            if stats.errors > 0 {
                notes.push(self.paint(RED, &format!("{} errors", stats.errors)));
            }
            if stats.rate_limited {
                notes.push(self.paint(YELLOW, "rate limited"));
            }
            if !stats.completed {
                notes.push(self.paint(DIM, "unfinished"));
            }
            let _ = writeln!(out, "  {:<10} {}", kind.cli_name(), notes.join(", "));
        }

        if !result.leads.is_empty() {
            let _ = writeln!(out);
            for lead in &result.leads {
                let _ = writeln!(out, "{}", self.format_lead(lead));
            }
        }

        out.trim_end().to_string()
    }

    fn format_lead(&self, lead: &Lead) -> String {
        let contact = lead.email.as_deref().unwrap_or(&lead.key);
        let name = lead.name.as_deref().unwrap_or("-");
        let position = lead.position.as_deref().unwrap_or("-");
        let domain = lead.domain.as_deref().unwrap_or("-");
        format!(
            "  {:<28} {:<20} {:<20} {:<18} {:>4} {}",
            contact,
            name,
            position,
            domain,
            format!("{}%", lead.confidence),
            self.paint(DIM, lead.source.cli_name()),
        )
    }

    /// Formats per-source rate-limit budgets as a table.
    pub fn format_limits(&self, statuses: &[(SourceKind, RateLimitStatus)]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<10} {:>8} {:>10} {:>14} {:<12} {}",
            "Source", "Used", "Remaining", "Credits left", "Resets", "OK"
        );

        for (kind, status) in statuses {
            let ok = if status.can_make_request {
                self.paint(GREEN, "✓")
            } else {
                self.paint(RED, "✗")
            };
            let credits = status
                .credits_remaining
                .map_or_else(|| "-".to_string(), |c| format!("{c:.1}"));
            let _ = writeln!(
                out,
                "{:<10} {:>8} {:>10} {:>14} {:<12} {}",
                kind.cli_name(),
                status.requests_used,
                status.requests_remaining,
                credits,
                status.resets_at.format("%Y-%m-%d"),
                ok
            );
        }

        out.trim_end().to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use prospector_core::SourceStats;
    use std::collections::HashMap;

    fn sample_result() -> HuntResult {
        let mut lead = Lead::new(SourceKind::Hunter, "jane@example.com", 94);
        lead.email = Some("jane@example.com".to_string());
        lead.name = Some("Jane Doe".to_string());

        let mut stats = HashMap::new();
        stats.insert(
            SourceKind::Hunter,
            SourceStats {
                leads_found: 1,
                completed: true,
                ..SourceStats::default()
            },
        );
        stats.insert(
            SourceKind::Apollo,
            SourceStats {
                errors: 1,
                rate_limited: true,
                completed: true,
                ..SourceStats::default()
            },
        );

        HuntResult {
            leads: vec![lead],
            source_stats: stats,
            limits: Vec::new(),
            state: HuntState::Completed,
        }
    }

    #[test]
    fn test_result_output_without_color() {
        let out = TextFormatter::new(false).format_result(&sample_result());

        assert!(out.contains("Hunt completed — 1 unique leads"));
        assert!(out.contains("hunter"));
        assert!(out.contains("1 errors"));
        assert!(out.contains("rate limited"));
        assert!(out.contains("jane@example.com"));
        assert!(!out.contains("\x1b["));
    }

    #[test]
    fn test_result_output_with_color() {
        let out = TextFormatter::new(true).format_result(&sample_result());
        assert!(out.contains(GREEN));
    }

    #[test]
    fn test_limits_table() {
        let status = RateLimitStatus {
            requests_used: 1,
            requests_remaining: 499,
            credits_used: 0.0,
            credits_remaining: None,
            resets_at: Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
            can_make_request: true,
        };

        let out = TextFormatter::new(false).format_limits(&[(SourceKind::Hunter, status)]);
        assert!(out.contains("hunter"));
        assert!(out.contains("499"));
        assert!(out.contains("2026-09-01"));
        assert!(out.contains('✓'));
    }
}
