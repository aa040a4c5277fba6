//! Source-related types.
//!
//! This module contains types identifying external discovery providers:
//! - [`SourceKind`] - Closed enum of supported sources
//! - [`SourceCredentials`] - Per-source API credentials

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Source Kind
// ============================================================================

/// Supported lead discovery sources.
///
/// The set is closed on purpose: per-source configuration and usage
/// bookkeeping are keyed on this enum so a forgotten source is a compile
/// error rather than a missing map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Hunter.io domain search
    Hunter,
    /// Apollo.io people search
    Apollo,
    /// Snov.io prospect search
    Snov,
    /// Clearbit prospector
    Clearbit,
    /// Manually entered leads (sentinel no-op source)
    Manual,
}

impl SourceKind {
    /// Returns the display name for this source.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hunter => "Hunter",
            Self::Apollo => "Apollo",
            Self::Snov => "Snov",
            Self::Clearbit => "Clearbit",
            Self::Manual => "Manual",
        }
    }

    /// Returns all available source kinds.
    pub fn all() -> &'static [SourceKind] {
        &[
            Self::Hunter,
            Self::Apollo,
            Self::Snov,
            Self::Clearbit,
            Self::Manual,
        ]
    }

    /// Returns the CLI name for this source (lowercase, no spaces).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Hunter => "hunter",
            Self::Apollo => "apollo",
            Self::Snov => "snov",
            Self::Clearbit => "clearbit",
            Self::Manual => "manual",
        }
    }

    /// Parses a source from its CLI name.
    pub fn from_cli_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .find(|k| k.cli_name() == name)
            .copied()
    }

    /// Returns true if this is the sentinel manual source.
    ///
    /// The manual source never performs network calls and is excluded from
    /// budget-based source ranking.
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Source Credentials
// ============================================================================

/// API credentials for one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCredentials {
    /// The API key. Never serialized out.
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Optional API secret for sources that require a key pair.
    #[serde(skip_serializing, default)]
    pub api_secret: Option<String>,
}

impl SourceCredentials {
    /// Creates credentials from a single API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: None,
        }
    }

    /// Returns true if the key is non-empty.
    pub fn is_usable(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sources_have_unique_cli_names() {
        let mut names: Vec<_> = SourceKind::all().iter().map(|k| k.cli_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SourceKind::all().len());
    }

    #[test]
    fn test_from_cli_name_round_trip() {
        for kind in SourceKind::all() {
            assert_eq!(SourceKind::from_cli_name(kind.cli_name()), Some(*kind));
        }
        assert_eq!(SourceKind::from_cli_name("nonsense"), None);
    }

    #[test]
    fn test_manual_is_sentinel() {
        assert!(SourceKind::Manual.is_manual());
        assert!(!SourceKind::Hunter.is_manual());
    }

    #[test]
    fn test_credentials_usable() {
        assert!(SourceCredentials::new("sk-123").is_usable());
        assert!(!SourceCredentials::new("   ").is_usable());
    }

    #[test]
    fn test_credentials_never_serialize_key() {
        let creds = SourceCredentials::new("sk-secret");
        let json = serde_json::to_string(&creds).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
