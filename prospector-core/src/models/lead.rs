//! Lead and search filter types.

use serde::{Deserialize, Serialize};

use super::source::SourceKind;
use crate::error::CoreError;

// ============================================================================
// Lead
// ============================================================================

/// One discovered candidate contact/company record.
///
/// Leads are never mutated after creation; within a hunt the result set is
/// append-only and deduplicated on [`Lead::source_id`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// The source that discovered this lead.
    pub source: SourceKind,
    /// Provider-native identifier, unique within the source.
    pub key: String,
    /// Company domain, if known.
    pub domain: Option<String>,
    /// Contact email, if known.
    pub email: Option<String>,
    /// Contact full name, if known.
    pub name: Option<String>,
    /// Contact position/title, if known.
    pub position: Option<String>,
    /// Confidence score (0-100).
    pub confidence: u8,
    /// Free-form provider metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Lead {
    /// Creates a lead with the minimum required fields.
    pub fn new(source: SourceKind, key: impl Into<String>, confidence: u8) -> Self {
        Self {
            source,
            key: key.into(),
            domain: None,
            email: None,
            name: None,
            position: None,
            confidence,
            metadata: serde_json::Value::Null,
        }
    }

    /// The source-qualified identifier used for idempotent dedup.
    ///
    /// Format: `{source}:{key}`, e.g. `hunter:a1b2c3`.
    pub fn source_id(&self) -> String {
        format!("{}:{}", self.source.cli_name(), self.key)
    }

    /// Validates the lead data.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if the key is empty or the
    /// confidence score exceeds 100.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.key.is_empty() {
            return Err(CoreError::InvalidData("lead key is empty".to_string()));
        }
        if self.confidence > 100 {
            return Err(CoreError::InvalidData(format!(
                "confidence {} out of valid range [0, 100]",
                self.confidence
            )));
        }
        Ok(())
    }

    /// Clamps the confidence score into the valid range.
    ///
    /// Use when you want to be lenient with buggy provider responses
    /// instead of rejecting them.
    pub fn sanitize(&mut self) {
        self.confidence = self.confidence.min(100);
    }
}

// ============================================================================
// Search Filters
// ============================================================================

/// Query parameters passed to every source in a hunt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Seed company domain.
    pub domain: Option<String>,
    /// Free-text keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Desired contact position/title.
    pub position: Option<String>,
    /// Desired location.
    pub location: Option<String>,
    /// Result page, starting at 1. Advanced by the orchestrator while a
    /// source reports more pages.
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

impl SearchFilters {
    /// Creates filters seeded with a domain.
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            page: 1,
            ..Self::default()
        }
    }

    /// Returns a copy of these filters pointing at the given page.
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_format() {
        let lead = Lead::new(SourceKind::Hunter, "abc123", 90);
        assert_eq!(lead.source_id(), "hunter:abc123");
    }

    #[test]
    fn test_same_key_different_source_not_equal() {
        let a = Lead::new(SourceKind::Hunter, "abc", 50);
        let b = Lead::new(SourceKind::Apollo, "abc", 50);
        assert_ne!(a.source_id(), b.source_id());
    }

    #[test]
    fn test_validate() {
        assert!(Lead::new(SourceKind::Snov, "k", 100).validate().is_ok());
        assert!(Lead::new(SourceKind::Snov, "", 50).validate().is_err());
        assert!(Lead::new(SourceKind::Snov, "k", 101).validate().is_err());
    }

    #[test]
    fn test_sanitize_clamps_confidence() {
        let mut lead = Lead::new(SourceKind::Clearbit, "k", 255);
        lead.sanitize();
        assert_eq!(lead.confidence, 100);
    }

    #[test]
    fn test_filters_paging() {
        let filters = SearchFilters::for_domain("example.com");
        assert_eq!(filters.page, 1);
        let next = filters.at_page(2);
        assert_eq!(next.page, 2);
        assert_eq!(next.domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_filters_default_page_on_deserialize() {
        let filters: SearchFilters = serde_json::from_str(r#"{"domain":"x.io"}"#).unwrap();
        assert_eq!(filters.page, 1);
    }
}
