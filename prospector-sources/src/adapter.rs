//! Shared HTTP-backed source adapter.
//!
//! All API sources behave identically once their descriptor says how to
//! build the query and read the response, so one adapter drives every
//! descriptor through the HTTP layer.

use async_trait::async_trait;
use prospector_core::{
    LeadSource, SearchFilters, SearchPage, SourceCredentials, SourceError, SourceKind,
    SourceRateLimit,
};
use prospector_fetch::HttpClient;
use tracing::debug;

use crate::descriptor::SourceDescriptor;

// ============================================================================
// API Lead Source
// ============================================================================

/// A [`LeadSource`] backed by one descriptor and a throttled HTTP client.
pub struct ApiLeadSource {
    descriptor: &'static SourceDescriptor,
    credentials: SourceCredentials,
    client: HttpClient,
}

impl ApiLeadSource {
    /// Creates an adapter for the given descriptor and credentials.
    ///
    /// The adapter gets its own HTTP client with the descriptor's burst
    /// caps, so pacing on one source never delays another.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Other` if the HTTP client cannot be built.
    pub fn new(
        descriptor: &'static SourceDescriptor,
        credentials: SourceCredentials,
    ) -> Result<Self, SourceError> {
        let client = HttpClient::new()
            .map_err(|e| SourceError::Other(format!("failed to build HTTP client: {e}")))?
            .with_throttle(descriptor.burst.per_second, descriptor.burst.per_minute);

        Ok(Self {
            descriptor,
            credentials,
            client,
        })
    }

    /// The descriptor this adapter serves.
    pub fn descriptor(&self) -> &'static SourceDescriptor {
        self.descriptor
    }
}

#[async_trait]
impl LeadSource for ApiLeadSource {
    fn kind(&self) -> SourceKind {
        self.descriptor.id
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_usable()
    }

    async fn search(&self, filters: &SearchFilters) -> Result<SearchPage, SourceError> {
        let url = self.descriptor.search_url(filters, &self.credentials)?;
        let headers = self.descriptor.auth_headers(&self.credentials);
        let endpoint = self.descriptor.search.endpoint;

        debug!(
            source = %self.descriptor.id,
            endpoint = %endpoint,
            page = filters.page,
            "Querying source"
        );

        let body = self
            .client
            .get_json(endpoint, url.as_str(), &headers)
            .await?;

        let mut page = (self.descriptor.search.parse_page)(&body)?;
        for lead in &mut page.leads {
            lead.sanitize();
        }

        Ok(page)
    }

    fn rate_limit(&self) -> Option<SourceRateLimit> {
        self.client
            .rate_info(self.descriptor.search.endpoint)
            .map(|info| info.to_source_rate_limit())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SourceRegistry;

    #[test]
    fn test_unusable_credentials_are_visible() {
        let desc = SourceRegistry::get(SourceKind::Hunter).unwrap();
        let adapter = ApiLeadSource::new(desc, SourceCredentials::new("  ")).unwrap();
        assert!(!adapter.is_configured());

        let adapter = ApiLeadSource::new(desc, SourceCredentials::new("sk-1")).unwrap();
        assert!(adapter.is_configured());
        assert_eq!(adapter.kind(), SourceKind::Hunter);
        assert_eq!(adapter.display_name(), "Hunter");
    }

    #[test]
    fn test_no_rate_limit_before_first_call() {
        let desc = SourceRegistry::get(SourceKind::Apollo).unwrap();
        let adapter = ApiLeadSource::new(desc, SourceCredentials::new("sk-1")).unwrap();
        assert!(adapter.rate_limit().is_none());
    }
}
