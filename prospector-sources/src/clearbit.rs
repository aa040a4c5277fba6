//! Clearbit Prospector people search.
//!
//! Clearbit matches people by company domain and title and returns stable
//! person ids. Authentication is a bearer key; pagination is page-based
//! with an explicit total.

use prospector_core::{Lead, SearchFilters, SearchPage, SourceError, SourceKind, SourceLimits};
use url::Url;

use crate::descriptor::{opt_str, opt_u64, AuthStyle, BurstCaps, SearchPlan, SourceDescriptor};

/// Clearbit does not score individual matches.
const DEFAULT_CONFIDENCE: u8 = 90;

/// Results requested per page.
const PAGE_SIZE: u32 = 10;

/// Descriptor for Clearbit Prospector.
pub fn clearbit_descriptor() -> SourceDescriptor {
    SourceDescriptor {
        id: SourceKind::Clearbit,
        api_key_env: "CLEARBIT_API_KEY",
        api_secret_env: None,
        auth: AuthStyle::Bearer,
        burst: BurstCaps {
            per_second: 5,
            per_minute: 100,
        },
        default_limits: || SourceLimits::monthly(2500).with_per_minute(60),
        search: SearchPlan {
            endpoint: "clearbit/prospector",
            base_url: "https://prospector.clearbit.com/v1/people/search",
            build_query,
            parse_page,
        },
    }
}

fn build_query(filters: &SearchFilters, url: &mut Url) {
    let mut pairs = url.query_pairs_mut();
    if let Some(domain) = &filters.domain {
        pairs.append_pair("domain", domain);
    }
    if let Some(position) = &filters.position {
        pairs.append_pair("title", position);
    }
    if let Some(location) = &filters.location {
        pairs.append_pair("location", location);
    }
    pairs.append_pair("page", &filters.page.to_string());
    pairs.append_pair("page_size", &PAGE_SIZE.to_string());
}

/// Parses a Clearbit Prospector response.
///
/// Shape: `{page, page_size, total, results: [{id, name: {fullName},
/// title, email, company: {domain}}]}`.
fn parse_page(value: &serde_json::Value) -> Result<SearchPage, SourceError> {
    let results = value
        .get("results")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| SourceError::InvalidResponse("missing results array".to_string()))?;

    let mut leads = Vec::with_capacity(results.len());
    for person in results {
        let Some(id) = opt_str(person, "id") else {
            continue;
        };

        let mut lead = Lead::new(SourceKind::Clearbit, id, DEFAULT_CONFIDENCE);
        lead.domain = person
            .get("company")
            .and_then(|company| opt_str(company, "domain"));
        lead.email = opt_str(person, "email");
        lead.name = person.get("name").and_then(|name| opt_str(name, "fullName"));
        lead.position = opt_str(person, "title");
        lead.metadata = person.clone();
        leads.push(lead);
    }

    let total = opt_u64(value, "total");
    let page = opt_u64(value, "page").unwrap_or(1);
    let page_size = opt_u64(value, "page_size").unwrap_or(u64::from(PAGE_SIZE));
    let has_more = total.is_some_and(|t| page * page_size < t);

    Ok(SearchPage {
        leads,
        total,
        has_more,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_prospector_results() {
        let response = json!({
            "page": 1,
            "page_size": 10,
            "total": 15,
            "results": [
                {
                    "id": "e44e8f34",
                    "name": { "fullName": "Jane Doe" },
                    "title": "CEO",
                    "email": "jane@example.com",
                    "company": { "domain": "example.com" }
                }
            ]
        });

        let page = parse_page(&response).unwrap();
        assert_eq!(page.leads.len(), 1);
        assert_eq!(page.total, Some(15));
        assert!(page.has_more);

        let jane = &page.leads[0];
        assert_eq!(jane.source_id(), "clearbit:e44e8f34");
        assert_eq!(jane.name.as_deref(), Some("Jane Doe"));
        assert_eq!(jane.domain.as_deref(), Some("example.com"));
        assert_eq!(jane.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_last_page_has_no_more() {
        let response = json!({
            "page": 2,
            "page_size": 10,
            "total": 15,
            "results": []
        });
        let page = parse_page(&response).unwrap();
        assert!(!page.has_more);
    }

    #[test]
    fn test_query_carries_title() {
        let desc = clearbit_descriptor();
        let mut url = Url::parse(desc.search.base_url).unwrap();
        let mut filters = SearchFilters::for_domain("example.com");
        filters.position = Some("CTO".to_string());
        build_query(&filters, &mut url);

        let query = url.query().unwrap();
        assert!(query.contains("domain=example.com"));
        assert!(query.contains("title=CTO"));
        assert!(query.contains("page_size=10"));
    }
}
