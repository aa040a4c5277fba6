//! Apollo.io people search.
//!
//! Apollo matches people by organization domain, title, keywords, and
//! location, and bills per-request credits. Authentication is an
//! `x-api-key` header; pagination is page-based and the response reports
//! the total page count.

use prospector_core::{Lead, SearchFilters, SearchPage, SourceError, SourceKind, SourceLimits};
use url::Url;

use crate::descriptor::{opt_str, opt_u64, AuthStyle, BurstCaps, SearchPlan, SourceDescriptor};

/// Apollo does not score individual matches.
const DEFAULT_CONFIDENCE: u8 = 85;

/// Results requested per page.
const PAGE_SIZE: u32 = 10;

/// Descriptor for Apollo.io.
pub fn apollo_descriptor() -> SourceDescriptor {
    SourceDescriptor {
        id: SourceKind::Apollo,
        api_key_env: "APOLLO_API_KEY",
        api_secret_env: None,
        auth: AuthStyle::ApiKeyHeader("x-api-key"),
        burst: BurstCaps {
            per_second: 1,
            per_minute: 50,
        },
        default_limits: || {
            SourceLimits::monthly(600)
                .with_per_day(50)
                .with_credits(1.0, 600.0)
        },
        search: SearchPlan {
            endpoint: "apollo/people-search",
            base_url: "https://api.apollo.io/v1/mixed_people/search",
            build_query,
            parse_page,
        },
    }
}

fn build_query(filters: &SearchFilters, url: &mut Url) {
    let mut pairs = url.query_pairs_mut();
    if let Some(domain) = &filters.domain {
        pairs.append_pair("q_organization_domains", domain);
    }
    if let Some(position) = &filters.position {
        pairs.append_pair("person_titles[]", position);
    }
    if let Some(location) = &filters.location {
        pairs.append_pair("person_locations[]", location);
    }
    if !filters.keywords.is_empty() {
        pairs.append_pair("q_keywords", &filters.keywords.join(" "));
    }
    pairs.append_pair("page", &filters.page.to_string());
    pairs.append_pair("per_page", &PAGE_SIZE.to_string());
}

/// Parses an Apollo people-search response.
///
/// Shape: `{people: [{id, name, title, email, organization:
/// {primary_domain}}], pagination: {page, total_entries, total_pages}}`.
fn parse_page(value: &serde_json::Value) -> Result<SearchPage, SourceError> {
    let people = value
        .get("people")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| SourceError::InvalidResponse("missing people array".to_string()))?;

    let mut leads = Vec::with_capacity(people.len());
    for person in people {
        let Some(id) = opt_str(person, "id") else {
            continue;
        };

        let mut lead = Lead::new(SourceKind::Apollo, id, DEFAULT_CONFIDENCE);
        lead.domain = person
            .get("organization")
            .and_then(|org| opt_str(org, "primary_domain"));
        lead.email = opt_str(person, "email");
        lead.name = opt_str(person, "name");
        lead.position = opt_str(person, "title");
        lead.metadata = person.clone();
        leads.push(lead);
    }

    let pagination = value.get("pagination").cloned().unwrap_or_default();
    let total = opt_u64(&pagination, "total_entries");
    let has_more = match (opt_u64(&pagination, "page"), opt_u64(&pagination, "total_pages")) {
        (Some(page), Some(total_pages)) => page < total_pages,
        _ => false,
    };

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
    fn test_parse_people_search() {
        let response = json!({
            "people": [
                {
                    "id": "5f1a2b3c",
                    "name": "Jane Doe",
                    "title": "VP Engineering",
                    "email": "jane@example.com",
                    "organization": { "primary_domain": "example.com" }
                },
                { "id": "9d8e7f6a", "name": "John Roe" }
            ],
            "pagination": { "page": 1, "total_entries": 42, "total_pages": 5 }
        });

        let page = parse_page(&response).unwrap();
        assert_eq!(page.leads.len(), 2);
        assert_eq!(page.total, Some(42));
        assert!(page.has_more);

        let jane = &page.leads[0];
        assert_eq!(jane.source_id(), "apollo:5f1a2b3c");
        assert_eq!(jane.domain.as_deref(), Some("example.com"));
        assert_eq!(jane.position.as_deref(), Some("VP Engineering"));
        assert_eq!(jane.confidence, DEFAULT_CONFIDENCE);

        assert_eq!(page.leads[1].email, None);
        assert_eq!(page.leads[1].domain, None);
    }

    #[test]
    fn test_final_page_has_no_more() {
        let response = json!({
            "people": [],
            "pagination": { "page": 5, "total_entries": 42, "total_pages": 5 }
        });
        let page = parse_page(&response).unwrap();
        assert!(page.leads.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_query_carries_filters() {
        let desc = apollo_descriptor();
        let mut url = Url::parse(desc.search.base_url).unwrap();
        let mut filters = SearchFilters::for_domain("example.com");
        filters.position = Some("CTO".to_string());
        filters.keywords = vec!["fintech".to_string(), "payments".to_string()];
        build_query(&filters, &mut url);

        let query = url.query().unwrap();
        assert!(query.contains("q_organization_domains=example.com"));
        assert!(query.contains("CTO"));
        assert!(query.contains("fintech+payments"));
        assert!(query.contains("page=1"));
    }
}
