//! Hunter.io domain search.
//!
//! Hunter keys on the seed domain and returns email addresses with its own
//! per-address confidence score. Authentication is an `api_key` query
//! parameter; pagination is offset-based.

use prospector_core::{Lead, SearchFilters, SearchPage, SourceError, SourceKind, SourceLimits};
use url::Url;

use crate::descriptor::{opt_str, opt_u64, AuthStyle, BurstCaps, SearchPlan, SourceDescriptor};

/// Results requested per page.
const PAGE_SIZE: u32 = 10;

/// Descriptor for Hunter.io.
pub fn hunter_descriptor() -> SourceDescriptor {
    SourceDescriptor {
        id: SourceKind::Hunter,
        api_key_env: "HUNTER_API_KEY",
        api_secret_env: None,
        auth: AuthStyle::QueryParam("api_key"),
        burst: BurstCaps {
            per_second: 2,
            per_minute: 30,
        },
        default_limits: || SourceLimits::monthly(500).with_per_minute(15),
        search: SearchPlan {
            endpoint: "hunter/domain-search",
            base_url: "https://api.hunter.io/v2/domain-search",
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
    pairs.append_pair("limit", &PAGE_SIZE.to_string());
    let offset = filters.page.saturating_sub(1) * PAGE_SIZE;
    pairs.append_pair("offset", &offset.to_string());
}

/// Parses a Hunter domain-search response.
///
/// Shape: `{data: {domain, emails: [{value, first_name, last_name,
/// position, confidence}]}, meta: {results, limit, offset}}`.
fn parse_page(value: &serde_json::Value) -> Result<SearchPage, SourceError> {
    let data = value
        .get("data")
        .ok_or_else(|| SourceError::InvalidResponse("missing data object".to_string()))?;

    let domain = opt_str(data, "domain");
    let emails = data
        .get("emails")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| SourceError::InvalidResponse("missing emails array".to_string()))?;

    let mut leads = Vec::with_capacity(emails.len());
    for entry in emails {
        let Some(email) = opt_str(entry, "value") else {
            // An address-less entry carries nothing dedupable
            continue;
        };

        let confidence = opt_u64(entry, "confidence").unwrap_or(0).min(100) as u8;
        let name = match (opt_str(entry, "first_name"), opt_str(entry, "last_name")) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(one), None) | (None, Some(one)) => Some(one),
            (None, None) => None,
        };

        let mut lead = Lead::new(SourceKind::Hunter, email.clone(), confidence);
        lead.domain = domain.clone();
        lead.email = Some(email);
        lead.name = name;
        lead.position = opt_str(entry, "position");
        lead.metadata = entry.clone();
        leads.push(lead);
    }

    let meta = value.get("meta").cloned().unwrap_or_default();
    let total = opt_u64(&meta, "results");
    let offset = opt_u64(&meta, "offset").unwrap_or(0);
    let has_more = total.is_some_and(|t| offset + (leads.len() as u64) < t);

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

    fn sample_response() -> serde_json::Value {
        json!({
            "data": {
                "domain": "example.com",
                "emails": [
                    {
                        "value": "jane@example.com",
                        "first_name": "Jane",
                        "last_name": "Doe",
                        "position": "CTO",
                        "confidence": 94
                    },
                    {
                        "value": "info@example.com",
                        "confidence": 40
                    },
                    {
                        "first_name": "No",
                        "last_name": "Address"
                    }
                ]
            },
            "meta": { "results": 23, "limit": 10, "offset": 0 }
        })
    }

    #[test]
    fn test_parse_domain_search() {
        let page = parse_page(&sample_response()).unwrap();

        assert_eq!(page.leads.len(), 2);
        assert_eq!(page.total, Some(23));
        assert!(page.has_more);

        let jane = &page.leads[0];
        assert_eq!(jane.key, "jane@example.com");
        assert_eq!(jane.email.as_deref(), Some("jane@example.com"));
        assert_eq!(jane.name.as_deref(), Some("Jane Doe"));
        assert_eq!(jane.position.as_deref(), Some("CTO"));
        assert_eq!(jane.domain.as_deref(), Some("example.com"));
        assert_eq!(jane.confidence, 94);

        // Partial entries keep what they have
        assert_eq!(page.leads[1].name, None);
        assert_eq!(page.leads[1].confidence, 40);
    }

    #[test]
    fn test_last_page_has_no_more() {
        let mut response = sample_response();
        response["meta"]["offset"] = json!(21);
        let page = parse_page(&response).unwrap();
        assert!(!page.has_more);
    }

    #[test]
    fn test_missing_data_is_invalid() {
        let err = parse_page(&json!({"errors": []})).unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[test]
    fn test_query_uses_offset_paging() {
        let desc = hunter_descriptor();
        let mut url = Url::parse(desc.search.base_url).unwrap();
        build_query(&SearchFilters::for_domain("example.com").at_page(3), &mut url);

        let query = url.query().unwrap();
        assert!(query.contains("domain=example.com"));
        assert!(query.contains("offset=20"));
        assert!(query.contains("limit=10"));
    }
}
