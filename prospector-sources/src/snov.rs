//! Snov.io domain email search.
//!
//! Snov exchanges an OAuth client-id/secret pair for a bearer token out of
//! band; the adapter receives that token as its API key. Billing is
//! credit-based (one lookup costs two credits); pagination is offset-based.

use prospector_core::{Lead, SearchFilters, SearchPage, SourceError, SourceKind, SourceLimits};
use url::Url;

use crate::descriptor::{opt_str, opt_u64, AuthStyle, BurstCaps, SearchPlan, SourceDescriptor};

/// Snov does not score individual matches.
const DEFAULT_CONFIDENCE: u8 = 70;

/// Results requested per page.
const PAGE_SIZE: u32 = 10;

/// Descriptor for Snov.io.
pub fn snov_descriptor() -> SourceDescriptor {
    SourceDescriptor {
        id: SourceKind::Snov,
        api_key_env: "SNOV_ACCESS_TOKEN",
        api_secret_env: Some("SNOV_CLIENT_SECRET"),
        auth: AuthStyle::Bearer,
        burst: BurstCaps {
            per_second: 1,
            per_minute: 60,
        },
        default_limits: || SourceLimits::monthly(1000).with_credits(2.0, 2000.0),
        search: SearchPlan {
            endpoint: "snov/domain-emails",
            base_url: "https://api.snov.io/v1/get-domain-emails-with-info",
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
    pairs.append_pair("type", "all");
    pairs.append_pair("limit", &PAGE_SIZE.to_string());
    let offset = filters.page.saturating_sub(1) * PAGE_SIZE;
    pairs.append_pair("offset", &offset.to_string());
}

/// Parses a Snov domain-emails response.
///
/// Shape: `{success, domain, result, emails: [{email, firstName,
/// lastName, position}]}` where `result` is the total match count.
fn parse_page(value: &serde_json::Value) -> Result<SearchPage, SourceError> {
    if value.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
        let message = opt_str(value, "message").unwrap_or_else(|| "unknown error".to_string());
        return Err(SourceError::InvalidResponse(message));
    }

    let domain = opt_str(value, "domain");
    let emails = value
        .get("emails")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| SourceError::InvalidResponse("missing emails array".to_string()))?;

    let mut leads = Vec::with_capacity(emails.len());
    for entry in emails {
        let Some(email) = opt_str(entry, "email") else {
            continue;
        };

        let name = match (opt_str(entry, "firstName"), opt_str(entry, "lastName")) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(one), None) | (None, Some(one)) => Some(one),
            (None, None) => None,
        };

        let mut lead = Lead::new(SourceKind::Snov, email.clone(), DEFAULT_CONFIDENCE);
        lead.domain = domain.clone();
        lead.email = Some(email);
        lead.name = name;
        lead.position = opt_str(entry, "position");
        lead.metadata = entry.clone();
        leads.push(lead);
    }

    let total = opt_u64(value, "result");
    let offset = opt_u64(value, "offset").unwrap_or(0);
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
