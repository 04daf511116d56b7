//! Event summary assembly: kind heuristics, diagnostics, final record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::ClassifiedFields;
use crate::pipeline::RawRequestRecord;
use crate::provider::ProviderKind;
use crate::url_parse::ParsedUrl;

/// URLs longer than this exceeded what legacy IE accepted; worth flagging
/// because truncation there silently dropped trailing parameters.
pub const LEGACY_URL_LIMIT: usize = 2083;

/// What kind of page activity a request represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Load,
    Click,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Load => write!(f, "load"),
            EventKind::Click => write!(f, "click"),
        }
    }
}

/// The full request URL plus its length diagnostic. Advisory only; an
/// overlong URL never blocks emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlSummary {
    pub url: String,
    pub length: usize,
    pub exceeds_legacy_limit: bool,
}

impl UrlSummary {
    pub fn new(url: &str) -> Self {
        let length = url.len();
        Self {
            url: url.to_string(),
            length,
            exceeds_legacy_limit: length > LEGACY_URL_LIMIT,
        }
    }
}

/// One normalized analytics event, handed to the output boundary exactly
/// once. The core retains no copy afterward.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub provider: &'static str,
    pub parent_url: Option<String>,
    pub full_url: UrlSummary,
    pub request_id: String,
    pub status_line: Option<String>,
    pub request_type: String,
    #[serde(flatten)]
    pub fields: ClassifiedFields,
}

/// Combine the raw record, parsed URL, provider and classified fields into
/// the final event.
///
/// Default kind comes from the owning session's loading state (loading means
/// the request belongs to a page load). A provider's kind override, when
/// present, replaces the default; an override fault leaves the default
/// standing.
pub fn augment(
    raw: &RawRequestRecord,
    parsed: &ParsedUrl,
    provider: ProviderKind,
    fields: ClassifiedFields,
) -> AnalyticsEvent {
    let default_kind = if raw.session_loading {
        EventKind::Load
    } else {
        EventKind::Click
    };
    let kind = match provider.kind_override(parsed) {
        Ok(Some(kind)) => kind,
        Ok(None) => default_kind,
        Err(fault) => {
            tracing::warn!(
                provider = provider.name(),
                "kind override fault, keeping default: {fault}"
            );
            default_kind
        }
    };

    AnalyticsEvent {
        kind,
        timestamp: raw.timestamp,
        provider: provider.name(),
        parent_url: raw.parent_url.clone(),
        full_url: UrlSummary::new(&raw.url),
        request_id: raw.request_id.clone(),
        status_line: raw.status_line.clone(),
        request_type: raw.request_type.clone(),
        fields,
    }
}
