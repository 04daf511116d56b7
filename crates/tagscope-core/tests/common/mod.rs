//! Shared helpers for integration tests.

use chrono::Utc;
use tagscope_core::{RawRequestRecord, SessionId};

/// Build a request record with sensible defaults for tests.
pub fn record(session: SessionId, url: &str, loading: bool) -> RawRequestRecord {
    RawRequestRecord {
        url: url.to_string(),
        method: "GET".to_string(),
        session,
        request_id: "req-1".to_string(),
        timestamp: Utc::now(),
        request_type: "image".to_string(),
        initiator: None,
        post_body: None,
        parent_url: Some("http://example.com/".to_string()),
        status_line: Some("HTTP/1.1 200 OK".to_string()),
        session_loading: loading,
    }
}
