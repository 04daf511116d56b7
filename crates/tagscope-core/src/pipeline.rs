//! Request pipeline: session gate, prefilter, parse, classify, augment, emit.
//!
//! Lifecycle of one observed request:
//! `Observed -> PreFiltered -> {Dropped | Parsed} -> Classified -> Augmented
//! -> Emitted`. Terminal states are `Dropped` and `Emitted`; a request never
//! re-enters the pipeline, and at most one event reaches the sink.

use std::collections::HashSet;
use std::sync::RwLock;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::augment::{augment, AnalyticsEvent};
use crate::classify::classify;
use crate::provider::{ProviderRegistry, RegistrySnapshot};
use crate::url_parse;

/// Identifier of a client session (one inspection surface, e.g. a devtools
/// tab) that registers interest in events.
pub type SessionId = i64;

fn default_method() -> String {
    "GET".to_string()
}

/// Host-supplied capture of one observed network request.
///
/// Transient: created once per request by the observation boundary, consumed
/// synchronously, never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRequestRecord {
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    /// Owning client session; requests for unregistered sessions are dropped.
    pub session: SessionId,
    #[serde(default)]
    pub request_id: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Request-type tag from the observer (e.g. "image", "xmlhttprequest").
    #[serde(default)]
    pub request_type: String,
    #[serde(default)]
    pub initiator: Option<String>,
    #[serde(default)]
    pub post_body: Option<String>,
    /// URL of the page that issued the request, when the observer knows it.
    #[serde(default)]
    pub parent_url: Option<String>,
    #[serde(default)]
    pub status_line: Option<String>,
    /// True while the owning session's page is still loading.
    #[serde(default)]
    pub session_loading: bool,
}

/// Why a request was dropped before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No registered consumer for the record's session.
    NoConsumer,
    /// No enabled provider pattern matched the URL.
    PrefilterMiss,
}

/// Terminal state of one observed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Dropped(DropReason),
    Emitted,
}

/// Output boundary. Receives each emitted event exactly once; the core makes
/// no assumption about delivery and never retries.
pub trait EventSink {
    fn emit(&mut self, event: AnalyticsEvent);
}

/// Collecting sink, convenient for tests and batch commands.
impl EventSink for Vec<AnalyticsEvent> {
    fn emit(&mut self, event: AnalyticsEvent) {
        self.push(event);
    }
}

/// The decoding engine: provider registry plus the session interest set.
///
/// `process` is a pure synchronous transform per request; the only shared
/// state is the registry snapshot (swapped wholesale on config change) and
/// the interest set.
#[derive(Debug)]
pub struct Engine {
    registry: ProviderRegistry,
    sessions: RwLock<HashSet<SessionId>>,
}

impl Engine {
    pub fn new(enabled_provider_names: &[String]) -> Result<Self> {
        Ok(Self {
            registry: ProviderRegistry::new(enabled_provider_names)?,
            sessions: RwLock::new(HashSet::new()),
        })
    }

    /// Register a consumer for `session`; its requests pass the gate from
    /// now on.
    pub fn register_session(&self, session: SessionId) {
        self.sessions.write().unwrap().insert(session);
    }

    /// Remove a consumer; subsequent requests for the session are dropped.
    pub fn unregister_session(&self, session: SessionId) {
        self.sessions.write().unwrap().remove(&session);
    }

    /// Configuration-change notification: rebuild and swap the provider
    /// snapshot synchronously.
    pub fn reload_providers(&self, enabled_provider_names: &[String]) -> Result<()> {
        self.registry.reload(enabled_provider_names)
    }

    /// Process one observed request end to end.
    pub fn process(&self, record: &RawRequestRecord, sink: &mut dyn EventSink) -> RequestOutcome {
        if !self.sessions.read().unwrap().contains(&record.session) {
            return RequestOutcome::Dropped(DropReason::NoConsumer);
        }
        let snapshot = self.registry.snapshot();
        if !snapshot.prefilter_matches(&record.url) {
            tracing::trace!(url = %record.url, "prefilter miss");
            return RequestOutcome::Dropped(DropReason::PrefilterMiss);
        }
        let event = decode_request(record, &snapshot);
        tracing::debug!(
            provider = event.provider,
            kind = %event.kind,
            url = %record.url,
            "emitting event"
        );
        sink.emit(event);
        RequestOutcome::Emitted
    }
}

/// The pure transform: parse, classify, augment. Never fails; on malformed
/// input the field richness degrades instead.
pub fn decode_request(record: &RawRequestRecord, snapshot: &RegistrySnapshot) -> AnalyticsEvent {
    let provider = snapshot.select_provider(&record.url);
    let parsed = url_parse::parse(&record.url);
    let fields = classify(&parsed, provider);
    augment(record, &parsed, provider, fields)
}
