//! tagscope-core: decoding engine for analytics/tracking requests.
//!
//! The pipeline is a pure, synchronous transform from one observed request
//! to one normalized event (or a drop): parse the URL, select the matching
//! provider, classify every query key, and assemble the event summary.

pub mod augment;
pub mod classify;
pub mod config;
pub mod har;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod url_parse;

pub use augment::{AnalyticsEvent, EventKind, UrlSummary};
pub use classify::{classify, ClassifiedFields};
pub use pipeline::{
    decode_request, DropReason, Engine, EventSink, RawRequestRecord, RequestOutcome, SessionId,
};
pub use provider::{ProviderKind, ProviderRegistry, RegistrySnapshot};
pub use url_parse::{parse, ParsedUrl};
