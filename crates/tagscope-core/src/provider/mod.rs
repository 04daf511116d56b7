//! Vendor ("provider") definitions: recognition patterns and field handling.
//!
//! Providers are a closed set of tagged variants. Each one implements the
//! same two-capability contract: a field handler that claims or declines a
//! query key, and an optional event-kind override. The engine never checks a
//! vendor by name; adding a vendor means adding a variant here, nothing else.

mod registry;
mod vendors;

pub use registry::{ProviderRegistry, RegistrySnapshot};

use crate::augment::EventKind;
use crate::classify::ClassifiedFields;
use crate::url_parse::ParsedUrl;

/// Failure inside a provider capability. Never fatal: the engine demotes the
/// offending key to the "other" bucket, or ignores the override.
#[derive(Debug, thiserror::Error)]
pub enum ProviderFault {
    #[error("numbered parameter `{key}` has an unusable index")]
    BadIndex {
        key: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// One tracked vendor, or the default that declines every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Adobe Analytics (SiteCatalyst), the `/b/ss/` beacon.
    Omniture,
    /// Classic Google Analytics, the `__utm.gif` pixel.
    GoogleAnalytics,
    /// Universal Analytics, the Measurement Protocol `/collect` hit.
    UniversalAnalytics,
    /// WebTrends, the `dcs.gif` beacon.
    WebTrends,
    /// Fallback when no enabled pattern matches; declines every key.
    Unknown,
}

impl ProviderKind {
    /// Every real vendor, in dispatch priority order. `Unknown` is not
    /// registered; it is the dispatcher's fallback.
    pub const ALL: &'static [ProviderKind] = &[
        ProviderKind::Omniture,
        ProviderKind::GoogleAnalytics,
        ProviderKind::UniversalAnalytics,
        ProviderKind::WebTrends,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Omniture => "OMNITURE",
            ProviderKind::GoogleAnalytics => "GOOGLEANALYTICS",
            ProviderKind::UniversalAnalytics => "UNIVERSALANALYTICS",
            ProviderKind::WebTrends => "WEBTRENDS",
            ProviderKind::Unknown => "UNKNOWN",
        }
    }

    /// Match pattern over the request URL (regex source).
    pub fn pattern(&self) -> &'static str {
        match self {
            ProviderKind::Omniture => r"/b/ss/",
            ProviderKind::GoogleAnalytics => r"__utm\.gif",
            ProviderKind::UniversalAnalytics => r"google-analytics\.com/(r/)?collect",
            ProviderKind::WebTrends => r"dcs\.gif",
            // Never registered, so never part of a prefilter.
            ProviderKind::Unknown => r"$^",
        }
    }

    pub fn from_name(name: &str) -> Option<ProviderKind> {
        ProviderKind::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Field-handling capability: claim `key` (writing zero or more semantic
    /// fields into `out`) or decline it. `Ok(true)` claims, `Ok(false)`
    /// declines; an `Err` is treated by the engine as declined.
    pub fn handle(
        &self,
        key: &str,
        values: &[String],
        out: &mut ClassifiedFields,
    ) -> Result<bool, ProviderFault> {
        match self {
            ProviderKind::Omniture => vendors::omniture_handle(key, values, out),
            ProviderKind::GoogleAnalytics => vendors::urchin_handle(key, values, out),
            ProviderKind::UniversalAnalytics => vendors::universal_handle(key, values, out),
            ProviderKind::WebTrends => vendors::webtrends_handle(key, values, out),
            ProviderKind::Unknown => Ok(false),
        }
    }

    /// Optional event-kind override. `Ok(None)` means "no opinion, keep the
    /// default"; an `Err` is treated the same way.
    pub fn kind_override(&self, parsed: &ParsedUrl) -> Result<Option<EventKind>, ProviderFault> {
        match self {
            // Omniture link-tracking hits carry a `pe` marker; its presence
            // decides click vs load regardless of the page loading state.
            ProviderKind::Omniture => Ok(Some(if parsed.query.contains("pe") {
                EventKind::Click
            } else {
                EventKind::Load
            })),
            _ => Ok(None),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
