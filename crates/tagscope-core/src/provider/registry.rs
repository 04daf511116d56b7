//! Enabled-provider snapshot with atomic swap on configuration change.
//!
//! One writer (configuration notifications), many readers. The pipeline
//! clones an `Arc` to the current snapshot and works against that view for
//! the whole request; a concurrent reload can never hand it a half-updated
//! provider set.

use std::sync::{Arc, RwLock};

use anyhow::Result;
use regex::RegexSet;

use super::ProviderKind;

/// Immutable view of the enabled provider set plus the combined prefilter
/// pattern built from their individual patterns.
#[derive(Debug)]
pub struct RegistrySnapshot {
    enabled: Vec<ProviderKind>,
    prefilter: RegexSet,
}

impl RegistrySnapshot {
    /// Build a snapshot from configured provider names. Order in the list is
    /// dispatch priority order. Unknown names are skipped with a warning; an
    /// empty list enables every known provider.
    pub fn build(enabled_names: &[String]) -> Result<Self> {
        let mut enabled = Vec::new();
        if enabled_names.is_empty() {
            enabled.extend_from_slice(ProviderKind::ALL);
        } else {
            for name in enabled_names {
                match ProviderKind::from_name(name) {
                    Some(provider) => {
                        if !enabled.contains(&provider) {
                            enabled.push(provider);
                        }
                    }
                    None => tracing::warn!("ignoring unknown provider name in config: {name}"),
                }
            }
        }
        let prefilter = RegexSet::new(enabled.iter().map(|p| p.pattern()))?;
        Ok(Self { enabled, prefilter })
    }

    /// Enabled providers in dispatch priority order.
    pub fn enabled(&self) -> &[ProviderKind] {
        &self.enabled
    }

    pub fn is_enabled(&self, provider: ProviderKind) -> bool {
        self.enabled.contains(&provider)
    }

    /// Cheap pre-parse gate: does any enabled provider pattern match?
    pub fn prefilter_matches(&self, url: &str) -> bool {
        self.prefilter.is_match(url)
    }

    /// First enabled provider whose pattern matches `url`, in priority
    /// order, or `Unknown` when none does. Exactly one provider per URL.
    pub fn select_provider(&self, url: &str) -> ProviderKind {
        self.prefilter
            .matches(url)
            .iter()
            .next()
            .map(|i| self.enabled[i])
            .unwrap_or(ProviderKind::Unknown)
    }
}

/// Process-wide holder for the current [`RegistrySnapshot`].
#[derive(Debug)]
pub struct ProviderRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl ProviderRegistry {
    pub fn new(enabled_names: &[String]) -> Result<Self> {
        Ok(Self {
            current: RwLock::new(Arc::new(RegistrySnapshot::build(enabled_names)?)),
        })
    }

    /// Rebuild from the new name list and swap the snapshot wholesale.
    /// Classifications already in flight keep the snapshot they started with.
    pub fn reload(&self, enabled_names: &[String]) -> Result<()> {
        let snapshot = Arc::new(RegistrySnapshot::build(enabled_names)?);
        tracing::debug!(providers = ?snapshot.enabled, "swapping provider snapshot");
        *self.current.write().unwrap() = snapshot;
        Ok(())
    }

    /// Read-only view of the current enabled set for one request.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.current.read().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_list_enables_all_providers() {
        let snap = RegistrySnapshot::build(&[]).unwrap();
        assert_eq!(snap.enabled(), ProviderKind::ALL);
    }

    #[test]
    fn unknown_names_are_skipped() {
        let snap = RegistrySnapshot::build(&names(&["omniture", "bogus"])).unwrap();
        assert_eq!(snap.enabled(), &[ProviderKind::Omniture]);
    }

    #[test]
    fn prefilter_rejects_unrelated_urls() {
        let snap = RegistrySnapshot::build(&[]).unwrap();
        assert!(snap.prefilter_matches("http://metrics.test/b/ss/rsid/1/H.23/s?x=1"));
        assert!(snap.prefilter_matches("http://g.test/__utm.gif?utmp=/"));
        assert!(!snap.prefilter_matches("http://example.com/index.html"));
    }

    #[test]
    fn select_provider_honors_priority_order() {
        let snap = RegistrySnapshot::build(&[]).unwrap();
        assert_eq!(
            snap.select_provider("http://m.test/b/ss/r/1/H.23/s?x=1"),
            ProviderKind::Omniture
        );
        assert_eq!(
            snap.select_provider("http://www.google-analytics.com/collect?v=1"),
            ProviderKind::UniversalAnalytics
        );
        assert_eq!(
            snap.select_provider("http://example.com/page"),
            ProviderKind::Unknown
        );
    }

    #[test]
    fn disabled_provider_is_not_selected() {
        let snap = RegistrySnapshot::build(&names(&["webtrends"])).unwrap();
        assert_eq!(
            snap.select_provider("http://m.test/b/ss/r/1/H.23/s?x=1"),
            ProviderKind::Unknown
        );
        assert!(!snap.prefilter_matches("http://m.test/b/ss/r/1/H.23/s?x=1"));
    }

    #[test]
    fn reload_swaps_wholesale() {
        let registry = ProviderRegistry::new(&[]).unwrap();
        let before = registry.snapshot();
        registry.reload(&names(&["urchin-is-not-a-name"])).unwrap();
        let after = registry.snapshot();
        // The old Arc still sees the full set; the new one is empty.
        assert_eq!(before.enabled(), ProviderKind::ALL);
        assert!(after.enabled().is_empty());
    }
}
