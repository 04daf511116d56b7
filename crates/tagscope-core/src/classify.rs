//! Field classification: delegate each query key to the selected provider.
//!
//! Claimed keys become named semantic fields; declined keys land verbatim in
//! the "other" bucket. A misbehaving provider capability demotes its key to
//! "other" instead of aborting the request.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::provider::ProviderKind;
use crate::url_parse::ParsedUrl;

/// Output of classification: provider-claimed semantic fields plus the
/// "other" bucket of unclaimed keys. Both sides preserve query order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedFields {
    fields: Vec<(String, String)>,
    other: Vec<(String, Vec<String>)>,
    claimed_keys: usize,
}

impl ClassifiedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a named semantic field. Called by provider field handlers; a
    /// handler may write zero or more fields per claimed key.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Record an unclaimed key with its full value sequence.
    pub fn push_other(&mut self, key: &str, values: &[String]) {
        self.other.push((key.to_string(), values.to_vec()));
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn other(&self) -> &[(String, Vec<String>)] {
        &self.other
    }

    /// First value recorded under a semantic field name, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of query keys a provider claimed (not the number of fields
    /// written: one key may produce zero or several fields).
    pub fn claimed_key_count(&self) -> usize {
        self.claimed_keys
    }

    pub fn other_key_count(&self) -> usize {
        self.other.len()
    }

    fn note_claimed(&mut self) {
        self.claimed_keys += 1;
    }
}

struct PairMap<'a>(&'a [(String, String)]);

impl Serialize for PairMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct MultiMap<'a>(&'a [(String, Vec<String>)]);

impl Serialize for MultiMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// Keys stay ordered, so serialization goes through ordered maps rather than
// deriving over the tuple vectors.
impl Serialize for ClassifiedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("ClassifiedFields", 2)?;
        st.serialize_field("fields", &PairMap(&self.fields))?;
        st.serialize_field("other", &MultiMap(&self.other))?;
        st.end()
    }
}

/// Classify every query key of `parsed` under `provider`.
///
/// Keys are visited in query order. A handler `Err` is logged and the key is
/// treated as declined; classification of the remaining keys is unaffected.
pub fn classify(parsed: &ParsedUrl, provider: ProviderKind) -> ClassifiedFields {
    let mut out = ClassifiedFields::new();
    for (key, values) in parsed.query.iter() {
        match provider.handle(key, values, &mut out) {
            Ok(true) => out.note_claimed(),
            Ok(false) => out.push_other(key, values),
            Err(fault) => {
                tracing::warn!(
                    provider = provider.name(),
                    key,
                    "field handler fault, demoting key to other: {fault}"
                );
                out.push_other(key, values);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_parse::parse;

    #[test]
    fn claimed_plus_other_covers_every_key() {
        let p = parse("http://metrics.test/b/ss/rsid/1/H.23/s?pageName=Home&ch=home&mystery=1&x=2");
        let c = classify(&p, ProviderKind::Omniture);
        assert_eq!(c.claimed_key_count() + c.other_key_count(), p.query.len());
        assert_eq!(c.get("Page name"), Some("Home"));
        assert_eq!(c.get("Channel"), Some("home"));
        let other_keys: Vec<&str> = c.other().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(other_keys, vec!["mystery", "x"]);
    }

    #[test]
    fn unknown_provider_declines_everything() {
        let p = parse("http://nobody.test/p?a=1&b=2&a=3");
        let c = classify(&p, ProviderKind::Unknown);
        assert_eq!(c.claimed_key_count(), 0);
        assert_eq!(c.other_key_count(), p.query.len());
        assert_eq!(c.other()[0].1, vec!["1", "3"]);
    }

    #[test]
    fn handler_fault_demotes_only_that_key() {
        // Prop index far beyond u32 range makes the Omniture handler fail
        // for that key alone.
        let p = parse("http://metrics.test/b/ss/r/1/H.23/s?c99999999999999999999=x&pageName=Home");
        let c = classify(&p, ProviderKind::Omniture);
        assert_eq!(c.get("Page name"), Some("Home"));
        let other_keys: Vec<&str> = c.other().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(other_keys, vec!["c99999999999999999999"]);
        assert_eq!(c.claimed_key_count() + c.other_key_count(), p.query.len());
    }

    #[test]
    fn multi_value_key_lands_whole_in_other() {
        let p = parse("http://nobody.test/p?dup=1&dup=2");
        let c = classify(&p, ProviderKind::Unknown);
        assert_eq!(c.other(), &[("dup".to_string(), vec!["1".into(), "2".into()])]);
    }
}
