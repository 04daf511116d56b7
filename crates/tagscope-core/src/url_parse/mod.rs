//! URL dissection into location, parameter string, query map, and anchor.
//!
//! Deliberately not a general URL parser: tracking pixels use `;` both as a
//! parameter-string delimiter and, for some vendors, as the base/query and
//! pair separator, so splitting follows the vendor conventions rather than
//! RFC 3986. Parsing never fails; malformed input degrades to partial
//! results.

mod decode;
mod query;

pub use decode::{decode, Decoded, DecodeQuality};
pub use query::QueryMap;

/// A dissected request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Everything before the first parameter/query separator.
    pub location: String,
    /// Optional `;`-delimited segment between location and query string.
    pub param_string: String,
    /// Ordered multi-value query mapping, keys and values decoded.
    pub query: QueryMap,
    /// Fragment after `#`, empty when absent.
    pub anchor: String,
    /// True when any key or value needed a fallback decode path.
    pub degraded: bool,
}

/// Split a URL into its pieces. Never fails.
///
/// The base/query separator is `?` when present, else `;`; splitting happens
/// at the first occurrence only, so a separator embedded in a later value is
/// not mis-split. Within the query string the pair separator is `&` when
/// present, else `;`, and each pair splits at its first `=` (missing value
/// decodes to the empty string).
pub fn parse(url: &str) -> ParsedUrl {
    let base_sep = if url.contains('?') { '?' } else { ';' };
    let (head, tail) = match url.split_once(base_sep) {
        Some((head, tail)) => (head, Some(tail)),
        None => (url, None),
    };

    let mut head_parts = head.split(';');
    let location = head_parts.next().unwrap_or("").to_string();
    let param_string = head_parts.next().unwrap_or("").to_string();

    let (query_string, anchor) = match tail {
        Some(tail) => match tail.split_once('#') {
            Some((q, a)) => (q, a),
            None => (tail, ""),
        },
        None => ("", ""),
    };

    let mut query = QueryMap::new();
    let mut degraded = false;
    if !query_string.is_empty() {
        let pair_sep = if query_string.contains('&') { '&' } else { ';' };
        for pair in query_string.split(pair_sep) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode(raw_key);
            let value = decode(raw_value);
            degraded |= key.quality.is_degraded() || value.quality.is_degraded();
            query.push(key.text, value.text);
        }
    }

    ParsedUrl {
        location,
        param_string,
        query,
        anchor: anchor.to_string(),
        degraded,
    }
}
