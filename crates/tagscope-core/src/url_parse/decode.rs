//! Query-token decoding with explicit degradation tracking.
//!
//! Vendors percent-encode inconsistently, and a malformed sequence must never
//! abort decoding of a request. Decoding runs in three steps: a strict
//! percent-decode, a legacy unescape pass, and finally the raw substring.

/// Which decode path produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeQuality {
    /// Strict percent-decode succeeded.
    Clean,
    /// Strict decode failed; the legacy unescape pass was used.
    LegacyUnescape,
    /// Both passes failed; the value is the raw substring.
    Raw,
}

impl DecodeQuality {
    /// True when a fallback path was taken.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, DecodeQuality::Clean)
    }
}

/// A decoded query key or value plus the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub quality: DecodeQuality,
}

/// Decode one raw query-string token (key or value).
///
/// `+` is treated as space, then `%XX` sequences are decoded. A truncated or
/// non-hex sequence, or a byte stream that is not valid UTF-8, fails the
/// strict pass; the legacy pass then decodes `%XX` as a Latin-1 code point
/// and `%uXXXX` as a BMP code point, keeping malformed runs verbatim. The
/// result always escapes `<` as `&lt;` so a hostile parameter cannot inject
/// markup into the inspection surface.
pub fn decode(raw: &str) -> Decoded {
    let spaced = raw.replace('+', " ");
    let (text, quality) = match strict_percent_decode(&spaced) {
        Some(text) => (text, DecodeQuality::Clean),
        None => match legacy_unescape(&spaced) {
            Some(text) => (text, DecodeQuality::LegacyUnescape),
            None => (spaced, DecodeQuality::Raw),
        },
    };
    Decoded {
        text: text.replace('<', "&lt;"),
        quality,
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Strict pass: every `%` must start a full two-digit hex escape and the
/// decoded bytes must form valid UTF-8.
fn strict_percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_val(*bytes.get(i + 1)?)?;
            let lo = hex_val(*bytes.get(i + 2)?)?;
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Legacy pass, modeled on the old `unescape` semantics: `%XX` is a Latin-1
/// code point, `%uXXXX` a BMP code point, anything malformed is copied
/// verbatim. Fails only when a `%uXXXX` escape names an unpaired surrogate.
fn legacy_unescape(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(window) = bytes.get(i + 1..i + 6) {
                if window[0] == b'u' && window[1..].iter().all(u8::is_ascii_hexdigit) {
                    let hex = std::str::from_utf8(&window[1..]).ok()?;
                    let unit = u32::from_str_radix(hex, 16).ok()?;
                    out.push(char::from_u32(unit)?);
                    i += 6;
                    continue;
                }
            }
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).copied().and_then(hex_val),
                bytes.get(i + 2).copied().and_then(hex_val),
            ) {
                out.push(char::from(hi << 4 | lo));
                i += 3;
                continue;
            }
            out.push('%');
            i += 1;
        } else {
            // `%` is ASCII, so `i` is always on a char boundary here.
            match s[i..].chars().next() {
                Some(ch) => {
                    out.push(ch);
                    i += ch.len_utf8();
                }
                None => break,
            }
        }
    }
    Some(out)
}
