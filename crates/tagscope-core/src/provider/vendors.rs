//! Per-vendor field handlers: raw query key -> named semantic field.
//!
//! Tables map the well-known keys of each beacon format to display names.
//! Keys outside a vendor's vocabulary are declined and end up in the "other"
//! bucket untouched.

use super::ProviderFault;
use crate::classify::ClassifiedFields;

/// Adobe Analytics (SiteCatalyst) fixed-name parameters.
const OMNITURE_FIELDS: &[(&str, &str)] = &[
    ("pageName", "Page name"),
    ("ch", "Channel"),
    ("events", "Events"),
    ("products", "Products"),
    ("purchaseID", "Purchase ID"),
    ("server", "Server"),
    ("g", "Current URL"),
    ("r", "Referrer URL"),
    ("cc", "Currency code"),
    ("pe", "Link type"),
    ("pev1", "Link URL"),
    ("pev2", "Link name"),
    ("t", "Browser time"),
    ("vid", "Visitor ID"),
    ("state", "Visitor state"),
    ("zip", "ZIP/Postal code"),
];

/// Beacon framing markers: claimed so they never clutter the "other" bucket,
/// but they carry no analytical meaning, so no field is written.
const OMNITURE_SUPPRESSED: &[&str] = &["AQB", "AQE", "ndh"];

/// Classic Google Analytics (`__utm.gif`) parameters.
const URCHIN_FIELDS: &[(&str, &str)] = &[
    ("utmac", "Account ID"),
    ("utmhn", "Hostname"),
    ("utmp", "Page"),
    ("utmdt", "Page title"),
    ("utmr", "Referrer URL"),
    ("utmt", "Hit type"),
    ("utme", "Extensible args"),
    ("utmcc", "Cookie values"),
    ("utmcs", "Document encoding"),
    ("utmsr", "Screen resolution"),
    ("utmsc", "Color depth"),
    ("utmul", "Language"),
    ("utmje", "Java enabled"),
    ("utmfl", "Flash version"),
    ("utmn", "Cache buster"),
    ("utmwv", "Tracking version"),
];

/// Universal Analytics Measurement Protocol (`/collect`) parameters.
const UNIVERSAL_FIELDS: &[(&str, &str)] = &[
    ("v", "Protocol version"),
    ("tid", "Tracking ID"),
    ("cid", "Client ID"),
    ("t", "Hit type"),
    ("dl", "Document location"),
    ("dp", "Page path"),
    ("dt", "Page title"),
    ("dr", "Referrer URL"),
    ("ul", "Language"),
    ("de", "Document encoding"),
    ("sr", "Screen resolution"),
    ("ec", "Event category"),
    ("ea", "Event action"),
    ("el", "Event label"),
    ("ev", "Event value"),
    ("an", "App name"),
    ("av", "App version"),
    ("z", "Cache buster"),
];

/// WebTrends (`dcs.gif`) parameters.
const WEBTRENDS_FIELDS: &[(&str, &str)] = &[
    ("dcsuri", "Page URI"),
    ("dcsref", "Referrer URL"),
    ("dcsdat", "Timestamp"),
    ("WT.ti", "Page title"),
    ("WT.co_f", "Session ID"),
    ("WT.tz", "Timezone"),
    ("WT.ul", "Language"),
    ("WT.cd", "Color depth"),
    ("WT.sr", "Screen resolution"),
    ("WT.js", "JavaScript enabled"),
    ("WT.fv", "Flash version"),
    ("WT.bs", "Browser size"),
    ("WT.dl", "Event type"),
];

fn joined(values: &[String]) -> String {
    values.join(", ")
}

fn table_lookup(table: &'static [(&str, &str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(raw, _)| *raw == key)
        .map(|(_, name)| *name)
}

/// Split `key` into a known prefix and a numeric index, e.g. `c12` -> 12.
/// Returns `Ok(None)` when the shape doesn't match; an index that does not
/// fit in `u32` is a fault the caller reports.
fn numbered_index(key: &str, prefix: &str) -> Result<Option<u32>, ProviderFault> {
    let rest = match key.strip_prefix(prefix) {
        Some(rest) => rest,
        None => return Ok(None),
    };
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let index = rest.parse::<u32>().map_err(|source| ProviderFault::BadIndex {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(index))
}

pub(super) fn omniture_handle(
    key: &str,
    values: &[String],
    out: &mut ClassifiedFields,
) -> Result<bool, ProviderFault> {
    if OMNITURE_SUPPRESSED.contains(&key) {
        return Ok(true);
    }
    if let Some(name) = table_lookup(OMNITURE_FIELDS, key) {
        out.set(name, joined(values));
        return Ok(true);
    }
    if let Some(n) = numbered_index(key, "c")? {
        out.set(format!("Prop {n}"), joined(values));
        return Ok(true);
    }
    if let Some(n) = numbered_index(key, "v")? {
        out.set(format!("eVar {n}"), joined(values));
        return Ok(true);
    }
    if let Some(n) = numbered_index(key, "h")? {
        out.set(format!("Hierarchy {n}"), joined(values));
        return Ok(true);
    }
    Ok(false)
}

pub(super) fn urchin_handle(
    key: &str,
    values: &[String],
    out: &mut ClassifiedFields,
) -> Result<bool, ProviderFault> {
    match table_lookup(URCHIN_FIELDS, key) {
        Some(name) => {
            out.set(name, joined(values));
            Ok(true)
        }
        None => Ok(false),
    }
}

pub(super) fn universal_handle(
    key: &str,
    values: &[String],
    out: &mut ClassifiedFields,
) -> Result<bool, ProviderFault> {
    if let Some(name) = table_lookup(UNIVERSAL_FIELDS, key) {
        out.set(name, joined(values));
        return Ok(true);
    }
    if let Some(n) = numbered_index(key, "cd")? {
        out.set(format!("Custom dimension {n}"), joined(values));
        return Ok(true);
    }
    if let Some(n) = numbered_index(key, "cm")? {
        out.set(format!("Custom metric {n}"), joined(values));
        return Ok(true);
    }
    Ok(false)
}

pub(super) fn webtrends_handle(
    key: &str,
    values: &[String],
    out: &mut ClassifiedFields,
) -> Result<bool, ProviderFault> {
    match table_lookup(WEBTRENDS_FIELDS, key) {
        Some(name) => {
            out.set(name, joined(values));
            Ok(true)
        }
        None => Ok(false),
    }
}
