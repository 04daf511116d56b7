//! HAR (HTTP Archive) input adapter: map capture entries to request records.
//!
//! A HAR file is a finished capture, so every record is produced with the
//! loading flag off and a synthetic session. Page references resolve to the
//! page title so events keep their parent URL.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::pipeline::{RawRequestRecord, SessionId};

/// Session id assigned to every record of an imported archive.
pub const HAR_SESSION: SessionId = 0;

#[derive(Debug, Deserialize)]
struct HarFile {
    log: HarLog,
}

#[derive(Debug, Deserialize)]
struct HarLog {
    #[serde(default)]
    pages: Vec<HarPage>,
    entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
struct HarPage {
    id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct HarEntry {
    #[serde(default)]
    pageref: Option<String>,
    #[serde(default, rename = "startedDateTime")]
    started_date_time: String,
    request: HarRequest,
    response: HarResponse,
}

#[derive(Debug, Deserialize)]
struct HarRequest {
    url: String,
    #[serde(default)]
    method: String,
    #[serde(default, rename = "postData")]
    post_data: Option<HarPostData>,
}

#[derive(Debug, Deserialize)]
struct HarPostData {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct HarResponse {
    #[serde(default)]
    status: u16,
    #[serde(default, rename = "statusText")]
    status_text: String,
    #[serde(default, rename = "httpVersion")]
    http_version: String,
}

/// Read a HAR file and map each entry to a [`RawRequestRecord`].
///
/// Entries are kept in capture order; the entry index becomes the request
/// id. A malformed `startedDateTime` falls back to the epoch rather than
/// failing the entry.
pub fn records_from_har(path: &Path) -> Result<Vec<RawRequestRecord>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open HAR file {}", path.display()))?;
    let har: HarFile = serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("failed to parse HAR file {}", path.display()))?;

    let pages: HashMap<String, String> = har
        .log
        .pages
        .into_iter()
        .map(|p| (p.id, p.title))
        .collect();

    let records = har
        .log
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let timestamp = DateTime::parse_from_rfc3339(&entry.started_date_time)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            let status_line = if entry.response.status > 0 {
                Some(
                    format!(
                        "{} {} {}",
                        entry.response.http_version,
                        entry.response.status,
                        entry.response.status_text
                    )
                    .trim()
                    .to_string(),
                )
            } else {
                None
            };
            let parent_url = entry
                .pageref
                .as_ref()
                .and_then(|id| pages.get(id))
                .filter(|title| !title.is_empty())
                .cloned();
            RawRequestRecord {
                url: entry.request.url,
                method: if entry.request.method.is_empty() {
                    "GET".to_string()
                } else {
                    entry.request.method
                },
                session: HAR_SESSION,
                request_id: index.to_string(),
                timestamp,
                request_type: "har".to_string(),
                initiator: None,
                post_body: entry.request.post_data.map(|p| p.text),
                parent_url,
                status_line,
                session_loading: false,
            }
        })
        .collect();
    Ok(records)
}
