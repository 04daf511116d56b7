//! `tagscope decode` – decode one request URL.

use anyhow::Result;
use chrono::Utc;
use tagscope_core::config::TagscopeConfig;
use tagscope_core::provider::RegistrySnapshot;
use tagscope_core::{decode_request, RawRequestRecord};

use crate::cli::render::print_event;

pub fn run_decode(cfg: &TagscopeConfig, url: &str, loading: bool, json: bool) -> Result<()> {
    let snapshot = RegistrySnapshot::build(&cfg.enabled_providers)?;
    if !snapshot.prefilter_matches(url) {
        tracing::info!("no enabled provider pattern matches; decoding as UNKNOWN");
    }

    let record = RawRequestRecord {
        url: url.to_string(),
        method: "GET".to_string(),
        session: 0,
        request_id: "-".to_string(),
        timestamp: Utc::now(),
        request_type: "manual".to_string(),
        initiator: None,
        post_body: None,
        parent_url: None,
        status_line: None,
        session_loading: loading,
    };

    let event = decode_request(&record, &snapshot);
    print_event(&event, &cfg.display, json)
}
