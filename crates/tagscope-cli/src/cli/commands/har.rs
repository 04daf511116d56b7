//! `tagscope har` – decode every matching entry of a HAR capture.

use std::path::Path;

use anyhow::Result;
use tagscope_core::config::TagscopeConfig;
use tagscope_core::decode_request;
use tagscope_core::har::records_from_har;
use tagscope_core::provider::RegistrySnapshot;

use crate::cli::render::print_event;

pub fn run_har(cfg: &TagscopeConfig, path: &Path, json: bool) -> Result<()> {
    let snapshot = RegistrySnapshot::build(&cfg.enabled_providers)?;
    let records = records_from_har(path)?;
    let total = records.len();

    let mut emitted = 0usize;
    for record in &records {
        if !snapshot.prefilter_matches(&record.url) {
            continue;
        }
        let event = decode_request(record, &snapshot);
        print_event(&event, &cfg.display, json)?;
        emitted += 1;
    }

    if !json {
        println!("{emitted} of {total} entries matched an enabled provider.");
    }
    Ok(())
}
