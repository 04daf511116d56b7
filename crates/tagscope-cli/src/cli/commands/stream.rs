//! `tagscope stream` – decode JSONL request records from stdin.

use std::io::{self, BufRead};

use anyhow::Result;
use tagscope_core::config::{DisplayConfig, TagscopeConfig};
use tagscope_core::{AnalyticsEvent, Engine, EventSink, RawRequestRecord};

use crate::cli::render::print_event;

struct PrintSink<'a> {
    display: &'a DisplayConfig,
    json: bool,
}

impl EventSink for PrintSink<'_> {
    fn emit(&mut self, event: AnalyticsEvent) {
        if let Err(err) = print_event(&event, self.display, self.json) {
            tracing::warn!("failed to print event: {err:#}");
        }
    }
}

pub fn run_stream(cfg: &TagscopeConfig, sessions: &[i64], json: bool) -> Result<()> {
    let engine = Engine::new(&cfg.enabled_providers)?;
    // With explicit --session filters only those sessions pass the gate;
    // otherwise the CLI registers interest in every session it sees.
    let auto_register = sessions.is_empty();
    for session in sessions {
        engine.register_session(*session);
    }

    let mut sink = PrintSink {
        display: &cfg.display,
        json,
    };

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RawRequestRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("skipping malformed record: {err}");
                continue;
            }
        };
        if auto_register {
            engine.register_session(record.session);
        }
        let outcome = engine.process(&record, &mut sink);
        tracing::trace!(?outcome, url = %record.url, "processed record");
    }
    Ok(())
}
