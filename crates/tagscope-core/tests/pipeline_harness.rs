//! Integration test: drive the engine end to end with a collecting sink.
//!
//! Covers the documented behaviors of the whole pipeline: session gating,
//! prefiltering, provider dispatch, field classification, kind heuristics,
//! and the URL-length diagnostic.

mod common;

use tagscope_core::{
    AnalyticsEvent, DropReason, Engine, EventKind, RequestOutcome,
};

use common::record;

#[test]
fn known_provider_load_event_classifies_fields() {
    let engine = Engine::new(&[]).unwrap();
    engine.register_session(1);
    let mut sink: Vec<AnalyticsEvent> = Vec::new();

    let outcome = engine.process(
        &record(
            1,
            "http://example.com/b/ss/rsid/1/H.23/s?pageName=Home&ch=home",
            true,
        ),
        &mut sink,
    );

    assert_eq!(outcome, RequestOutcome::Emitted);
    let event = &sink[0];
    assert_eq!(event.provider, "OMNITURE");
    assert_eq!(event.kind, EventKind::Load);
    assert_eq!(event.fields.get("Page name"), Some("Home"));
    assert_eq!(event.fields.get("Channel"), Some("home"));
    assert_eq!(event.parent_url.as_deref(), Some("http://example.com/"));
}

#[test]
fn vendor_marker_overrides_kind_to_click() {
    let engine = Engine::new(&[]).unwrap();
    engine.register_session(1);
    let mut sink: Vec<AnalyticsEvent> = Vec::new();

    engine.process(
        &record(
            1,
            "http://example.com/b/ss/rsid/1/H.23/s?pageName=Home&ch=home&pe=lnk_o",
            true,
        ),
        &mut sink,
    );

    // Loading flag says load, but the pe marker wins.
    assert_eq!(sink[0].kind, EventKind::Click);
}

#[test]
fn every_query_key_is_accounted_for() {
    let engine = Engine::new(&[]).unwrap();
    engine.register_session(1);
    let mut sink: Vec<AnalyticsEvent> = Vec::new();

    engine.process(
        &record(
            1,
            "http://m.test/b/ss/r/1/H.23/s?pageName=Home&ch=home&c3=p&custom=1&custom=2&odd",
            false,
        ),
        &mut sink,
    );

    let fields = &sink[0].fields;
    // pageName, ch, c3 claimed; custom and odd declined.
    assert_eq!(fields.claimed_key_count(), 3);
    assert_eq!(fields.other_key_count(), 2);
    let other: Vec<&str> = fields.other().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(other, vec!["custom", "odd"]);
    assert_eq!(fields.other()[0].1, vec!["1", "2"]);
}

#[test]
fn unmatched_urls_drop_and_sessions_gate() {
    let engine = Engine::new(&[]).unwrap();
    let mut sink: Vec<AnalyticsEvent> = Vec::new();

    // Session not registered yet.
    let rec = record(9, "http://m.test/b/ss/r/1/H.23/s?x=1", true);
    assert_eq!(
        engine.process(&rec, &mut sink),
        RequestOutcome::Dropped(DropReason::NoConsumer)
    );

    engine.register_session(9);
    assert_eq!(engine.process(&rec, &mut sink), RequestOutcome::Emitted);

    // Non-analytics URL drops at the prefilter.
    assert_eq!(
        engine.process(&record(9, "http://cdn.test/app.js", true), &mut sink),
        RequestOutcome::Dropped(DropReason::PrefilterMiss)
    );
    assert_eq!(sink.len(), 1);
}

#[test]
fn provider_reload_applies_to_subsequent_requests() {
    let engine = Engine::new(&[]).unwrap();
    engine.register_session(1);
    let mut sink: Vec<AnalyticsEvent> = Vec::new();

    let ga = record(1, "http://g.test/__utm.gif?utmp=/home", true);
    assert_eq!(engine.process(&ga, &mut sink), RequestOutcome::Emitted);

    // Disable everything but WebTrends; the GA pixel now drops.
    engine
        .reload_providers(&["webtrends".to_string()])
        .unwrap();
    assert_eq!(
        engine.process(&ga, &mut sink),
        RequestOutcome::Dropped(DropReason::PrefilterMiss)
    );
    assert_eq!(sink.len(), 1);
}

#[test]
fn overlong_url_is_flagged_but_still_emitted() {
    let engine = Engine::new(&[]).unwrap();
    engine.register_session(1);
    let mut sink: Vec<AnalyticsEvent> = Vec::new();

    let long_url = format!(
        "http://m.test/b/ss/r/1/H.23/s?pageName={}",
        "x".repeat(2500)
    );
    engine.process(&record(1, &long_url, true), &mut sink);
    assert!(sink[0].full_url.exceeds_legacy_limit);

    engine.process(
        &record(1, "http://m.test/b/ss/r/1/H.23/s?pageName=Home", true),
        &mut sink,
    );
    assert!(!sink[1].full_url.exceeds_legacy_limit);
}

#[test]
fn decode_fallback_degrades_but_never_fails() {
    let engine = Engine::new(&[]).unwrap();
    engine.register_session(1);
    let mut sink: Vec<AnalyticsEvent> = Vec::new();

    let outcome = engine.process(
        &record(1, "http://m.test/b/ss/r/1/H.23/s?pageName=Home&bad=%zz", true),
        &mut sink,
    );

    assert_eq!(outcome, RequestOutcome::Emitted);
    let fields = &sink[0].fields;
    assert_eq!(fields.get("Page name"), Some("Home"));
    // The malformed value survives verbatim in the other bucket.
    assert_eq!(fields.other()[0].1, vec!["%zz"]);
}
