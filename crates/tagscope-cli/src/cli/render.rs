//! Text rendering of decoded events, honoring display preferences.

use anyhow::Result;
use tagscope_core::config::DisplayConfig;
use tagscope_core::AnalyticsEvent;

fn quoted(value: &str, display: &DisplayConfig) -> String {
    if display.show_quotes {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Render one event as a readable block.
pub fn render_text(event: &AnalyticsEvent, display: &DisplayConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== {} {} @ {}\n",
        event.provider,
        event.kind,
        event.timestamp.to_rfc3339()
    ));
    out.push_str(&format!(
        "    URL: {} ({} chars{})\n",
        event.full_url.url,
        event.full_url.length,
        if event.full_url.exceeds_legacy_limit {
            ", too long for legacy browsers!"
        } else {
            ""
        }
    ));
    if let Some(parent) = &event.parent_url {
        out.push_str(&format!("    Parent: {parent}\n"));
    }
    out.push_str(&format!(
        "    Request: id={} type={}",
        event.request_id, event.request_type
    ));
    if let Some(status) = &event.status_line {
        out.push_str(&format!(" status={status}"));
    }
    out.push('\n');

    for (name, value) in event.fields.fields() {
        out.push_str(&format!("    {name}: {}\n", quoted(value, display)));
    }
    if !event.fields.other().is_empty() {
        out.push_str("    other:\n");
        for (key, values) in event.fields.other() {
            let mark = if display.highlight_keys.iter().any(|k| k == key) {
                "*"
            } else {
                " "
            };
            out.push_str(&format!(
                "     {mark}{key}: {}\n",
                quoted(&values.join(", "), display)
            ));
        }
    }
    out
}

/// Print one event in the selected format.
pub fn print_event(event: &AnalyticsEvent, display: &DisplayConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        print!("{}", render_text(event, display));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tagscope_core::provider::RegistrySnapshot;
    use tagscope_core::{decode_request, RawRequestRecord};

    fn event(url: &str) -> AnalyticsEvent {
        let snapshot = RegistrySnapshot::build(&[]).unwrap();
        let record = RawRequestRecord {
            url: url.to_string(),
            method: "GET".to_string(),
            session: 0,
            request_id: "1".to_string(),
            timestamp: Utc::now(),
            request_type: "image".to_string(),
            initiator: None,
            post_body: None,
            parent_url: None,
            status_line: None,
            session_loading: true,
        };
        decode_request(&record, &snapshot)
    }

    #[test]
    fn text_render_lists_claimed_and_other() {
        let ev = event("http://m.test/b/ss/r/1/H.23/s?pageName=Home&custom=1");
        let text = render_text(&ev, &DisplayConfig::default());
        assert!(text.contains("OMNITURE"));
        assert!(text.contains("Page name: \"Home\""));
        assert!(text.contains("custom: \"1\""));
    }

    #[test]
    fn quotes_follow_display_config() {
        let ev = event("http://m.test/b/ss/r/1/H.23/s?pageName=Home");
        let display = DisplayConfig {
            show_quotes: false,
            ..DisplayConfig::default()
        };
        let text = render_text(&ev, &display);
        assert!(text.contains("Page name: Home"));
        assert!(!text.contains("\"Home\""));
    }

    #[test]
    fn highlight_marks_configured_keys_in_other() {
        let ev = event("http://nobody.test/__utm.gif?events=1");
        // `events` stays raw under GA classic, so it lands in other and the
        // default highlight list marks it.
        let text = render_text(&ev, &DisplayConfig::default());
        assert!(text.contains("*events"));
    }
}
