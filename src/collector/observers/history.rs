use serde_json::json;

use crate::collector::api::Collector;
use crate::collector::constants::{FIELD_EVENT, FIELD_HREF, FIELD_KEY, KEY_HISTORY};
use crate::collector::error::CollectorResult;
use crate::collector::observers::guarded;
use crate::collector::record::event_fields;
use crate::collector::LOGGER;
use crate::platform::event::{HistoryEventKind, HostEvent, HostWindow};

/// Wraps the history mutators, then reports `pushState`, `replaceState` and `popstate`.
///
/// `popstate` is native, so it is still reported when the mutators cannot be wrapped.
pub(super) fn install(collector: &Collector, host: &dyn HostWindow) -> CollectorResult<()> {
    if let Err(err) = host.install_history_notifications() {
        LOGGER.error(format!(
            "history mutators not wrapped, only popstate is reported: {err}"
        ));
    }

    for kind in HistoryEventKind::ALL {
        let reporter = collector.clone();
        host.add_event_listener(
            kind.as_str(),
            guarded("history", move |event, location| {
                if let HostEvent::History(kind) = event {
                    reporter.report(event_fields([
                        (FIELD_EVENT, json!(kind.as_str())),
                        (FIELD_KEY, json!(KEY_HISTORY)),
                        (FIELD_HREF, json!(location.href)),
                    ]));
                }
                Ok(())
            }),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::collector::api::Collector;
    use crate::collector::config::CollectorOptions;
    use crate::platform::memory::MemoryWindow;
    use crate::test_support::RecordingTransport;

    fn install(enabled: bool) -> (MemoryWindow, RecordingTransport) {
        let window = MemoryWindow::new("https://spa.test/").unwrap();
        let transport = RecordingTransport::default();
        Collector::with_host(
            CollectorOptions::new("https://collect.test").with_history_collect(enabled),
            &window,
            Arc::new(transport.clone()),
        );
        (window, transport)
    }

    #[test]
    fn push_state_reports_post_mutation_url() {
        let (window, transport) = install(true);

        window.push_state("/cart").unwrap();

        assert_eq!(window.href(), "https://spa.test/cart");
        let records = transport.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["event"], json!("pushState"));
        assert_eq!(records[0]["key"], json!("history"));
        assert_eq!(records[0]["href"], json!("https://spa.test/cart"));
    }

    #[test]
    fn replace_state_and_back_navigation_are_reported() {
        let (window, transport) = install(true);

        window.push_state("/a").unwrap();
        window.replace_state("/b").unwrap();
        assert!(window.back());

        let events: Vec<_> = transport
            .records()
            .iter()
            .map(|record| (record["event"].clone(), record["href"].clone()))
            .collect();
        assert_eq!(
            events,
            [
                (json!("pushState"), json!("https://spa.test/a")),
                (json!("replaceState"), json!("https://spa.test/b")),
                (json!("popstate"), json!("https://spa.test/")),
            ]
        );
    }

    #[test]
    fn disabled_flag_leaves_history_untouched() {
        let (window, transport) = install(false);

        window.push_state("/cart").unwrap();
        assert!(window.back());

        assert_eq!(window.href(), "https://spa.test/");
        assert!(transport.records().is_empty());
        assert_eq!(window.listener_count("popstate"), 0);
    }
}
