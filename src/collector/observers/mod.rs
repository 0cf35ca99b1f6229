//! The four flag-gated observer strategies.
//!
//! Each strategy registers listeners on the host window and turns matching events into a call
//! to the collector's reporting primitive. Listener bodies run inside [`guarded`], so a fault in
//! one observer is logged and never reaches the host or the other observers.

mod dom;
mod hash;
mod history;
mod script_error;

use std::sync::Arc;

use crate::collector::api::Collector;
use crate::collector::error::CollectorResult;
use crate::collector::LOGGER;
use crate::platform::event::{EventListener, HostEvent, HostWindow, PageLocation};

pub(crate) fn install(collector: &Collector, host: &dyn HostWindow) {
    let options = collector.options();
    if options.history_collect {
        log_install_failure("history", history::install(collector, host));
    }
    if options.hash_collect {
        log_install_failure("hash", hash::install(collector, host));
    }
    if options.dom_collect {
        log_install_failure("dom", dom::install(collector, host));
    }
    if options.js_error {
        log_install_failure("script error", script_error::install(collector, host));
    }
}

fn log_install_failure(strategy: &str, result: CollectorResult<()>) {
    if let Err(err) = result {
        LOGGER.error(format!("failed to install {strategy} observer: {err}"));
    }
}

/// Wraps an observer body so errors become diagnostics instead of escaping the listener.
fn guarded<F>(strategy: &'static str, body: F) -> EventListener
where
    F: Fn(&HostEvent, &PageLocation) -> CollectorResult<()> + Send + Sync + 'static,
{
    Arc::new(move |event: &HostEvent, location: &PageLocation| {
        if let Err(err) = body(event, location) {
            LOGGER.warn(format!(
                "{strategy} observer ignored `{}` event: {err}",
                event.event_type()
            ));
        }
    })
}
