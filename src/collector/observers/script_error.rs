use serde_json::json;

use crate::collector::api::Collector;
use crate::collector::constants::{
    EVENT_ERROR, EVENT_REJECT, FIELD_EVENT, FIELD_KEY, FIELD_MESSAGE, KEY_JS_ERROR,
};
use crate::collector::error::CollectorResult;
use crate::collector::observers::guarded;
use crate::collector::record::event_fields;
use crate::platform::event::{HostEvent, HostWindow};

/// Reports uncaught errors and unhandled rejections. Repeats are reported every time.
pub(super) fn install(collector: &Collector, host: &dyn HostWindow) -> CollectorResult<()> {
    let reporter = collector.clone();
    host.add_event_listener(
        "error",
        guarded("script error", move |event, _| {
            if let HostEvent::ScriptError { message } = event {
                reporter.report(event_fields([
                    (FIELD_EVENT, json!(EVENT_ERROR)),
                    (FIELD_KEY, json!(KEY_JS_ERROR)),
                    (FIELD_MESSAGE, json!(message)),
                ]));
            }
            Ok(())
        }),
    )?;

    let reporter = collector.clone();
    host.add_event_listener(
        "unhandledrejection",
        guarded("script error", move |event, _| {
            if let HostEvent::UnhandledRejection { reason } = event {
                reporter.report(event_fields([
                    (FIELD_EVENT, json!(EVENT_REJECT)),
                    (FIELD_KEY, json!(KEY_JS_ERROR)),
                    (FIELD_MESSAGE, reason.clone()),
                ]));
            }
            Ok(())
        }),
    )
}
