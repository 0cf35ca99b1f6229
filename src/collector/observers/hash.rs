use serde_json::json;

use crate::collector::api::Collector;
use crate::collector::constants::{
    EVENT_HASH_CHANGE, FIELD_EVENT, FIELD_HASH, FIELD_KEY, FIELD_NEW_URL, FIELD_OLD_URL, KEY_HASH,
};
use crate::collector::error::CollectorResult;
use crate::collector::observers::guarded;
use crate::collector::record::event_fields;
use crate::platform::event::{HostEvent, HostWindow};

pub(super) fn install(collector: &Collector, host: &dyn HostWindow) -> CollectorResult<()> {
    let reporter = collector.clone();
    host.add_event_listener(
        EVENT_HASH_CHANGE,
        guarded("hash", move |event, location| {
            if let HostEvent::HashChange { old_url, new_url } = event {
                reporter.report(event_fields([
                    (FIELD_EVENT, json!(EVENT_HASH_CHANGE)),
                    (FIELD_KEY, json!(KEY_HASH)),
                    (FIELD_HASH, json!(location.hash)),
                    (FIELD_OLD_URL, json!(old_url)),
                    (FIELD_NEW_URL, json!(new_url)),
                ]));
            }
            Ok(())
        }),
    )
}
