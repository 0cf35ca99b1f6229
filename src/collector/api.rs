use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::collector::config::{CollectorOptions, Metadata};
use crate::collector::error::{invalid_argument, CollectorResult};
use crate::collector::observers;
use crate::collector::record::{EventFields, EventRecord};
use crate::collector::transport::BeaconTransport;
use crate::collector::LOGGER;
use crate::platform::event::HostWindow;

/// Telemetry collector.
///
/// Construction installs the observers enabled in [`CollectorOptions`] on a host window. Each
/// observed event, and every [`Collector::submit`] call, becomes one event record sent through
/// the beacon transport. Delivery is never confirmed or retried.
///
/// Installed listeners hold a clone of the collector, so it keeps reporting for as long as the
/// host window lives even if the returned handle is dropped.
#[derive(Clone)]
pub struct Collector {
    inner: Arc<CollectorInner>,
}

struct CollectorInner {
    options: RwLock<CollectorOptions>,
    transport: Arc<dyn BeaconTransport>,
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("options", &self.options())
            .finish()
    }
}

impl Collector {
    /// Installs a collector on the browser window, delivering through `navigator.sendBeacon`.
    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    pub fn new(options: CollectorOptions) -> Self {
        Self::with_host(
            options,
            &crate::platform::browser::BrowserWindow,
            Arc::new(crate::collector::transport::NavigatorBeacon),
        )
    }

    /// Installs a collector on `host`. Never fails: observers that cannot be installed are
    /// logged and skipped.
    pub fn with_host(
        options: CollectorOptions,
        host: &dyn HostWindow,
        transport: Arc<dyn BeaconTransport>,
    ) -> Self {
        let collector = Self {
            inner: Arc::new(CollectorInner {
                options: RwLock::new(options),
                transport,
            }),
        };
        observers::install(&collector, host);
        collector
    }

    /// Snapshot of the live configuration.
    pub fn options(&self) -> CollectorOptions {
        self.inner
            .options
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the identity attached to subsequent reports.
    pub fn set_identity(&self, identity: impl Into<String>) {
        self.inner
            .options
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .identity = Some(identity.into());
    }

    /// Replaces (does not merge) the extra metadata attached to subsequent reports.
    pub fn set_extra_metadata(&self, extra: Metadata) {
        self.inner
            .options
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extra_metadata = Some(extra);
    }

    /// Reports an application-defined event. `data` is merged over the configuration as is.
    pub fn submit(&self, data: EventFields) {
        self.report(data);
    }

    /// Serializes `data` and submits it. Fails without reporting anything when `data` does not
    /// serialize to a JSON object.
    pub fn submit_value<T>(&self, data: &T) -> CollectorResult<()>
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(data) {
            Ok(Value::Object(fields)) => {
                self.report(fields);
                Ok(())
            }
            Ok(other) => Err(invalid_argument(format!(
                "submitted data must serialize to a JSON object, got {other}"
            ))),
            Err(err) => Err(invalid_argument(format!(
                "failed to serialize submitted data: {err}"
            ))),
        }
    }

    pub(crate) fn report(&self, data: EventFields) {
        let options = self.options();
        if !options.has_destination() {
            LOGGER.debug("dropping report: no destination URL configured");
            return;
        }

        let payload = match EventRecord::build(&options, data, Utc::now().timestamp_millis())
            .and_then(|record| record.to_payload())
        {
            Ok(payload) => payload,
            Err(err) => {
                LOGGER.warn(format!("dropping report: {err}"));
                return;
            }
        };

        if !self
            .inner
            .transport
            .send_beacon(&options.destination_url, payload)
        {
            LOGGER.debug(format!(
                "beacon to {} was not queued",
                options.destination_url
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::record::event_fields;
    use crate::platform::memory::MemoryWindow;
    use crate::test_support::RecordingTransport;
    use serde_json::json;

    fn collector(options: CollectorOptions) -> (Collector, MemoryWindow, RecordingTransport) {
        let window = MemoryWindow::new("https://shop.test/").unwrap();
        let transport = RecordingTransport::default();
        let collector = Collector::with_host(options, &window, Arc::new(transport.clone()));
        (collector, window, transport)
    }

    #[test]
    fn submit_merges_configuration_and_timestamp() {
        let (collector, _window, transport) =
            collector(CollectorOptions::new("https://collect.test/beacon").with_identity("u-1"));
        let before = Utc::now().timestamp_millis();

        collector.submit(event_fields([("foo", json!("bar"))]));

        let records = transport.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["foo"], json!("bar"));
        assert_eq!(record["uid"], json!("u-1"));
        assert_eq!(record["requestUrl"], json!("https://collect.test/beacon"));
        assert!(record["time"].as_i64().unwrap() >= before);
        assert!(record.get("event").is_none());
        assert!(record.get("key").is_none());
        assert_eq!(transport.urls(), ["https://collect.test/beacon"]);
    }

    #[test]
    fn identity_changes_only_affect_future_reports() {
        let (collector, _window, transport) =
            collector(CollectorOptions::new("https://collect.test"));

        collector.set_identity("first");
        collector.submit(EventFields::new());
        collector.set_identity("second");
        collector.submit(EventFields::new());

        let records = transport.records();
        assert_eq!(records[0]["uid"], json!("first"));
        assert_eq!(records[1]["uid"], json!("second"));
    }

    #[test]
    fn extra_metadata_is_replaced_wholesale() {
        let (collector, _window, transport) = collector(
            CollectorOptions::new("https://collect.test")
                .with_extra_metadata(event_fields([("a", json!(1)), ("b", json!(2))])),
        );

        collector.set_extra_metadata(event_fields([("c", json!(true))]));
        collector.submit(EventFields::new());

        assert_eq!(transport.records()[0]["extra"], json!({"c": true}));
        assert_eq!(
            collector.options().extra_metadata,
            Some(event_fields([("c", json!(true))]))
        );
    }

    #[test]
    fn blank_destination_makes_reports_inert() {
        let (collector, _window, transport) = collector(CollectorOptions::new(""));

        collector.submit(event_fields([("foo", json!("bar"))]));

        assert!(transport.records().is_empty());
    }

    #[test]
    fn refused_beacons_are_not_surfaced() {
        let (collector, _window, transport) =
            collector(CollectorOptions::new("https://collect.test"));
        transport.refuse_all();

        collector.submit(EventFields::new());

        assert_eq!(transport.records().len(), 1);
    }

    #[test]
    fn submit_value_requires_an_object() {
        #[derive(Serialize)]
        struct Checkout {
            order_id: &'static str,
            total_cents: u32,
        }

        let (collector, _window, transport) =
            collector(CollectorOptions::new("https://collect.test"));

        collector
            .submit_value(&Checkout {
                order_id: "o-9",
                total_cents: 1250,
            })
            .unwrap();
        let err = collector.submit_value(&["not", "an", "object"]).unwrap_err();

        assert_eq!(err.code_str(), "collector/invalid-argument");
        let records = transport.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["order_id"], json!("o-9"));
        assert_eq!(records[0]["total_cents"], json!(1250));
    }

    #[test]
    fn dropping_the_handle_keeps_observers_reporting() {
        let window = MemoryWindow::new("https://shop.test/").unwrap();
        let transport = RecordingTransport::default();
        drop(Collector::with_host(
            CollectorOptions::new("https://collect.test").with_js_error(true),
            &window,
            Arc::new(transport.clone()),
        ));

        window.raise_error("late failure");

        assert_eq!(transport.records()[0]["message"], json!("late failure"));
    }
}
