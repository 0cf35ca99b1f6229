//! Fire-and-forget delivery of serialized event records.
//!
//! A transport only queues the payload. Whether it ever reaches the endpoint is never reported
//! back to the collector.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeaconPayload {
    body: String,
    content_type: &'static str,
}

impl BeaconPayload {
    pub fn new(body: impl Into<String>, content_type: &'static str) -> Self {
        Self {
            body: body.into(),
            content_type,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

/// Non-blocking, best-effort send primitive.
///
/// Implementations must return immediately. The boolean mirrors `navigator.sendBeacon`: `true`
/// when the payload was queued, `false` when the platform refused it up front.
pub trait BeaconTransport: Send + Sync {
    fn send_beacon(&self, url: &str, payload: BeaconPayload) -> bool;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{HttpBeacon, HttpBeaconConfig};

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::Duration;

    use reqwest::header::CONTENT_TYPE;
    use reqwest::{Client, Url};

    use super::{BeaconPayload, BeaconTransport};
    use crate::collector::error::{internal_error, CollectorResult};
    use crate::platform::runtime::spawn_detached;

    #[derive(Clone, Debug)]
    pub struct HttpBeaconConfig {
        timeout: Duration,
    }

    impl Default for HttpBeaconConfig {
        fn default() -> Self {
            Self {
                timeout: Duration::from_secs(10),
            }
        }
    }

    impl HttpBeaconConfig {
        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        pub fn timeout(&self) -> Duration {
            self.timeout
        }
    }

    /// Native stand-in for `navigator.sendBeacon`: POSTs the payload on a detached task and
    /// discards the outcome.
    #[derive(Clone, Debug)]
    pub struct HttpBeacon {
        client: Client,
    }

    impl HttpBeacon {
        pub fn new(config: HttpBeaconConfig) -> CollectorResult<Self> {
            let client = Client::builder()
                .timeout(config.timeout())
                .build()
                .map_err(|err| internal_error(format!("failed to build HTTP client: {err}")))?;
            Ok(Self { client })
        }
    }

    impl BeaconTransport for HttpBeacon {
        fn send_beacon(&self, url: &str, payload: BeaconPayload) -> bool {
            let url = match Url::parse(url) {
                Ok(url) => url,
                Err(err) => {
                    log::debug!("beacon refused, invalid destination `{url}`: {err}");
                    return false;
                }
            };

            let request = self
                .client
                .post(url)
                .header(CONTENT_TYPE, payload.content_type())
                .body(payload.into_body());

            spawn_detached(async move {
                match request.send().await {
                    Ok(response) => log::debug!("beacon answered with status {}", response.status()),
                    Err(err) => log::debug!("beacon delivery failed: {err}"),
                }
            })
        }
    }

}

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use browser::NavigatorBeacon;

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod browser {
    use wasm_bindgen::JsValue;
    use web_sys::{Blob, BlobPropertyBag};

    use super::{BeaconPayload, BeaconTransport};

    /// Delivers payloads through `navigator.sendBeacon`, which survives page unload.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct NavigatorBeacon;

    impl BeaconTransport for NavigatorBeacon {
        fn send_beacon(&self, url: &str, payload: BeaconPayload) -> bool {
            match queue_beacon(url, &payload) {
                Ok(queued) => queued,
                Err(err) => {
                    log::debug!("navigator.sendBeacon failed: {err:?}");
                    false
                }
            }
        }
    }

    fn queue_beacon(url: &str, payload: &BeaconPayload) -> Result<bool, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
        let options = BlobPropertyBag::new();
        options.set_type(payload.content_type());
        let parts = js_sys::Array::of1(&JsValue::from_str(payload.body()));
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
        window.navigator().send_beacon_with_opt_blob(url, Some(&blob))
    }
}
