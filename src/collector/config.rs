use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::collector::error::{invalid_argument, CollectorResult};

/// Free-form metadata attached to every report.
pub type Metadata = Map<String, Value>;

/// Collector configuration.
///
/// Field names on the wire (and in JSON option documents) are `uid`, `extra`, `requestUrl`,
/// `historyCollect`, `hashCollect`, `domCollect` and `jsError`. Every field is optional when
/// deserializing; the observer flags default to `false`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorOptions {
    #[serde(rename = "uid", skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(rename = "extra", skip_serializing_if = "Option::is_none")]
    pub extra_metadata: Option<Metadata>,
    /// Endpoint receiving every report. Reports are dropped while it is blank.
    #[serde(rename = "requestUrl")]
    pub destination_url: String,
    #[serde(rename = "historyCollect")]
    pub history_collect: bool,
    #[serde(rename = "hashCollect")]
    pub hash_collect: bool,
    #[serde(rename = "domCollect")]
    pub dom_collect: bool,
    #[serde(rename = "jsError")]
    pub js_error: bool,
}

impl CollectorOptions {
    pub fn new(destination_url: impl Into<String>) -> Self {
        Self {
            destination_url: destination_url.into(),
            ..Default::default()
        }
    }

    /// Parses options from a JSON object such as `{"requestUrl": "...", "domCollect": true}`.
    pub fn from_json_str(json: &str) -> CollectorResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| invalid_argument(format!("invalid collector options: {err}")))
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_extra_metadata(mut self, extra: Metadata) -> Self {
        self.extra_metadata = Some(extra);
        self
    }

    pub fn with_history_collect(mut self, enabled: bool) -> Self {
        self.history_collect = enabled;
        self
    }

    pub fn with_hash_collect(mut self, enabled: bool) -> Self {
        self.hash_collect = enabled;
        self
    }

    pub fn with_dom_collect(mut self, enabled: bool) -> Self {
        self.dom_collect = enabled;
        self
    }

    pub fn with_js_error(mut self, enabled: bool) -> Self {
        self.js_error = enabled;
        self
    }

    /// Enables all four observers.
    pub fn with_all_collectors(self) -> Self {
        self.with_history_collect(true)
            .with_hash_collect(true)
            .with_dom_collect(true)
            .with_js_error(true)
    }

    pub fn has_destination(&self) -> bool {
        !self.destination_url.trim().is_empty()
    }
}
