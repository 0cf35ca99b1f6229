use serde_json::{Map, Value};

use crate::collector::config::CollectorOptions;
use crate::collector::constants::{BEACON_CONTENT_TYPE, FIELD_TIME};
use crate::collector::error::{internal_error, CollectorResult};
use crate::collector::transport::BeaconPayload;

/// Caller-supplied fields of a report.
pub type EventFields = Map<String, Value>;

/// Builds an [`EventFields`] map from literal pairs.
pub fn event_fields<const N: usize>(pairs: [(&str, Value); N]) -> EventFields {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Flat object sent for a single report.
///
/// Configuration fields come first, caller fields override them and `time` is always set
/// last.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRecord {
    fields: Map<String, Value>,
}

impl EventRecord {
    pub fn build(
        options: &CollectorOptions,
        data: EventFields,
        time_ms: i64,
    ) -> CollectorResult<Self> {
        let mut fields = match serde_json::to_value(options) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(internal_error(format!(
                    "collector options serialized to a non-object value: {other}"
                )))
            }
            Err(err) => {
                return Err(internal_error(format!(
                    "failed to serialize collector options: {err}"
                )))
            }
        };
        fields.extend(data);
        fields.insert(FIELD_TIME.to_string(), Value::from(time_ms));
        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_payload(&self) -> CollectorResult<BeaconPayload> {
        let body = serde_json::to_string(&self.fields)
            .map_err(|err| internal_error(format!("failed to serialize event record: {err}")))?;
        Ok(BeaconPayload::new(body, BEACON_CONTENT_TYPE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> CollectorOptions {
        CollectorOptions::new("https://collect.test")
            .with_identity("user-1")
            .with_extra_metadata(event_fields([("plan", json!("pro"))]))
    }

    #[test]
    fn merges_configuration_fields_and_time() {
        let record = EventRecord::build(
            &options(),
            event_fields([("event", json!("click")), ("key", json!("dom-buy"))]),
            1_700_000_000_000,
        )
        .unwrap();

        assert_eq!(record.get("uid"), Some(&json!("user-1")));
        assert_eq!(record.get("extra"), Some(&json!({"plan": "pro"})));
        assert_eq!(record.get("requestUrl"), Some(&json!("https://collect.test")));
        assert_eq!(record.get("domCollect"), Some(&json!(false)));
        assert_eq!(record.get("event"), Some(&json!("click")));
        assert_eq!(record.get("time"), Some(&json!(1_700_000_000_000i64)));
    }

    #[test]
    fn caller_fields_and_time_win_collisions() {
        let record = EventRecord::build(
            &options(),
            event_fields([
                ("uid", json!("override")),
                ("time", json!("caller time")),
            ]),
            5,
        )
        .unwrap();

        assert_eq!(record.get("uid"), Some(&json!("override")));
        assert_eq!(record.get("time"), Some(&json!(5)));
    }

    #[test]
    fn payload_is_json_text() {
        let record = EventRecord::build(
            &CollectorOptions::new("https://collect.test"),
            event_fields([("foo", json!("bar"))]),
            9,
        )
        .unwrap();
        let payload = record.to_payload().unwrap();

        assert_eq!(payload.content_type(), "text/plain;charset=UTF-8");
        let parsed: Value = serde_json::from_str(payload.body()).unwrap();
        assert_eq!(parsed["foo"], json!("bar"));
        assert_eq!(parsed["time"], json!(9));
        assert!(parsed.get("uid").is_none());
    }
}
