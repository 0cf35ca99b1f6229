//! Test utilities shared across crate-level unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::collector::{BeaconPayload, BeaconTransport};

/// Transport that keeps every payload it is handed.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<(String, BeaconPayload)>>>,
    refuse: Arc<AtomicBool>,
}

impl RecordingTransport {
    /// Makes subsequent sends report that the payload was not queued.
    pub fn refuse_all(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }

    pub fn urls(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Parsed bodies of every payload, in send order.
    pub fn records(&self) -> Vec<Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, payload)| serde_json::from_str(payload.body()).unwrap())
            .collect()
    }
}

impl BeaconTransport for RecordingTransport {
    fn send_beacon(&self, url: &str, payload: BeaconPayload) -> bool {
        self.sent.lock().unwrap().push((url.to_string(), payload));
        !self.refuse.load(Ordering::SeqCst)
    }
}
