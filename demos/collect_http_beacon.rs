//! Sends a custom event to a real endpoint through the native HTTP beacon.
//! Replace the destination with your own collection endpoint.

use std::sync::Arc;
use std::time::Duration;

use browser_collect::collector::{Collector, CollectorOptions, HttpBeacon, HttpBeaconConfig};
use browser_collect::platform::MemoryWindow;
use serde::Serialize;

#[derive(Serialize)]
struct Signup<'a> {
    event: &'a str,
    plan: &'a str,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let window = MemoryWindow::new("https://app.example/")?;
    let beacon = HttpBeacon::new(HttpBeaconConfig::default().with_timeout(Duration::from_secs(5)))?;
    let collector = Collector::with_host(
        CollectorOptions::new("https://collect.example/beacon"),
        &window,
        Arc::new(beacon),
    );

    collector.set_identity("user-123");
    collector.submit_value(&Signup {
        event: "signup",
        plan: "team",
    })?;

    // The beacon is fire-and-forget; give the detached request a moment before exiting.
    tokio::time::sleep(Duration::from_millis(500)).await;
    Ok(())
}
