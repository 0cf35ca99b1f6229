//! Drives a collector installed on an in-process window and prints every record it would send.

use std::sync::Arc;

use browser_collect::collector::{
    event_fields, BeaconPayload, BeaconTransport, Collector, CollectorOptions,
};
use browser_collect::platform::{InteractionKind, MemoryElement, MemoryWindow};

struct PrintingBeacon;

impl BeaconTransport for PrintingBeacon {
    fn send_beacon(&self, url: &str, payload: BeaconPayload) -> bool {
        println!("POST {url} [{}] {}", payload.content_type(), payload.body());
        true
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let window = MemoryWindow::new("https://shop.example/")?;
    let collector = Collector::with_host(
        CollectorOptions::new("https://collect.example/beacon")
            .with_identity("demo-user")
            .with_all_collectors(),
        &window,
        Arc::new(PrintingBeacon),
    );

    window.push_state("/catalog")?;
    window.set_hash("#shoes");
    window.interact(
        InteractionKind::Click,
        &MemoryElement::new()
            .with_attribute("target-key", "add-to-cart")
            .with_attribute("target-event", "click"),
    );
    window.raise_error("TypeError: price is undefined");
    window.back();

    collector.submit(event_fields([("checkout_step", 2.into())]));

    Ok(())
}
