//! Telemetry collection: configuration, the collector itself, its observers and the beacon
//! transports reports are delivered through.

mod api;
mod config;
mod constants;
pub mod error;
mod observers;
mod record;
mod transport;

use std::sync::LazyLock;

use crate::logger::Logger;

pub use api::Collector;
pub use config::{CollectorOptions, Metadata};
pub use constants::BEACON_CONTENT_TYPE;
pub use record::{event_fields, EventFields, EventRecord};
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use transport::NavigatorBeacon;
pub use transport::{BeaconPayload, BeaconTransport};
#[cfg(not(target_arch = "wasm32"))]
pub use transport::{HttpBeacon, HttpBeaconConfig};

/// Diagnostic channel of the collector.
pub static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new(constants::COLLECTOR_LOGGER_NAME));
