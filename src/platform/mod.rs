//! Host integration: the events the collector observes and the windows that emit them.

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub mod browser;
pub mod event;
pub mod history;
pub mod memory;
#[cfg(not(target_arch = "wasm32"))]
pub mod runtime;

pub use event::{
    EventListener, HistoryEventKind, HostEvent, HostWindow, InteractionKind, InteractionTarget,
    PageLocation, TRACKING_FILTER_ATTRIBUTE, TRACKING_KEY_ATTRIBUTE,
};
pub use history::notify_after;
pub use memory::{MemoryElement, MemoryWindow};
