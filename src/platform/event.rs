use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::collector::error::{invalid_argument, CollectorError, CollectorResult};

/// Markup attribute holding the tracking identifier of an element.
pub const TRACKING_KEY_ATTRIBUTE: &str = "target-key";
/// Markup attribute restricting which interactions are reported for an element.
pub const TRACKING_FILTER_ATTRIBUTE: &str = "target-event";

/// Callback registered on a [`HostWindow`]. Receives the event together with the location of
/// the page at dispatch time.
pub type EventListener = Arc<dyn Fn(&HostEvent, &PageLocation) + Send + Sync>;

/// Event source the collector installs its observers on.
///
/// Browser builds use [`BrowserWindow`](crate::platform::browser::BrowserWindow); other hosts
/// (tests, embedded webviews forwarding their events, server-side renderers) can use
/// [`MemoryWindow`](crate::platform::memory::MemoryWindow) or their own implementation.
pub trait HostWindow: Send + Sync {
    /// Registers `listener` for every event whose [`HostEvent::event_type`] equals `event_type`.
    fn add_event_listener(&self, event_type: &str, listener: EventListener) -> CollectorResult<()>;

    /// Wraps the `pushState`/`replaceState` mutators so each successful call is followed by a
    /// synthetic [`HostEvent::History`] of the same name.
    fn install_history_notifications(&self) -> CollectorResult<()>;
}

/// Snapshot of the page address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageLocation {
    pub href: String,
    /// Fragment including the leading `#`, or empty when the URL has none.
    pub hash: String,
}

impl PageLocation {
    pub fn new(href: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            hash: hash.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    History(HistoryEventKind),
    HashChange { old_url: String, new_url: String },
    Interaction {
        kind: InteractionKind,
        target: InteractionTarget,
    },
    ScriptError { message: String },
    UnhandledRejection { reason: Value },
}

impl HostEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            HostEvent::History(kind) => kind.as_str(),
            HostEvent::HashChange { .. } => "hashchange",
            HostEvent::Interaction { kind, .. } => kind.as_str(),
            HostEvent::ScriptError { .. } => "error",
            HostEvent::UnhandledRejection { .. } => "unhandledrejection",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HistoryEventKind {
    PushState,
    ReplaceState,
    PopState,
}

impl HistoryEventKind {
    pub const ALL: [HistoryEventKind; 3] = [
        HistoryEventKind::PushState,
        HistoryEventKind::ReplaceState,
        HistoryEventKind::PopState,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HistoryEventKind::PushState => "pushState",
            HistoryEventKind::ReplaceState => "replaceState",
            HistoryEventKind::PopState => "popstate",
        }
    }

    pub fn from_event_type(event_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == event_type)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    DoubleClick,
    ContextMenu,
    MouseOut,
    MouseOver,
    MouseDown,
    MouseUp,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 7] = [
        InteractionKind::Click,
        InteractionKind::DoubleClick,
        InteractionKind::ContextMenu,
        InteractionKind::MouseOut,
        InteractionKind::MouseOver,
        InteractionKind::MouseDown,
        InteractionKind::MouseUp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::Click => "click",
            InteractionKind::DoubleClick => "dblclick",
            InteractionKind::ContextMenu => "contextmenu",
            InteractionKind::MouseOut => "mouseout",
            InteractionKind::MouseOver => "mouseover",
            InteractionKind::MouseDown => "mousedown",
            InteractionKind::MouseUp => "mouseup",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = CollectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| invalid_argument(format!("unknown interaction type `{s}`")))
    }
}

/// Tracking attributes read from the element an interaction targeted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionTarget {
    tracking_key: Option<String>,
    tracking_filter: Option<String>,
}

impl InteractionTarget {
    pub fn new(tracking_key: Option<String>, tracking_filter: Option<String>) -> Self {
        Self {
            tracking_key,
            tracking_filter,
        }
    }

    /// Builds the target by querying an element's attributes by name.
    pub fn from_attributes<F>(mut attribute: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self {
            tracking_key: attribute(TRACKING_KEY_ATTRIBUTE),
            tracking_filter: attribute(TRACKING_FILTER_ATTRIBUTE),
        }
    }

    pub fn tracking_key(&self) -> Option<&str> {
        self.tracking_key.as_deref()
    }

    pub fn tracking_filter(&self) -> Option<&str> {
        self.tracking_filter.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interaction_names_round_trip_through_from_str() {
        for kind in InteractionKind::ALL {
            assert_eq!(kind.as_str().parse::<InteractionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn interaction_names_are_case_sensitive() {
        let err = "Click".parse::<InteractionKind>().unwrap_err();
        assert_eq!(err.code_str(), "collector/invalid-argument");
    }

    #[test]
    fn history_kinds_map_event_types() {
        assert_eq!(
            HistoryEventKind::from_event_type("popstate"),
            Some(HistoryEventKind::PopState)
        );
        assert_eq!(HistoryEventKind::from_event_type("popState"), None);
    }

    #[test]
    fn target_reads_tracking_attributes() {
        let target = InteractionTarget::from_attributes(|name| match name {
            TRACKING_KEY_ATTRIBUTE => Some("btn1".to_string()),
            _ => None,
        });
        assert_eq!(target.tracking_key(), Some("btn1"));
        assert_eq!(target.tracking_filter(), None);
    }

    #[test]
    fn event_types_match_dom_names() {
        let event = HostEvent::Interaction {
            kind: InteractionKind::DoubleClick,
            target: InteractionTarget::default(),
        };
        assert_eq!(event.event_type(), "dblclick");
        assert_eq!(
            HostEvent::UnhandledRejection { reason: Value::Null }.event_type(),
            "unhandledrejection"
        );
    }
}
