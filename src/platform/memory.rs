//! In-process host window.
//!
//! `MemoryWindow` keeps a session history of URLs and dispatches the same events a browser
//! window would: `pushState`/`replaceState` notifications once installed, `popstate` followed
//! by `hashchange` on fragment navigation and traversal, interactions on attribute-bearing
//! elements and script errors.
//! It is the host used on native targets and in tests.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use serde_json::Value;
use url::Url;

use crate::collector::error::{invalid_argument, CollectorResult};
use crate::platform::event::{
    EventListener, HistoryEventKind, HostEvent, HostWindow, InteractionKind, InteractionTarget,
    PageLocation,
};
use crate::platform::history::notify_after;

type HistoryMutator = Arc<dyn Fn(String) -> CollectorResult<()> + Send + Sync>;

#[derive(Clone)]
pub struct MemoryWindow {
    inner: Arc<MemoryWindowInner>,
}

impl fmt::Debug for MemoryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryWindow")
            .field("href", &self.location().href)
            .finish()
    }
}

struct MemoryWindowInner {
    listeners: Mutex<HashMap<String, Vec<EventListener>>>,
    session: Mutex<SessionHistory>,
    push_state: RwLock<HistoryMutator>,
    replace_state: RwLock<HistoryMutator>,
}

struct SessionHistory {
    entries: Vec<Url>,
    index: usize,
}

impl SessionHistory {
    fn current(&self) -> &Url {
        &self.entries[self.index]
    }

    fn push(&mut self, url: Url) {
        self.entries.truncate(self.index + 1);
        self.entries.push(url);
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, url: Url) {
        self.entries[self.index] = url;
    }
}

/// Minimal element used to target interactions at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryElement {
    attributes: BTreeMap<String, String>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl MemoryWindow {
    /// Creates a window whose session history starts at `initial_url`.
    pub fn new(initial_url: &str) -> CollectorResult<Self> {
        let url = Url::parse(initial_url)
            .map_err(|err| invalid_argument(format!("invalid URL `{initial_url}`: {err}")))?;

        let inner = Arc::new_cyclic(|weak: &Weak<MemoryWindowInner>| MemoryWindowInner {
            listeners: Mutex::new(HashMap::new()),
            session: Mutex::new(SessionHistory {
                entries: vec![url],
                index: 0,
            }),
            push_state: RwLock::new(navigation_mutator(weak.clone(), false)),
            replace_state: RwLock::new(navigation_mutator(weak.clone(), true)),
        });
        Ok(Self { inner })
    }

    pub fn location(&self) -> PageLocation {
        self.inner.location()
    }

    pub fn href(&self) -> String {
        self.location().href
    }

    /// Adds a session history entry for `url`, resolved against the current location.
    pub fn push_state(&self, url: &str) -> CollectorResult<()> {
        let mutator = self
            .inner
            .push_state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        mutator(url.to_string())
    }

    /// Replaces the current session history entry with `url`.
    pub fn replace_state(&self, url: &str) -> CollectorResult<()> {
        let mutator = self
            .inner
            .replace_state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        mutator(url.to_string())
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Traverses the session history by `delta` entries. Returns `false` without dispatching
    /// anything when the target entry does not exist.
    pub fn go(&self, delta: isize) -> bool {
        let (previous, next) = {
            let mut session = self.inner.lock_session();
            let Some(target) = session.index.checked_add_signed(delta) else {
                return false;
            };
            if delta == 0 || target >= session.entries.len() {
                return false;
            }
            let previous = session.current().clone();
            session.index = target;
            (previous, session.current().clone())
        };

        self.inner
            .dispatch(&HostEvent::History(HistoryEventKind::PopState));
        if differs_only_in_fragment(&previous, &next) {
            self.inner.dispatch(&HostEvent::HashChange {
                old_url: previous.to_string(),
                new_url: next.to_string(),
            });
        }
        true
    }

    /// Navigates to `fragment` the way assigning `location.hash` does: a new entry is pushed,
    /// then `popstate` and `hashchange` fire in that order. An unchanged fragment is a no-op.
    pub fn set_hash(&self, fragment: &str) {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let (old_url, new_url) = {
            let mut session = self.inner.lock_session();
            let previous = session.current().clone();
            let mut next = previous.clone();
            next.set_fragment(Some(fragment));
            if next == previous {
                return;
            }
            session.push(next.clone());
            (previous.to_string(), next.to_string())
        };
        self.inner
            .dispatch(&HostEvent::History(HistoryEventKind::PopState));
        self.inner
            .dispatch(&HostEvent::HashChange { old_url, new_url });
    }

    pub fn interact(&self, kind: InteractionKind, element: &MemoryElement) {
        let target =
            InteractionTarget::from_attributes(|name| element.attribute(name).map(str::to_owned));
        self.inner
            .dispatch(&HostEvent::Interaction { kind, target });
    }

    /// Simulates an uncaught script error.
    pub fn raise_error(&self, message: impl Into<String>) {
        self.inner.dispatch(&HostEvent::ScriptError {
            message: message.into(),
        });
    }

    /// Simulates an unhandled promise rejection.
    pub fn reject(&self, reason: impl Into<Value>) {
        self.inner.dispatch(&HostEvent::UnhandledRejection {
            reason: reason.into(),
        });
    }

    pub fn dispatch_event(&self, event: &HostEvent) {
        self.inner.dispatch(event);
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .map_or(0, Vec::len)
    }

    fn wrap_mutator(&self, slot: &RwLock<HistoryMutator>, kind: HistoryEventKind) {
        let mut guard = slot.write().unwrap_or_else(PoisonError::into_inner);
        let original = Arc::clone(&*guard);
        let window = Arc::downgrade(&self.inner);
        let wrapped: HistoryMutator = Arc::new(notify_after(
            move |url: String| original(url),
            move |result: &CollectorResult<()>| {
                if result.is_err() {
                    return;
                }
                if let Some(inner) = window.upgrade() {
                    inner.dispatch(&HostEvent::History(kind));
                }
            },
        ));
        *guard = wrapped;
    }
}

impl HostWindow for MemoryWindow {
    fn add_event_listener(&self, event_type: &str, listener: EventListener) -> CollectorResult<()> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event_type.to_string())
            .or_default()
            .push(listener);
        Ok(())
    }

    fn install_history_notifications(&self) -> CollectorResult<()> {
        self.wrap_mutator(&self.inner.push_state, HistoryEventKind::PushState);
        self.wrap_mutator(&self.inner.replace_state, HistoryEventKind::ReplaceState);
        Ok(())
    }
}

impl MemoryWindowInner {
    fn lock_session(&self) -> std::sync::MutexGuard<'_, SessionHistory> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn location(&self) -> PageLocation {
        let session = self.lock_session();
        let url = session.current();
        let hash = url
            .fragment()
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| format!("#{fragment}"))
            .unwrap_or_default();
        PageLocation::new(url.as_str(), hash)
    }

    fn navigate(&self, target: &str, replace: bool) -> CollectorResult<()> {
        let mut session = self.lock_session();
        let next = session
            .current()
            .join(target)
            .map_err(|err| invalid_argument(format!("invalid URL `{target}`: {err}")))?;
        if replace {
            session.replace(next);
        } else {
            session.push(next);
        }
        Ok(())
    }

    fn dispatch(&self, event: &HostEvent) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event.event_type())
            .cloned()
            .unwrap_or_default();
        if listeners.is_empty() {
            return;
        }

        let location = self.location();
        for listener in listeners {
            listener(event, &location);
        }
    }
}

fn navigation_mutator(window: Weak<MemoryWindowInner>, replace: bool) -> HistoryMutator {
    Arc::new(move |url: String| match window.upgrade() {
        Some(inner) => inner.navigate(&url, replace),
        None => Ok(()),
    })
}

fn differs_only_in_fragment(previous: &Url, next: &Url) -> bool {
    if previous.fragment() == next.fragment() {
        return false;
    }
    let mut previous = previous.clone();
    let mut next = next.clone();
    previous.set_fragment(None);
    next.set_fragment(None);
    previous == next
}
