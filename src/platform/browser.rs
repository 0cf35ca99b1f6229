//! `HostWindow` backed by the real browser `window`.

use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, ErrorEvent, Event, HashChangeEvent, PromiseRejectionEvent};

use crate::collector::error::{platform_error, CollectorError, CollectorResult};
use crate::collector::LOGGER;
use crate::platform::event::{
    EventListener, HistoryEventKind, HostEvent, HostWindow, InteractionKind, InteractionTarget,
    PageLocation,
};
use crate::platform::history::notify_after;

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserWindow;

impl BrowserWindow {
    fn window() -> CollectorResult<web_sys::Window> {
        web_sys::window().ok_or_else(|| platform_error("window is not available"))
    }
}

impl HostWindow for BrowserWindow {
    fn add_event_listener(&self, event_type: &str, listener: EventListener) -> CollectorResult<()> {
        let window = Self::window()?;
        let callback = Closure::wrap(Box::new(move |event: Event| {
            if let Some(host_event) = convert_event(&event) {
                listener(&host_event, &current_location());
            }
        }) as Box<dyn FnMut(Event)>);

        window
            .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
            .map_err(|err| js_error("addEventListener", err))?;
        // Listeners stay installed for the lifetime of the page.
        callback.forget();
        Ok(())
    }

    fn install_history_notifications(&self) -> CollectorResult<()> {
        let history = Self::window()?
            .history()
            .map_err(|err| js_error("window.history", err))?;
        wrap_history_method(&history, HistoryEventKind::PushState)?;
        wrap_history_method(&history, HistoryEventKind::ReplaceState)
    }
}

fn wrap_history_method(history: &web_sys::History, kind: HistoryEventKind) -> CollectorResult<()> {
    let name = JsValue::from_str(kind.as_str());
    let original = js_sys::Reflect::get(history, &name)
        .map_err(|err| js_error("Reflect.get", err))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| platform_error(format!("history.{} is not a function", kind.as_str())))?;
    let this: JsValue = history.clone().into();

    let wrapped = notify_after(
        move |(state, title, url): (JsValue, JsValue, JsValue)| {
            original.call3(&this, &state, &title, &url)
        },
        move |result: &Result<JsValue, JsValue>| {
            if result.is_ok() {
                dispatch_synthetic(kind);
            }
        },
    );
    let replacement = Closure::wrap(Box::new(move |state: JsValue, title: JsValue, url: JsValue| {
        wrapped((state, title, url))
    })
        as Box<dyn FnMut(JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>);

    js_sys::Reflect::set(history, &name, replacement.as_ref())
        .map_err(|err| js_error("Reflect.set", err))?;
    replacement.forget();
    Ok(())
}

fn dispatch_synthetic(kind: HistoryEventKind) {
    let result = Event::new(kind.as_str()).and_then(|event| match web_sys::window() {
        Some(window) => window.dispatch_event(&event).map(|_| ()),
        None => Ok(()),
    });
    if let Err(err) = result {
        LOGGER.warn(format!(
            "failed to dispatch {} notification: {}",
            kind.as_str(),
            stringify_js_value(&err)
        ));
    }
}

fn current_location() -> PageLocation {
    let Some(window) = web_sys::window() else {
        return PageLocation::default();
    };
    let location = window.location();
    PageLocation::new(
        location.href().unwrap_or_default(),
        location.hash().unwrap_or_default(),
    )
}

fn convert_event(event: &Event) -> Option<HostEvent> {
    let event_type = event.type_();
    if let Some(kind) = HistoryEventKind::from_event_type(&event_type) {
        return Some(HostEvent::History(kind));
    }
    if let Ok(kind) = event_type.parse::<InteractionKind>() {
        let target = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .map(|element| InteractionTarget::from_attributes(|name| element.get_attribute(name)))
            .unwrap_or_default();
        return Some(HostEvent::Interaction { kind, target });
    }

    match event_type.as_str() {
        "hashchange" => event
            .dyn_ref::<HashChangeEvent>()
            .map(|change| HostEvent::HashChange {
                old_url: change.old_url(),
                new_url: change.new_url(),
            }),
        "error" => event.dyn_ref::<ErrorEvent>().map(|error| HostEvent::ScriptError {
            message: error.message(),
        }),
        "unhandledrejection" => event
            .dyn_ref::<PromiseRejectionEvent>()
            .map(|rejection| HostEvent::UnhandledRejection {
                reason: rejection_reason(&rejection.reason()),
            }),
        _ => None,
    }
}

/// Strings pass through and `Error` objects contribute their message. Other values round-trip
/// through `JSON.stringify`; values JSON cannot represent become `null`.
fn rejection_reason(reason: &JsValue) -> Value {
    if let Some(text) = reason.as_string() {
        return Value::String(text);
    }
    if let Some(error) = reason.dyn_ref::<js_sys::Error>() {
        return Value::String(String::from(error.message()));
    }
    if reason.is_undefined() {
        return Value::Null;
    }
    js_sys::JSON::stringify(reason)
        .ok()
        .and_then(|json| json.as_string())
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or(Value::Null)
}

fn stringify_js_value(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Ok(json) = js_sys::JSON::stringify(value) {
        if let Some(text) = json.as_string() {
            return text;
        }
    }
    format!("{value:?}")
}

fn js_error(context: &str, err: JsValue) -> CollectorError {
    platform_error(format!("{context} failed: {}", stringify_js_value(&err)))
}
