pub(crate) const COLLECTOR_LOGGER_NAME: &str = "@browser-collect/collector";

/// Content type declared for every beacon body. The body is JSON text; `text/plain` is the
/// CORS-safelisted type that describes it without triggering a preflight.
pub const BEACON_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

pub(crate) const FIELD_EVENT: &str = "event";
pub(crate) const FIELD_KEY: &str = "key";
pub(crate) const FIELD_TIME: &str = "time";
pub(crate) const FIELD_HREF: &str = "href";
pub(crate) const FIELD_HASH: &str = "hash";
pub(crate) const FIELD_OLD_URL: &str = "oldUrl";
pub(crate) const FIELD_NEW_URL: &str = "newUrl";
pub(crate) const FIELD_MESSAGE: &str = "message";

pub(crate) const KEY_HISTORY: &str = "history";
pub(crate) const KEY_HASH: &str = "hash";
pub(crate) const KEY_JS_ERROR: &str = "jsError";
pub(crate) const KEY_DOM_PREFIX: &str = "dom-";

pub(crate) const EVENT_HASH_CHANGE: &str = "hashchange";
pub(crate) const EVENT_ERROR: &str = "error";
pub(crate) const EVENT_REJECT: &str = "reject";

/// `target-event` value that reports every interaction type.
pub(crate) const FILTER_ALL: &str = "all";
