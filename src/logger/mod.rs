//! Diagnostic logging for the collector.
//!
//! Every subsystem owns a named [`Logger`]. Levels can be tuned globally with [`set_log_level`]
//! and a host application can mirror diagnostics into its own sink through
//! [`set_user_log_handler`]. None of this output is part of the reporting wire contract.

use chrono::{SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock, Weak};

static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INSTANCES: LazyLock<Mutex<Vec<Weak<LoggerInner>>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

type SharedLogHandler = Arc<dyn Fn(&Logger, LogLevel, &str) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.inner.name)
            .field("level", &self.log_level())
            .finish()
    }
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        let inner = Arc::new(LoggerInner::new(name.into()));
        INSTANCES
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(&inner));
        Self { inner }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_u8(self.inner.log_level.load(Ordering::SeqCst))
    }

    pub fn set_log_level<L>(&self, level: L) -> Result<(), LogError>
    where
        L: IntoLogLevel,
    {
        let level = level.into_log_level()?;
        self.inner.log_level.store(level as u8, Ordering::SeqCst);
        Ok(())
    }

    /// Replaces the sink that renders records. The handler is responsible for its own level
    /// filtering.
    pub fn set_log_handler<F>(&self, handler: F)
    where
        F: Fn(&Logger, LogLevel, &str) + Send + Sync + 'static,
    {
        *self
            .inner
            .log_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(handler);
    }

    pub fn has_user_log_handler(&self) -> bool {
        self.inner
            .user_log_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn set_user_log_handler(&self, handler: Option<SharedLogHandler>) {
        *self
            .inner
            .user_log_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = handler;
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.write(LogLevel::Debug, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.write(LogLevel::Info, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.write(LogLevel::Warn, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.write(LogLevel::Error, message.into());
    }

    fn write(&self, level: LogLevel, message: String) {
        let user_handler = self
            .inner
            .user_log_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = user_handler {
            handler(self, level, &message);
        }

        let handler = self
            .inner
            .log_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        handler(self, level, &message);
    }
}

struct LoggerInner {
    name: String,
    log_level: AtomicU8,
    log_handler: RwLock<SharedLogHandler>,
    user_log_handler: RwLock<Option<SharedLogHandler>>,
}

impl LoggerInner {
    fn new(name: String) -> Self {
        Self {
            name,
            log_level: AtomicU8::new(GLOBAL_LOG_LEVEL.load(Ordering::SeqCst)),
            log_handler: RwLock::new(Arc::new(default_log_handler)),
            user_log_handler: RwLock::new(None),
        }
    }
}

fn default_log_handler(logger: &Logger, level: LogLevel, message: &str) {
    if level == LogLevel::Silent || level < logger.log_level() {
        return;
    }

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    write_line(level, &format!("[{now}]  {}: {message}", logger.name()));
}

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
fn write_line(level: LogLevel, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        LogLevel::Error => web_sys::console::error_1(&value),
        LogLevel::Warn => web_sys::console::warn_1(&value),
        LogLevel::Info => web_sys::console::info_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

#[cfg(not(all(feature = "wasm-web", target_arch = "wasm32")))]
fn write_line(level: LogLevel, line: &str) {
    match level {
        LogLevel::Warn | LogLevel::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

fn for_each_instance<F>(mut f: F)
where
    F: FnMut(Logger),
{
    let mut instances = INSTANCES.lock().unwrap_or_else(PoisonError::into_inner);
    instances.retain(|weak| match weak.upgrade() {
        Some(inner) => {
            f(Logger { inner });
            true
        }
        None => false,
    });
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Silent = 4,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            _ => LogLevel::Silent,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" => Ok(LogLevel::Silent),
            other => Err(LogError::InvalidLogLevel(other.to_string())),
        }
    }
}

/// Accepts a [`LogLevel`] or its name, e.g. a level read from host configuration.
pub trait IntoLogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError>;
}

impl IntoLogLevel for LogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        Ok(self)
    }
}

impl IntoLogLevel for &str {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        LogLevel::from_str(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Minimum level forwarded to the user handler. Falls back to each logger's own level.
    pub level: Option<LogLevel>,
}

/// Record handed to a user log handler.
#[derive(Debug, Clone)]
pub struct LogCallbackParams {
    pub level: LogLevel,
    pub message: String,
    pub logger_type: String,
}

pub type LogCallback = Arc<dyn Fn(LogCallbackParams) + Send + Sync + 'static>;

#[derive(Debug, Clone)]
pub enum LogError {
    InvalidLogLevel(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::InvalidLogLevel(level) => {
                write!(f, "Invalid value \"{level}\" assigned to `logLevel`")
            }
        }
    }
}

impl std::error::Error for LogError {}

/// Sets the level of every logger, including the ones created later.
pub fn set_log_level<L>(level: L) -> Result<(), LogError>
where
    L: IntoLogLevel,
{
    let level = level.into_log_level()?;
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    for_each_instance(|logger| {
        logger.inner.log_level.store(level as u8, Ordering::SeqCst);
    });
    Ok(())
}

/// Installs (or with `None`, removes) a callback that receives every record at or above the
/// configured threshold from all live loggers.
pub fn set_user_log_handler(callback: Option<LogCallback>, options: Option<LogOptions>) {
    let threshold = options.unwrap_or_default().level;
    for_each_instance(|logger| {
        let handler = callback.as_ref().map(|cb| {
            let cb = Arc::clone(cb);
            Arc::new(move |instance: &Logger, level: LogLevel, message: &str| {
                if level < threshold.unwrap_or_else(|| instance.log_level()) {
                    return;
                }
                cb(LogCallbackParams {
                    level,
                    message: message.to_owned(),
                    logger_type: instance.name().to_owned(),
                });
            }) as SharedLogHandler
        });
        logger.set_user_log_handler(handler);
    });
}

pub fn set_user_log_handler_fn<F>(callback: Option<F>, options: Option<LogOptions>)
where
    F: Fn(LogCallbackParams) + Send + Sync + 'static,
{
    set_user_log_handler(callback.map(|cb| Arc::new(cb) as LogCallback), options);
}

#[cfg(test)]
pub(crate) static TEST_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[cfg(test)]
mod tests {
    use super::*;

    fn reset_logging() {
        set_log_level(LogLevel::Info).unwrap();
        set_user_log_handler(None, None);
    }

    fn capture(logger: &Logger) -> Arc<Mutex<Vec<(LogLevel, String)>>> {
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        logger.set_log_handler(move |instance, level, message| {
            if level < instance.log_level() {
                return;
            }
            sink.lock().unwrap().push((level, message.to_owned()));
        });
        records
    }

    #[test]
    fn global_level_filters_records() {
        let _guard = TEST_GUARD.lock().unwrap_or_else(PoisonError::into_inner);
        reset_logging();
        let logger = Logger::new("@browser-collect/logger-level-test");
        let records = capture(&logger);

        set_log_level("warn").unwrap();
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");

        let stored = records.lock().unwrap();
        let levels: Vec<_> = stored.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, [LogLevel::Warn, LogLevel::Error]);
        assert_eq!(stored[0].1, "warn message");
        drop(stored);
        reset_logging();
    }

    #[test]
    fn loggers_created_later_inherit_global_level() {
        let _guard = TEST_GUARD.lock().unwrap_or_else(PoisonError::into_inner);
        reset_logging();
        set_log_level(LogLevel::Debug).unwrap();
        let logger = Logger::new("@browser-collect/logger-late");
        assert_eq!(logger.log_level(), LogLevel::Debug);
        reset_logging();
    }

    #[test]
    fn invalid_level_is_rejected() {
        let err = LogLevel::from_str("chatty").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value \"chatty\" assigned to `logLevel`");
    }

    #[test]
    fn user_log_handler_receives_records_above_its_threshold() {
        let _guard = TEST_GUARD.lock().unwrap_or_else(PoisonError::into_inner);
        reset_logging();
        let logger = Logger::new("@browser-collect/logger-user");
        let _records = capture(&logger);
        let name = logger.name().to_owned();

        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        set_user_log_handler_fn(
            Some(move |params: LogCallbackParams| {
                if params.logger_type == name {
                    sink.lock().unwrap().push(params);
                }
            }),
            Some(LogOptions {
                level: Some(LogLevel::Warn),
            }),
        );
        assert!(logger.has_user_log_handler());

        logger.info("ignored");
        logger.warn(format!("bad filter {:?}", ","));

        let records = captured.lock().unwrap().clone();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level.as_str(), "warn");
        assert_eq!(records[0].message, "bad filter \",\"");

        set_user_log_handler(None, None);
        assert!(!logger.has_user_log_handler());
        reset_logging();
    }
}
