use std::future::Future;
use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime};

static BACKGROUND_RUNTIME: LazyLock<Option<Runtime>> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("browser-collect-beacon")
        .enable_all()
        .build()
        .map_err(|err| log::warn!("failed to build background beacon runtime: {err}"))
        .ok()
});

/// Runs `future` in the background without ever awaiting it.
///
/// Uses the ambient Tokio runtime when called from inside one and a shared single-worker
/// runtime otherwise. Returns `false` when neither is available and the future was dropped.
pub fn spawn_detached<F>(future: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        handle.spawn(future);
        return true;
    }

    match BACKGROUND_RUNTIME.as_ref() {
        Some(runtime) => {
            runtime.spawn(future);
            true
        }
        None => false,
    }
}
