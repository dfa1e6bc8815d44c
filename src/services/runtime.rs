//! Tokio Runtime Helpers
//!
//! Background work (autosave, health polling) runs as named tokio tasks so the
//! logs show when each one starts and stops.

use std::future::Future;

use tokio::task::JoinHandle;

/// Spawn a detached task with a name (for debugging)
pub fn spawn_named<F>(name: &'static str, future: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!("Spawning tokio task: {}", name);
    tokio::spawn(async move {
        future.await;
        tracing::debug!("Tokio task completed: {}", name);
    })
}

/// Build the multi-threaded runtime the binary runs on
pub fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("config-hub-worker")
        .build()
}
