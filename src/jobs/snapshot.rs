//! Background job: periodically flush the project store to its snapshot file.
//!
//! Only writes when something changed since the last flush. A failed write
//! re-marks the store dirty so the next tick retries.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time;

use crate::store::{snapshot, MemoryStore};

/// Spawn the flush task. Call this once at startup.
pub fn spawn(store: MemoryStore, path: PathBuf, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(every);
        // first tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = flush(&store, &path).await {
                tracing::error!("snapshot job failed: {:#}", e);
            }
        }
    })
}

/// Write the store to `path` if it changed. Returns whether a write happened.
pub async fn flush(store: &MemoryStore, path: &std::path::Path) -> anyhow::Result<bool> {
    if !store.take_dirty() {
        return Ok(false);
    }
    let snap = store.snapshot();
    if let Err(e) = snapshot::save(path, &snap).await {
        store.mark_dirty();
        return Err(e);
    }
    tracing::debug!(
        projects = snap.projects.len(),
        path = %path.display(),
        "snapshot written"
    );
    Ok(true)
}
