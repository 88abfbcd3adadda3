// Remote sync: one-shot and periodic, never two at once
use crate::{
    models::{Quote, SyncReport},
    store::QuoteStore,
    Result,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Default gap between periodic syncs
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Where remote quotes come from
///
/// Implementations return quotes already mapped into our model; failures
/// should be `Error::RemoteSync`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// Another sync was still running
    Skipped,
}

/// Clears the in-flight flag however the sync ends, including cancellation
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs syncs against a shared store, at most one at a time
///
/// The fetch runs without holding the store lock, so local edits made
/// while a request is outstanding go through and are kept by the merge.
pub struct SyncService {
    store: Arc<Mutex<QuoteStore>>,
    source: Arc<dyn RemoteSource>,
    in_flight: AtomicBool,
}

impl SyncService {
    pub fn new(store: Arc<Mutex<QuoteStore>>, source: Arc<dyn RemoteSource>) -> Self {
        Self {
            store,
            source,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<Mutex<QuoteStore>> {
        &self.store
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Sync now unless a sync is already in flight
    pub async fn run_once(&self) -> Result<SyncOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync already in flight, skipping");
            return Ok(SyncOutcome::Skipped);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let incoming = self.source.fetch_quotes().await?;
        // merge_remote reloads from disk, so this holds the lock across read and write
        let report = self.store.lock().await.merge_remote(incoming)?;
        Ok(SyncOutcome::Completed(report))
    }

    /// Sync immediately and then every `every` until the handle is
    /// cancelled or dropped. Each result is handed to `on_result`; failures
    /// are also logged and the next tick tries again.
    pub fn spawn_periodic<F>(self: Arc<Self>, every: Duration, mut on_result: F) -> SyncHandle
    where
        F: FnMut(Result<SyncOutcome>) + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!("Periodic sync every {}s", every.as_secs());

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let result = tokio::select! {
                            result = self.run_once() => result,
                            _ = shutdown_rx.changed() => break,
                        };
                        if let Err(e) = &result {
                            warn!("Periodic sync failed: {}", e);
                        }
                        on_result(result);
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }

            debug!("Periodic sync stopped");
        });

        SyncHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running periodic sync
pub struct SyncHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Stop the task, abandoning a sync that is still fetching, and wait
    /// for it to exit
    pub async fn cancel(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Periodic sync task ended abnormally: {}", e);
        }
    }
}
