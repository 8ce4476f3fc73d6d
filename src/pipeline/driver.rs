//! Background task that reruns the pipeline whenever the ledger changes.

use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error};

use super::CatalogPipeline;
use crate::cache::ApplyOutcome;
use crate::catalog::LedgerSnapshot;
use crate::content::ContentStore;

/// Statistics from the refresh driver.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DriverStats {
    pub refreshes: usize,
    pub cache_updates: usize,
    pub fetch_failures: usize,
    pub errors: usize,
}

/// A tokio task that refreshes a [`CatalogPipeline`] on every ledger change.
///
/// ## Example
///
/// ```ignore
/// let (ledger_tx, ledger_rx) = tokio::sync::watch::channel(LedgerSnapshot::Pending);
/// let driver = RefreshDriver::spawn(Arc::clone(&pipeline), ledger_rx);
///
/// ledger_tx.send(LedgerSnapshot::Ready(items))?;
///
/// let stats = driver.stop().await?;
/// println!("{} refreshes", stats.refreshes);
/// ```
pub struct RefreshDriver {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<DriverStats>,
}

impl RefreshDriver {
    /// Spawn the driver. It refreshes once for the current snapshot, then
    /// once per observed change, until stopped or the sender is dropped.
    pub fn spawn<S>(pipeline: Arc<CatalogPipeline<S>>, mut ledger: watch::Receiver<LedgerSnapshot>) -> Self
    where
        S: ContentStore + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut stats = DriverStats::default();

            loop {
                let snapshot = ledger.borrow_and_update().clone();

                match pipeline.refresh(&snapshot).await {
                    Ok(report) => {
                        stats.refreshes += 1;
                        stats.fetch_failures += report.failures.len();
                        if matches!(report.outcome, ApplyOutcome::Updated { .. }) {
                            stats.cache_updates += 1;
                        }
                    }
                    Err(err) => {
                        error!(%err, "catalog refresh failed");
                        stats.errors += 1;
                    }
                }

                tokio::select! {
                    changed = ledger.changed() => {
                        if changed.is_err() {
                            debug!("ledger sender dropped, stopping refresh driver");
                            break;
                        }
                    }
                    _ = &mut stop_rx => break,
                }
            }

            stats
        });

        Self {
            stop_tx: Some(stop_tx),
            handle,
        }
    }

    /// Signal the driver to stop and wait for its statistics.
    ///
    /// Fails only when the driver task panicked or was aborted.
    pub async fn stop(mut self) -> Result<DriverStats, JoinError> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        self.join().await
    }

    /// Wait for the driver to finish on its own (ledger sender dropped).
    pub async fn join(self) -> Result<DriverStats, JoinError> {
        self.handle.await.map_err(|err| {
            error!(%err, "refresh driver task failed");
            err
        })
    }
}
