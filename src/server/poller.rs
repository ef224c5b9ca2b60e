use std::sync::Arc;
use std::time::Duration;

use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::server::model_server::{ModelStore, RefreshOutcome};

/// Background task that re-checks the model file every `interval`.
///
/// Load failures are logged and retried on the next tick forever; the
/// previously published model stays live in the meantime.
pub struct PollerHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Spawn the poller on the current tokio runtime
    pub fn spawn(store: Arc<ModelStore>, interval: Duration) -> Self {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let task = tokio::spawn(async move {
            debug!(target: "model-poller", interval_ms = interval.as_millis() as u64, "model poller started");
            loop {
                select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                match store.refresh_async().await {
                    Ok(RefreshOutcome::Reloaded { generation }) => {
                        debug!(target: "model-poller", generation, "model file changed, reloaded");
                    }
                    Ok(RefreshOutcome::Unchanged) => {}
                    Err(err) if err.is_source_missing() => {
                        debug!(target: "model-poller", error = %err, "model file not present yet");
                    }
                    Err(err) => {
                        warn!(
                            target: "model-poller",
                            path = %store.source_path().display(),
                            error = %err,
                            "model reload failed, keeping previous model"
                        );
                    }
                }
            }
            debug!(target: "model-poller", "model poller stopped");
        });

        Self { shutdown, task }
    }

    /// Token that stops the poller when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancel the poller and wait for it to exit
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(err) = self.task.await {
            warn!(target: "model-poller", error = %err, "model poller task failed");
        }
    }
}
