use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::models::loader::load_model;
use crate::models::rules::RuleModel;
use crate::server::metrics::ModelStats;
use crate::server::poller::PollerHandle;
use crate::traits::model::ModelError;

/// One published generation: the rules together with the file state they came from
#[derive(Debug)]
pub struct ModelSnapshot {
    model: RuleModel,
    source_mtime: SystemTime,
    generation: u64,
    loaded_at: DateTime<Utc>,
}

impl ModelSnapshot {
    /// Get the rule model of this generation
    pub fn model(&self) -> &RuleModel {
        &self.model
    }

    /// Modification time of the model file this generation was read from
    pub fn source_mtime(&self) -> SystemTime {
        self.source_mtime
    }

    /// Starts at 1 and increases by one per publish
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wall-clock time the generation was published
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Result of a successful refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The file is not newer than the published generation
    Unchanged,
    /// A new generation was loaded and published
    Reloaded { generation: u64 },
}

/// Holds the live rule model and swaps in new generations without blocking readers.
///
/// Readers get an `Arc` to the current snapshot from a lock-free load. The only
/// mutation is replacing that `Arc`, which happens after the file has been read
/// and parsed, so request latency never depends on disk I/O.
pub struct ModelStore {
    source_path: PathBuf,
    /// Model and source mtime are swapped together as one snapshot
    current: ArcSwapOption<ModelSnapshot>,
    /// Serializes writers so check-then-publish cannot interleave
    reload_lock: Mutex<()>,
    stats: Arc<ModelStats>,
}

impl ModelStore {
    /// Create an empty store backed by `source_path`
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            current: ArcSwapOption::empty(),
            reload_lock: Mutex::new(()),
            stats: Arc::new(ModelStats::new()),
        }
    }

    /// Load the model once, then start polling the file for changes.
    ///
    /// A failed initial load is not fatal; the poller keeps looking for a
    /// usable file. Must be called from within a tokio runtime.
    pub fn initialize(
        source_path: impl Into<PathBuf>,
        poll_interval: Duration,
    ) -> (Arc<Self>, PollerHandle) {
        let store = Arc::new(Self::new(source_path));

        match store.refresh() {
            Ok(_) => info!(path = %store.source_path.display(), "initial model loaded"),
            Err(err) => warn!(
                path = %store.source_path.display(),
                error = %err,
                "could not load initial model, waiting for model file"
            ),
        }

        let poller = PollerHandle::spawn(Arc::clone(&store), poll_interval);
        (store, poller)
    }

    /// Get the model file this store watches
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The live snapshot, or `None` before the first successful load.
    ///
    /// The returned snapshot stays valid while held even if a newer one is
    /// published concurrently.
    pub fn current_snapshot(&self) -> Option<Arc<ModelSnapshot>> {
        self.current.load_full()
    }

    /// Check whether any generation has been published
    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Generation of the live snapshot, 0 when nothing is loaded
    pub fn generation(&self) -> u64 {
        self.current
            .load_full()
            .map(|snapshot| snapshot.generation)
            .unwrap_or(0)
    }

    /// Get the shared reload and request counters
    pub fn stats(&self) -> Arc<ModelStats> {
        Arc::clone(&self.stats)
    }

    /// Reload the model if the source file is newer than the live generation.
    ///
    /// Blocks on file I/O. On any error the previous snapshot is kept.
    pub fn refresh(&self) -> Result<RefreshOutcome, ModelError> {
        let _writer = self.reload_lock.lock();

        let source_mtime = match fs::metadata(&self.source_path) {
            Ok(meta) => meta.modified()?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ModelError::SourceNotFound(self.source_path.clone()));
            }
            Err(err) => {
                self.stats.record_reload_error();
                return Err(err.into());
            }
        };

        let current = self.current.load_full();
        if let Some(snapshot) = &current {
            if source_mtime <= snapshot.source_mtime {
                return Ok(RefreshOutcome::Unchanged);
            }
        }

        let start_time = Instant::now();
        let model = match load_model(&self.source_path) {
            Ok(model) => model,
            Err(err) => {
                if !err.is_source_missing() {
                    self.stats.record_reload_error();
                }
                return Err(err);
            }
        };

        let generation = self.publish_locked(model, source_mtime);
        self.stats
            .record_reload(start_time.elapsed().as_micros() as usize);

        Ok(RefreshOutcome::Reloaded { generation })
    }

    /// Run [`ModelStore::refresh`] on the blocking pool
    pub async fn refresh_async(self: &Arc<Self>) -> Result<RefreshOutcome, ModelError> {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || store.refresh())
            .await
            .map_err(|err| ModelError::TaskFailed(err.to_string()))?
    }

    /// Publish an already-built model as the next generation
    pub fn publish(&self, model: RuleModel, source_mtime: SystemTime) -> u64 {
        let _writer = self.reload_lock.lock();
        self.publish_locked(model, source_mtime)
    }

    fn publish_locked(&self, model: RuleModel, source_mtime: SystemTime) -> u64 {
        let generation = self.generation() + 1;
        info!(
            generation,
            version = %model.metadata().version,
            model_date = %model.metadata().model_date,
            rules = model.len(),
            "model published"
        );

        self.current.store(Some(Arc::new(ModelSnapshot {
            model,
            source_mtime,
            generation,
            loaded_at: Utc::now(),
        })));

        generation
    }
}
