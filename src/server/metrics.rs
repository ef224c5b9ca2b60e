use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::SystemTime;

/// Counters describing request and reload activity of a model store
#[derive(Debug)]
pub struct ModelStats {
    /// Total number of recommendation requests served
    pub recommendation_count: AtomicUsize,
    /// Requests rejected because no model was loaded
    pub unavailable_count: AtomicUsize,
    /// Successful model publications
    pub reload_count: AtomicUsize,
    /// Failed load attempts (missing files are not counted)
    pub reload_errors: AtomicUsize,
    /// Latest recommendation latency in microseconds
    pub latest_recommend_latency_us: AtomicUsize,
    /// Latest load + parse latency in microseconds
    pub latest_reload_latency_us: AtomicUsize,
    /// Creation timestamp
    pub created_at: SystemTime,
    /// Last successful publish, seconds since the epoch
    pub last_reloaded_at: AtomicU64,
}

impl ModelStats {
    pub fn new() -> Self {
        Self {
            recommendation_count: AtomicUsize::new(0),
            unavailable_count: AtomicUsize::new(0),
            reload_count: AtomicUsize::new(0),
            reload_errors: AtomicUsize::new(0),
            latest_recommend_latency_us: AtomicUsize::new(0),
            latest_reload_latency_us: AtomicUsize::new(0),
            created_at: SystemTime::now(),
            last_reloaded_at: AtomicU64::new(0),
        }
    }

    /// Record a successful publish
    pub fn record_reload(&self, latency_us: usize) {
        self.reload_count.fetch_add(1, Ordering::SeqCst);
        self.latest_reload_latency_us.store(latency_us, Ordering::SeqCst);
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.last_reloaded_at.store(now, Ordering::SeqCst);
    }

    pub fn record_reload_error(&self) {
        self.reload_errors.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_recommendation(&self, latency_us: usize) {
        self.recommendation_count.fetch_add(1, Ordering::SeqCst);
        self.latest_recommend_latency_us.store(latency_us, Ordering::SeqCst);
    }

    pub fn record_unavailable(&self) {
        self.unavailable_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Get formatted statistics as a string
    pub fn format_stats(&self) -> String {
        format!(
            "Reloads: {} | Reload errors: {} | Recommendations: {} | Unavailable: {} | Latency: {}μs/{}μs",
            self.reload_count.load(Ordering::Relaxed),
            self.reload_errors.load(Ordering::Relaxed),
            self.recommendation_count.load(Ordering::Relaxed),
            self.unavailable_count.load(Ordering::Relaxed),
            self.latest_recommend_latency_us.load(Ordering::Relaxed),
            self.latest_reload_latency_us.load(Ordering::Relaxed),
        )
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.created_at)
            .unwrap_or_default()
            .as_secs()
    }

    /// Seconds since the last successful publish, `None` if nothing was ever loaded
    pub fn time_since_reload_secs(&self) -> Option<u64> {
        let last = self.last_reloaded_at.load(Ordering::Relaxed);
        if last == 0 {
            return None;
        }
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Some(now.saturating_sub(last))
    }
}

impl Default for ModelStats {
    fn default() -> Self {
        Self::new()
    }
}
