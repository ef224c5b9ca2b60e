use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::recommender::recommend;
use crate::server::config::ServiceConfig;
use crate::server::model_server::{ModelStore, RefreshOutcome};
use crate::traits::model::ModelError;

/// API errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// No model has been loaded yet; the caller may retry later
    #[error("The recommendation model is not available. Please try again later.")]
    ModelUnavailable,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// A validated recommendation request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendRequest {
    pub songs: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RecommendRequest {
    /// Create a request that uses the service's default limit
    pub fn new(songs: Vec<String>) -> Self {
        Self { songs, limit: None }
    }

    /// Parse a JSON body of the form `{"songs": [...], "limit": n}`
    pub fn from_json(body: &[u8]) -> ApiResult<Self> {
        serde_json::from_slice(body).map_err(|err| {
            ApiError::InvalidRequest(format!(
                "Request must include a \"songs\" field with a list of song names ({})",
                err
            ))
        })
    }
}

/// Recommendation response
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub songs: Vec<String>,
    /// Service version label
    pub version: String,
    pub model_date: String,
    pub input_songs: Vec<String>,
    pub num_recommendations: usize,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
    pub timestamp: String,
}

/// Description of the live model generation
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub generation: u64,
    pub model_version: String,
    pub model_date: String,
    pub rule_count: usize,
    pub support_threshold: Option<f64>,
    pub confidence_threshold: Option<f64>,
    pub loaded_at: String,
    pub seconds_since_reload: Option<u64>,
    pub uptime_secs: u64,
    pub stats: String,
}

/// Outcome of a manually triggered reload
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub reloaded: bool,
    pub generation: u64,
}

/// Request-side view of the model store
pub struct RecommendService {
    store: Arc<ModelStore>,
    server_version: String,
    default_limit: usize,
}

impl RecommendService {
    /// Create a new service over a shared model store
    pub fn new(store: Arc<ModelStore>, config: &ServiceConfig) -> Self {
        Self {
            store,
            server_version: config.server_version.clone(),
            default_limit: config.default_limit,
        }
    }

    /// Version label reported in every response
    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    /// Recommend songs against a single snapshot of the live model
    pub fn recommend(&self, request: RecommendRequest) -> ApiResult<RecommendResponse> {
        let start_time = Instant::now();
        let stats = self.store.stats();

        let snapshot = match self.store.current_snapshot() {
            Some(snapshot) => snapshot,
            None => {
                stats.record_unavailable();
                return Err(ApiError::ModelUnavailable);
            }
        };

        let limit = request.limit.unwrap_or(self.default_limit);
        let songs = recommend(&request.songs, snapshot.model(), limit);

        stats.record_recommendation(start_time.elapsed().as_micros() as usize);

        Ok(RecommendResponse {
            num_recommendations: songs.len(),
            songs,
            version: self.server_version.clone(),
            model_date: snapshot.model().metadata().model_date.clone(),
            input_songs: request.songs,
        })
    }

    /// Report whether a model is loaded
    pub fn health(&self) -> HealthStatus {
        let model_loaded = self.store.is_loaded();
        HealthStatus {
            status: if model_loaded { "healthy" } else { "unhealthy" }.to_string(),
            model_loaded,
            version: self.server_version.clone(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Describe the live model generation and store statistics
    pub fn model_info(&self) -> ApiResult<ModelInfo> {
        let snapshot = self.store.current_snapshot().ok_or(ApiError::ModelUnavailable)?;
        let metadata = snapshot.model().metadata();
        let stats = self.store.stats();

        Ok(ModelInfo {
            generation: snapshot.generation(),
            model_version: metadata.version.clone(),
            model_date: metadata.model_date.clone(),
            rule_count: metadata.rule_count,
            support_threshold: metadata.support_threshold,
            confidence_threshold: metadata.confidence_threshold,
            loaded_at: snapshot.loaded_at().to_rfc3339(),
            seconds_since_reload: stats.time_since_reload_secs(),
            uptime_secs: stats.uptime_secs(),
            stats: stats.format_stats(),
        })
    }

    /// Check the model file now instead of waiting for the next poll tick
    pub async fn reload(&self) -> ApiResult<ReloadResponse> {
        let outcome = self.store.refresh_async().await?;
        Ok(ReloadResponse {
            reloaded: matches!(outcome, RefreshOutcome::Reloaded { .. }),
            generation: self.store.generation(),
        })
    }
}
