//! HTTP routes for the recommendation service.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::server::api::{ApiError, RecommendRequest, RecommendService};
use crate::traits::model::ModelError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::ModelUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "Model not loaded"),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            ApiError::Model(ModelError::SourceNotFound(_)) => {
                (StatusCode::NOT_FOUND, "Model file not found")
            }
            ApiError::Model(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Reload failed"),
        };
        let body = json!({
            "error": error,
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Build the service router
pub fn routes(service: Arc<RecommendService>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/recommend", post(recommend_handler))
        .route("/api/model", get(model_info_handler))
        .route("/api/reload", post(reload_handler))
        .with_state(service)
}

/// Serve `router` on `addr` (`host:port`, host names allowed) until `shutdown` is cancelled
pub async fn serve(
    router: Router,
    addr: &str,
    shutdown: CancellationToken,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

async fn index_handler(State(service): State<Arc<RecommendService>>) -> impl IntoResponse {
    Json(json!({
        "service": "Playlist Recommendation API",
        "version": service.server_version(),
        "endpoints": {
            "/api/recommend": "POST - Get song recommendations",
            "/api/model": "GET - Live model information",
            "/api/reload": "POST - Check the model file now",
            "/health": "GET - Health check",
        },
    }))
}

async fn health_handler(State(service): State<Arc<RecommendService>>) -> impl IntoResponse {
    let health = service.health();
    let status = if health.model_loaded {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}

async fn recommend_handler(
    State(service): State<Arc<RecommendService>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = RecommendRequest::from_json(&body)?;
    let response = service.recommend(request)?;
    Ok(Json(response))
}

async fn model_info_handler(
    State(service): State<Arc<RecommendService>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(service.model_info()?))
}

async fn reload_handler(
    State(service): State<Arc<RecommendService>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(service.reload().await?))
}
