//! Rulecast: association-rule recommendations with zero-downtime model reloads
//!
//! This library serves recommendations from a rule model file that an offline
//! job rewrites while the service runs. Each request sees exactly one model
//! generation; new generations are published with an atomic pointer swap.

pub mod traits;
pub mod models;
pub mod server;


// Re-export key types for ergonomic use
pub use traits::items::ItemSet;
pub use traits::model::ModelError;
pub use models::rules::{ModelMetadata, Rule, RuleModel};
pub use models::loader::{load_model, parse_model};
pub use models::recommender::{recommend, DEFAULT_LIMIT};
pub use server::metrics::ModelStats;
pub use server::model_server::{ModelSnapshot, ModelStore, RefreshOutcome};
pub use server::poller::PollerHandle;
pub use server::config::ServiceConfig;

// Re-export API structures for ease of use
pub use server::api::{
    RecommendRequest,
    RecommendResponse,
    HealthStatus,
    ModelInfo,
    ReloadResponse,
    ApiError,
    ApiResult,
    RecommendService,
};
