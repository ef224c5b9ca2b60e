use std::path::PathBuf;
use std::time::Duration;

use crate::models::recommender::DEFAULT_LIMIT;

/// Configuration for the recommendation service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path of the model file written by the training job
    pub model_path: PathBuf,
    /// How often to check the model file for changes (in seconds)
    pub check_interval_sec: u64,
    /// Version label reported in responses
    pub server_version: String,
    /// Recommendations returned when a request gives no limit
    pub default_limit: usize,
    pub host: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("../models/recommendation_model.json"),
            check_interval_sec: 5,
            server_version: "1.0".to_string(),
            default_limit: DEFAULT_LIMIT,
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServiceConfig {
    pub fn poll_interval(&self) -> Duration {
        // A zero interval would spin the poller
        Duration::from_secs(self.check_interval_sec.max(1))
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.check_interval_sec, 5);
        assert_eq!(config.server_version, "1.0");
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.socket_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_service_config_default_poll_interval() {
        let config = ServiceConfig::default();
        assert_eq!(
            config.model_path,
            PathBuf::from("../models/recommendation_model.json")
        );
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = ServiceConfig {
            check_interval_sec: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
