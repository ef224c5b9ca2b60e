pub mod api;
pub mod config;
pub mod http;
pub mod metrics;
pub mod model_server;
pub mod poller;
