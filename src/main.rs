use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rulecast::server::http;
use rulecast::{ModelStore, RecommendService, ServiceConfig, DEFAULT_LIMIT};

/// Playlist recommendation API server
#[derive(Debug, Parser)]
#[command(name = "rulecast", version)]
struct Cli {
    /// Model file produced by the rule mining job
    #[arg(long, env = "MODEL_PATH", default_value = "../models/recommendation_model.json")]
    model_path: PathBuf,

    /// Seconds between model file checks
    #[arg(long, env = "CHECK_MODEL_INTERVAL", default_value_t = 5)]
    check_interval: u64,

    /// Version label reported by the API
    #[arg(long, env = "SERVER_VERSION", default_value = "1.0")]
    server_version: String,

    /// Recommendations returned when a request sets no limit
    #[arg(long, env = "DEFAULT_LIMIT", default_value_t = DEFAULT_LIMIT)]
    default_limit: usize,

    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,
}

impl From<Cli> for ServiceConfig {
    fn from(cli: Cli) -> Self {
        Self {
            model_path: cli.model_path,
            check_interval_sec: cli.check_interval,
            server_version: cli.server_version,
            default_limit: cli.default_limit,
            host: cli.host,
            port: cli.port,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from(Cli::parse());
    info!(
        version = %config.server_version,
        model_path = %config.model_path.display(),
        check_interval_sec = config.check_interval_sec,
        "starting playlist recommendation server"
    );

    let (store, poller) = ModelStore::initialize(config.model_path.clone(), config.poll_interval());
    let service = Arc::new(RecommendService::new(store, &config));

    let shutdown = poller.cancel_token();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                signal.cancel();
            }
            Err(err) => error!(error = %err, "could not listen for shutdown signal"),
        }
    });

    let addr = config.socket_addr();
    let result = http::serve(http::routes(service), &addr, shutdown.clone()).await;
    // Stop the poller even if the listener failed
    shutdown.cancel();
    poller.shutdown().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%addr, error = %err, "server error");
            ExitCode::FAILURE
        }
    }
}
