use abtest_utils::config::{ConfigOverrides, EngineConfig};
use abtest_utils::engine::AbTestEngine;
use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

mod cli;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    // Set up logging level
    let default_filter = match args.verbosity {
        cli::LogLevel::Silent => "off",
        cli::LogLevel::Normal => "info",
        cli::LogLevel::Verbose => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let overrides = ConfigOverrides {
        seed: args.seed,
        metric_samples: args.samples,
        plot_samples: args.plot_samples,
        ..Default::default()
    };
    let config = EngineConfig::load(args.config.as_deref().map(Path::new), &overrides)?;
    let engine = AbTestEngine::new(config)?;
    let state = Arc::new(AppState::new(engine));

    let app = routes::router()
        .layer(cors_layer(&args.allow_origins)?)
        .with_state(state);

    let listener = bind(&args.host, args.port).await?;
    info!(
        "abtest_server {} listening on {}",
        abtest_utils::VERSION,
        listener.local_addr()?
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Bind to `host:port`; `host` may be an IP address or a resolvable name.
async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Could not bind to {}:{}", host, port))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", o))
        })
        .collect::<Result<Vec<_>>>()?;
    info!("Allowing CORS origins: {:?}", origins);
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
