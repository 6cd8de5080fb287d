//! Frontend rule router.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ loader ──▶ FileProvider ──(frontends)──┐
//!                                                          ▼
//!                                            ┌──────────────────────────┐
//!                                            │  routing::Router         │
//!                                            │  rule → compile → sort   │
//!                                            │  ArcSwap<RouteTable>     │
//!                                            └────────────┬─────────────┘
//!                                                         │ match_request
//!   Client Request ──▶ http::HttpServer ──────────────────┘
//!                      ◀── RouteMatch (backend, path, headers) or 404
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;

use frontend_router::config::loader::load_config;
use frontend_router::config::watcher::{FileProvider, FILE_PROVIDER};
use frontend_router::observability::logging::init_logging;
use frontend_router::{HttpServer, Router};

#[derive(Parser)]
#[command(name = "frontend-router")]
#[command(about = "Rule-based frontend router", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    /// Compile the configured frontends, report problems and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    if cli.check {
        return Ok(check(config));
    }

    init_logging(&config.observability)?;
    tracing::info!(config = ?cli.config, "frontend-router v0.1.0 starting");

    let router = Arc::new(Router::new(config.router));
    router.update(FILE_PROVIDER, config.frontends);

    // Keep the watcher alive for the lifetime of the server
    let (provider, mut updates) = FileProvider::new(&cli.config);
    let _watcher = provider.run()?;

    let update_router = router.clone();
    tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            update_router.update(update.provider, update.frontends);
        }
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    HttpServer::new(router).run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}

fn check(config: frontend_router::ProxyConfig) -> ExitCode {
    let router = Router::new(config.router);
    let report = router.update(FILE_PROVIDER, config.frontends);

    for failure in &report.errors {
        eprintln!("frontend '{}': {}", failure.frontend, failure.error);
    }
    println!("{} routes compiled", report.routes);
    for domain in router.domains() {
        println!("domain: {domain}");
    }

    if report.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
