//! Comment service.
//!
//! CRUD over a single comment resource, with JWT-guarded writes and a
//! bounded graceful shutdown.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ net::Listener ──▶ http::server (hyper conn, graceful watch)
//!                                      │
//!                                      ▼
//!              http::middleware: request id → JSON → logger → deadline
//!                                      │
//!                                      ▼
//!              api router ──(writes)──▶ security::auth guard
//!                                      │
//!                                      ▼
//!              api handlers ──▶ comment::CommentService ──▶ Store
//!
//!   lifecycle: Initialized → Listening → ShuttingDown → Stopped
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use comment_service::config::resolve_config;
use comment_service::observability::{logging, metrics};
use comment_service::{CommentService, HttpServer, InMemoryStore};

#[derive(Parser)]
#[command(name = "comment-service")]
#[command(about = "Comment CRUD service with JWT-guarded writes", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "COMMENT_SERVICE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("comment-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        shutdown_grace_secs = config.timeouts.shutdown_grace_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Arc::new(InMemoryStore::new());
    let comments = CommentService::new(store);

    HttpServer::new(config, comments).start().await?;

    tracing::info!("Shut down gracefully");
    Ok(())
}
