//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Build the Axum router with the middleware chain
//! - Bind the listener (errors surface to the caller)
//! - Run the accept loop as a supervised background task
//! - Park on the shutdown signal, then drain within the grace period
//! - Forcibly close connections still open when the grace period ends

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::{conn::auto, graceful::GracefulShutdown},
    service::TowerToHyperService,
};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinSet;

use crate::api::{self, AppState};
use crate::comment::CommentService;
use crate::config::ServiceConfig;
use crate::http::middleware;
use crate::lifecycle::{drain, signals, DrainOutcome, Lifecycle, LifecycleState, Shutdown};
use crate::net::{ConnectionTracker, Listener, ListenerError};
use crate::security::{Guard, JwtGuard};

/// Back-off after a failed accept so a persistent error doesn't spin.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// HTTP server for the comment service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    lifecycle: Lifecycle,
}

impl HttpServer {
    /// Create a server whose write routes require a JWT signed with
    /// `config.auth.jwt_secret`.
    pub fn new(config: ServiceConfig, comments: CommentService) -> Self {
        let guard = Arc::new(JwtGuard::new(config.auth.jwt_secret.as_bytes()));
        Self::with_guard(config, comments, guard)
    }

    /// Create a server with a custom guard on the write routes.
    pub fn with_guard<G: Guard>(config: ServiceConfig, comments: CommentService, guard: Arc<G>) -> Self {
        let router = Self::build_router(&config, AppState { comments }, guard);
        Self {
            router,
            config,
            lifecycle: Lifecycle::new(),
        }
    }

    fn build_router<G: Guard>(config: &ServiceConfig, state: AppState, guard: Arc<G>) -> Router {
        middleware::apply(api::setup_router(state, guard), config)
    }

    /// The fully layered router, e.g. for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Observe lifecycle transitions.
    pub fn lifecycle(&self) -> watch::Receiver<LifecycleState> {
        self.lifecycle.subscribe()
    }

    /// Bind the configured address and serve until SIGINT/SIGTERM.
    ///
    /// Only bind failures are returned; everything after that is logged.
    pub async fn start(self) -> Result<(), ServerError> {
        let listener = match Listener::bind(&self.config.listener).await {
            Ok(listener) => listener,
            Err(e) => {
                self.lifecycle.transition(LifecycleState::Stopped);
                return Err(e.into());
            }
        };

        self.run(listener, signals::interrupt()).await;
        Ok(())
    }

    /// Serve on an already bound listener until `signal` resolves, then shut
    /// down within `timeouts.shutdown_grace_secs`.
    pub async fn run<F>(self, listener: Listener, signal: F) -> DrainOutcome
    where
        F: Future<Output = ()> + Send,
    {
        let grace = self.config.timeouts.shutdown_grace();
        match listener.local_addr() {
            Ok(addr) => tracing::info!(address = %addr, "HTTP server starting"),
            Err(e) => tracing::warn!(error = %e, "HTTP server starting on unknown address"),
        }

        let shutdown = Shutdown::new();
        let mut accept_task = tokio::spawn(accept_loop(
            listener,
            self.router,
            shutdown.subscribe(),
            grace,
        ));
        self.lifecycle.transition(LifecycleState::Listening);

        let exited_early = tokio::select! {
            _ = signal => None,
            joined = &mut accept_task => Some(joined),
        };

        self.lifecycle.transition(LifecycleState::ShuttingDown);
        let joined = match exited_early {
            Some(joined) => {
                tracing::error!("Accept loop exited before shutdown was requested");
                joined
            }
            None => {
                tracing::info!(grace_secs = grace.as_secs(), "Shutdown requested, draining connections");
                shutdown.trigger();
                accept_task.await
            }
        };

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Accept loop task failed");
                DrainOutcome::Abandoned
            }
        };
        match outcome {
            DrainOutcome::Drained => tracing::info!("All connections drained"),
            DrainOutcome::Forced { aborted } => tracing::warn!(
                aborted,
                "Grace period elapsed, remaining connections closed"
            ),
            DrainOutcome::Abandoned => {}
        }

        self.lifecycle.transition(LifecycleState::Stopped);
        tracing::info!("HTTP server stopped");
        outcome
    }
}

/// Accept connections until told to stop, then drain them.
async fn accept_loop(
    listener: Listener,
    router: Router,
    mut shutdown: broadcast::Receiver<()>,
    grace: Duration,
) -> DrainOutcome {
    let builder = auto::Builder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();
    let tracker = ConnectionTracker::new();
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer_addr, permit) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        continue;
                    }
                };

                let guard = tracker.track();
                let service = TowerToHyperService::new(router.clone());
                let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
                let conn = graceful.watch(conn.into_owned());

                connections.spawn(async move {
                    let _permit = permit;
                    if let Err(e) = conn.await {
                        tracing::debug!(
                            connection_id = %guard.id(),
                            peer_addr = %peer_addr,
                            error = %e,
                            "Connection ended with error"
                        );
                    }
                    drop(guard);
                });
            }
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = shutdown.recv() => break,
        }
    }

    drop(listener);
    tracing::info!(
        active_connections = tracker.active_count(),
        "Stopped accepting connections"
    );
    drain(graceful, &mut connections, grace).await
}
