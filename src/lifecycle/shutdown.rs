//! Shutdown coordination.
//!
//! [`Shutdown`] fans a single stop signal out to every long-running task.
//! [`drain`] performs the bounded connection drain once the accept loop has
//! stopped.

use std::future::Future;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::sync::broadcast;
use tokio::task::JoinSet;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// A future resolving on [`Shutdown::trigger`], or when every coordinator
    /// handle has been dropped. Subscribes immediately, not on first poll.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening for the signal.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// How connection draining ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every connection finished within the grace period.
    Drained,
    /// The grace period elapsed; `aborted` connections were cut off.
    Forced { aborted: usize },
    /// The accept loop died before it could drain; connection state unknown.
    Abandoned,
}

/// Ask every watched connection to finish its in-flight request and close,
/// waiting at most `grace`. Connection tasks still running afterwards are
/// aborted.
pub async fn drain(
    graceful: GracefulShutdown,
    connections: &mut JoinSet<()>,
    grace: Duration,
) -> DrainOutcome {
    let drained = async {
        graceful.shutdown().await;
        while connections.join_next().await.is_some() {}
    };
    let result = tokio::time::timeout(grace, drained).await;

    match result {
        Ok(()) => DrainOutcome::Drained,
        Err(_) => {
            let aborted = connections.len();
            connections.shutdown().await;
            DrainOutcome::Forced { aborted }
        }
    }
}
