//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Start (http/server.rs):
//!     Bind listener → spawn accept loop → Listening → park on signal
//!
//! Shutdown (shutdown.rs):
//!     Signal received → ShuttingDown → stop accepting
//!     → drain connections (bounded) → abort stragglers → Stopped
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Bind errors surface synchronously; later failures are logged
//! - Shutdown has a grace period: forced close after the deadline
//! - The accept loop is a supervised task joined by its owner

pub mod shutdown;
pub mod signals;
pub mod state;

pub use shutdown::{drain, DrainOutcome, Shutdown};
pub use state::{Lifecycle, LifecycleState};
