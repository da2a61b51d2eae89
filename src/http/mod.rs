//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper connection, graceful shutdown)
//!     → middleware/ (request id, JSON content type, logger, deadline)
//!     → request.rs (request id, RequestContext extraction)
//!     → api (routes, auth gate, handlers)
//!     → response.rs (status mapping, JSON bodies)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{ApiError, Message};
pub use server::{HttpServer, ServerError};
