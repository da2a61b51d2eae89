//! Comment service library.

pub mod api;
pub mod comment;
pub mod config;
pub mod context;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;

pub use comment::{Comment, CommentService, InMemoryStore, Store};
pub use config::schema::ServiceConfig;
pub use context::RequestContext;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
