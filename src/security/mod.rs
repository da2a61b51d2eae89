//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Write request (POST/PUT/DELETE):
//!     → auth.rs (bearer token extraction, JWT signature check)
//!     → Pass to handler, or 401 with empty body
//! ```
//!
//! # Design Decisions
//! - Fail closed: any malformed or unverifiable credential is a 401
//! - Guards are plain predicates, independent of the handlers they protect
//! - No claims are forwarded to handlers

pub mod auth;

pub use auth::{extract_bearer, guarded, AuthError, Guard, JwtGuard};
