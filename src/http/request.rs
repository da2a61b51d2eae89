//! Request-side plumbing.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Echo the request ID back on the response
//! - Hand the per-request [`RequestContext`] to handlers
//!
//! # Design Decisions
//! - Request ID added as early as possible for log correlation
//! - Handlers without the deadline middleware still get a (background) context

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderName, HeaderValue, Request},
};
use std::convert::Infallible;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId as TowerRequestId, SetRequestIdLayer,
};

use crate::context::RequestContext;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that stamps `x-request-id` on requests missing one.
pub fn set_request_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies `x-request-id` from the request onto the response.
pub fn propagate_request_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Read the request ID, or `"unknown"`.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.extensions()
            .get::<TowerRequestId>()
            .map(TowerRequestId::header_value)
            .or_else(|| self.headers().get(X_REQUEST_ID))
            .and_then(|v: &HeaderValue| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .copied()
            .unwrap_or_default())
    }
}
