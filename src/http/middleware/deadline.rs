//! Per-request deadline.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::context::RequestContext;

/// Timeout applied to every request context, fixed when the chain is built.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    pub timeout: Duration,
}

/// Attach a [`RequestContext`] expiring `timeout` from now.
///
/// Never writes a response itself: downstream code decides what to do once
/// the context reports cancellation.
pub async fn attach_deadline(
    State(deadline): State<Deadline>,
    mut request: Request,
    next: Next,
) -> Response {
    request
        .extensions_mut()
        .insert(RequestContext::with_timeout(deadline.timeout));
    next.run(request).await
}
