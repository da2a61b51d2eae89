//! Middleware chain applied to every request before route dispatch.
//!
//! # Order (outermost first)
//! ```text
//! request id → JSON content type → logger → deadline → body limit → router
//! ```
//!
//! Order is fixed when [`apply`] builds the stack. The content type is
//! written on the way out, so it replaces whatever the handler set.

pub mod deadline;
pub mod logging;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer};

use crate::config::ServiceConfig;
use crate::http::request::{propagate_request_id, set_request_id};

pub use deadline::{attach_deadline, Deadline};
pub use logging::log_requests;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Marks every response as JSON, whatever the handler set.
pub fn json_content_type() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
}

/// Wrap `router` in the full middleware chain.
pub fn apply<S>(router: Router<S>, config: &ServiceConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let deadline = Deadline {
        timeout: config.timeouts.request(),
    };

    router.layer(
        ServiceBuilder::new()
            .layer(set_request_id())
            .layer(propagate_request_id())
            .layer(json_content_type())
            .layer(middleware::from_fn(log_requests))
            .layer(middleware::from_fn_with_state(deadline, attach_deadline))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size)),
    )
}
