//! Request logging.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::http::request::RequestIdExt;
use crate::observability::metrics;

/// Log method, path, status and wall-clock duration once the rest of the
/// chain has produced a response. The response is returned untouched.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request.request_id().to_owned();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Handled request"
    );
    metrics::record_request(method.as_str(), status, start);

    response
}
