//! Bearer token gate for write routes.
//!
//! A [`Guard`] is a predicate over the incoming request. [`guarded`] puts one
//! in front of a method router; rejected requests get a bare 401 and never
//! reach the handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

/// Decides whether a request may proceed.
pub trait Guard: Send + Sync + 'static {
    fn check(&self, request: &Request) -> Result<(), AuthError>;
}

/// Accepts requests carrying `Authorization: bearer <jwt>` where the JWT is
/// HMAC-signed with the configured secret.
///
/// No claims are required. `exp` and `nbf` are honoured when present.
pub struct JwtGuard {
    key: DecodingKey,
    validation: Validation,
}

impl JwtGuard {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.validate_nbf = true;

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    fn verify(&self, token: &str) -> Result<(), AuthError> {
        jsonwebtoken::decode::<serde_json::Value>(token, &self.key, &self.validation)
            .map(|_| ())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl Guard for JwtGuard {
    fn check(&self, request: &Request) -> Result<(), AuthError> {
        let token = extract_bearer(request.headers())?;
        self.verify(token)
    }
}

impl std::fmt::Debug for JwtGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtGuard")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

/// Pull the token out of `Authorization: bearer <token>`.
///
/// The header must split on a single space into exactly a scheme and a
/// non-empty token. The scheme is matched case-insensitively. A header
/// without a scheme is treated like a missing one.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(AuthError::MalformedHeader),
    }
}

async fn enforce<G: Guard>(State(guard): State<Arc<G>>, request: Request, next: Next) -> Response {
    match guard.check(&request) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = %e,
                "Request rejected by auth gate"
            );
            e.into_response()
        }
    }
}

/// Wrap every handler of `routes` with `guard`.
pub fn guarded<S, G>(routes: MethodRouter<S>, guard: Arc<G>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
    G: Guard,
{
    routes.route_layer(middleware::from_fn_with_state(guard, enforce::<G>))
}
