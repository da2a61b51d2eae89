//! HTTP routes for the comment resource.
//!
//! ```text
//! GET    /hello                  open
//! POST   /api/v1/comment         bearer
//! GET    /api/v1/comment/{id}    open
//! PUT    /api/v1/comment/{id}    bearer
//! DELETE /api/v1/comment/{id}    bearer
//! ```

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::comment::CommentService;
use crate::security::{guarded, Guard};
use self::handlers::*;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub comments: CommentService,
}

/// Build the route table. `guard` protects every write route.
pub fn setup_router<G: Guard>(state: AppState, guard: Arc<G>) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route(
            "/api/v1/comment",
            guarded(post(post_comment), guard.clone()),
        )
        .route(
            "/api/v1/comment/{id}",
            get(get_comment).merge(guarded(
                put(update_comment).delete(delete_comment),
                guard.clone(),
            )),
        )
        .route(
            "/api/v1/comment/",
            get(missing_id).merge(guarded(put(missing_id).merge(delete(missing_id)), guard)),
        )
        .with_state(state)
}
