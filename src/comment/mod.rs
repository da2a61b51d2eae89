//! Comment domain.
//!
//! [`CommentService`] sits between the transport layer and a [`Store`]. It
//! forwards every call and collapses storage failures into the fixed
//! [`CommentError`] kinds, logging the original cause.

pub mod memory;
pub mod store;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::RequestContext;

pub use memory::InMemoryStore;
pub use store::{Store, StoreError};

/// A comment record.
///
/// Serialized with the service's wire keys (`ID`, `Slug`, `Body`, `Author`);
/// lowercase keys are accepted when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Comment {
    #[serde(rename = "ID", alias = "id", alias = "Id")]
    pub id: String,
    #[serde(alias = "slug")]
    pub slug: String,
    #[serde(alias = "body")]
    pub body: String,
    #[serde(alias = "author")]
    pub author: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommentError {
    #[error("failed to fetch comment by id")]
    Fetching,
    #[error("failed to create comment")]
    Creating,
    #[error("failed to update comment")]
    Updating,
    #[error("failed to delete comment")]
    Deleting,
}

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn Store>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_comment(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Comment, CommentError> {
        tracing::debug!(comment_id = %id, "Retrieving comment");
        self.store.get(ctx, id).await.map_err(|e| {
            tracing::warn!(comment_id = %id, error = %e, "Store get failed");
            CommentError::Fetching
        })
    }

    pub async fn post_comment(
        &self,
        ctx: &RequestContext,
        comment: Comment,
    ) -> Result<Comment, CommentError> {
        tracing::debug!(slug = %comment.slug, "Posting comment");
        self.store.create(ctx, comment).await.map_err(|e| {
            tracing::warn!(error = %e, "Store create failed");
            CommentError::Creating
        })
    }

    pub async fn update_comment(
        &self,
        ctx: &RequestContext,
        id: &str,
        comment: Comment,
    ) -> Result<Comment, CommentError> {
        tracing::debug!(comment_id = %id, "Updating comment");
        self.store.update(ctx, id, comment).await.map_err(|e| {
            tracing::warn!(comment_id = %id, error = %e, "Store update failed");
            CommentError::Updating
        })
    }

    pub async fn delete_comment(&self, ctx: &RequestContext, id: &str) -> Result<(), CommentError> {
        tracing::debug!(comment_id = %id, "Deleting comment");
        self.store.delete(ctx, id).await.map_err(|e| {
            tracing::warn!(comment_id = %id, error = %e, "Store delete failed");
            CommentError::Deleting
        })
    }
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService").finish_non_exhaustive()
    }
}
