//! Storage collaborator for comments.

use async_trait::async_trait;
use thiserror::Error;

use crate::comment::Comment;
use crate::context::RequestContext;

/// Failures a store may report. The domain service never passes these
/// through to the transport layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("comment {0} not found")]
    NotFound(String),

    #[error("request context cancelled")]
    Cancelled,

    #[error("storage failure: {0}")]
    Storage(String),
}

/// CRUD over comment records.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, ctx: &RequestContext, id: &str) -> Result<Comment, StoreError>;

    /// Persist a new comment, assigning its id.
    async fn create(&self, ctx: &RequestContext, comment: Comment) -> Result<Comment, StoreError>;

    /// Replace the mutable fields of an existing comment. The id is never changed.
    async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        comment: Comment,
    ) -> Result<Comment, StoreError>;

    async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), StoreError>;
}
