//! In-process store backed by a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::comment::store::{Store, StoreError};
use crate::comment::Comment;
use crate::context::RequestContext;

/// A [`Store`] that keeps comments in memory for the lifetime of the process.
///
/// Every operation checks the request context first and fails with
/// [`StoreError::Cancelled`] once its deadline has passed.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    comments: DashMap<String, Comment>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

fn ensure_live(ctx: &RequestContext) -> Result<(), StoreError> {
    if ctx.is_cancelled() {
        return Err(StoreError::Cancelled);
    }
    Ok(())
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get(&self, ctx: &RequestContext, id: &str) -> Result<Comment, StoreError> {
        ensure_live(ctx)?;
        self.comments
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, ctx: &RequestContext, comment: Comment) -> Result<Comment, StoreError> {
        ensure_live(ctx)?;
        let stored = Comment {
            id: Uuid::new_v4().to_string(),
            ..comment
        };
        self.comments.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        comment: Comment,
    ) -> Result<Comment, StoreError> {
        ensure_live(ctx)?;
        let mut entry = self
            .comments
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let existing = entry.value_mut();
        existing.slug = comment.slug;
        existing.author = comment.author;
        existing.body = comment.body;
        Ok(existing.clone())
    }

    async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), StoreError> {
        ensure_live(ctx)?;
        self.comments
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn draft(body: &str) -> Comment {
        Comment {
            id: String::new(),
            slug: "intro".into(),
            author: "elliot".into(),
            body: body.into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let store = InMemoryStore::new();
        let ctx = RequestContext::background();

        let a = store.create(&ctx, draft("one")).await.unwrap();
        let b = store.create(&ctx, draft("two")).await.unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&ctx, &a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn update_keeps_id() {
        let store = InMemoryStore::new();
        let ctx = RequestContext::background();
        let created = store.create(&ctx, draft("old")).await.unwrap();

        let mut change = draft("new");
        change.id = "someone-else".into();
        let updated = store.update(&ctx, &created.id, change).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.body, "new");
        assert!(store.get(&ctx, "someone-else").await.is_err());
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = InMemoryStore::new();
        let ctx = RequestContext::background();

        assert!(matches!(store.get(&ctx, "nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update(&ctx, "nope", draft("x")).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete(&ctx, "nope").await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = InMemoryStore::new();
        let ctx = RequestContext::background();
        let created = store.create(&ctx, draft("bye")).await.unwrap();

        store.delete(&ctx, &created.id).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_context_is_refused() {
        let store = InMemoryStore::new();
        let ctx = RequestContext::with_timeout(Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(20)).await;

        assert!(matches!(store.create(&ctx, draft("late")).await, Err(StoreError::Cancelled)));
        assert!(store.is_empty());
    }
}
