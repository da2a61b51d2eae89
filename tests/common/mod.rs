//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use comment_service::comment::{Comment, CommentService, InMemoryStore, Store, StoreError};
use comment_service::config::ServiceConfig;
use comment_service::context::RequestContext;
use comment_service::lifecycle::{DrainOutcome, LifecycleState, Shutdown};
use comment_service::net::Listener;
use comment_service::HttpServer;
use jsonwebtoken::{EncodingKey, Header};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const SECRET: &str = "integration-secret";

/// An HS256 token with no claims, like the ones the service's clients mint.
pub fn mint_token(secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &serde_json::json!({}),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

pub fn bearer(secret: &str) -> String {
    format!("bearer {}", mint_token(secret))
}

/// A server running on an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub shutdown: Shutdown,
    pub lifecycle: watch::Receiver<LifecycleState>,
    pub handle: JoinHandle<DrainOutcome>,
}

impl TestServer {
    pub async fn spawn(store: Arc<dyn Store>) -> Self {
        Self::spawn_with(ServiceConfig::default(), store).await
    }

    pub async fn spawn_with(mut config: ServiceConfig, store: Arc<dyn Store>) -> Self {
        config.listener.bind_address = "127.0.0.1:0".into();
        config.auth.jwt_secret = SECRET.into();

        let listener = Listener::bind(&config.listener)
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = HttpServer::new(config, CommentService::new(store));
        let lifecycle = server.lifecycle();
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(server.run(listener, shutdown.signalled()));

        Self {
            base_url,
            shutdown,
            lifecycle,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Trigger shutdown and wait for the server to stop.
    pub async fn stop(self) -> DrainOutcome {
        self.shutdown.trigger();
        self.handle.await.expect("server task panicked")
    }
}

/// Wraps an [`InMemoryStore`] and counts every call that reaches it.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn get(&self, ctx: &RequestContext, id: &str) -> Result<Comment, StoreError> {
        self.hit();
        self.inner.get(ctx, id).await
    }

    async fn create(&self, ctx: &RequestContext, comment: Comment) -> Result<Comment, StoreError> {
        self.hit();
        self.inner.create(ctx, comment).await
    }

    async fn update(&self, ctx: &RequestContext, id: &str, comment: Comment) -> Result<Comment, StoreError> {
        self.hit();
        self.inner.update(ctx, id, comment).await
    }

    async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), StoreError> {
        self.hit();
        self.inner.delete(ctx, id).await
    }
}

/// A store whose reads take `delay`, ignoring the request deadline.
pub struct SlowStore {
    pub delay: Duration,
}

#[async_trait]
impl Store for SlowStore {
    async fn get(&self, _ctx: &RequestContext, id: &str) -> Result<Comment, StoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(Comment {
            id: id.to_string(),
            slug: "slow".into(),
            author: "sloth".into(),
            body: "eventually".into(),
        })
    }

    async fn create(&self, _: &RequestContext, _: Comment) -> Result<Comment, StoreError> {
        Err(StoreError::Storage("read only".into()))
    }

    async fn update(&self, _: &RequestContext, _: &str, _: Comment) -> Result<Comment, StoreError> {
        Err(StoreError::Storage("read only".into()))
    }

    async fn delete(&self, _: &RequestContext, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Storage("read only".into()))
    }
}

/// Wraps an [`InMemoryStore`], sleeping `delay` before every call so the
/// request deadline can pass before the store checks it.
pub struct LaggingStore {
    pub inner: InMemoryStore,
    pub delay: Duration,
}

#[async_trait]
impl Store for LaggingStore {
    async fn get(&self, ctx: &RequestContext, id: &str) -> Result<Comment, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(ctx, id).await
    }

    async fn create(&self, ctx: &RequestContext, comment: Comment) -> Result<Comment, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.create(ctx, comment).await
    }

    async fn update(&self, ctx: &RequestContext, id: &str, comment: Comment) -> Result<Comment, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.update(ctx, id, comment).await
    }

    async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(ctx, id).await
    }
}
