//! Per-request execution context.
//!
//! Carries the advisory deadline installed by the timeout middleware down
//! through handlers, the domain service and the store. Nothing here preempts
//! work; callers check [`RequestContext::is_cancelled`] or race
//! [`RequestContext::cancelled`] themselves.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that never expires.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now. A timeout too large to
    /// represent as an instant yields a context without a deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }

    /// Resolves once the deadline passes. Pends forever without one.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_never_cancels() {
        let ctx = RequestContext::background();
        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.remaining(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_expires() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(15));
        assert!(!ctx.is_cancelled());

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(ctx.remaining(), Some(Duration::from_secs(5)));
        assert!(!ctx.is_cancelled());

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn unrepresentable_timeout_means_no_deadline() {
        let ctx = RequestContext::with_timeout(Duration::MAX);
        assert_eq!(ctx.deadline(), None);
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_resolves_at_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(250));
        let start = Instant::now();
        ctx.cancelled().await;
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert!(ctx.is_cancelled());
    }
}
