//! Server lifecycle state machine.
//!
//! ```text
//! Initialized → Listening → ShuttingDown → Stopped
//! ```
//!
//! Transitions only move forward and never skip `ShuttingDown` once the
//! server has been `Listening`.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Initialized,
    Listening,
    ShuttingDown,
    Stopped,
}

impl LifecycleState {
    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Initialized, Listening)
                | (Initialized, Stopped)
                | (Listening, ShuttingDown)
                | (ShuttingDown, Stopped)
        )
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleState::Initialized => "initialized",
            LifecycleState::Listening => "listening",
            LifecycleState::ShuttingDown => "shutting-down",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Owner side of the lifecycle state. Observers get a [`watch::Receiver`].
#[derive(Debug)]
pub struct Lifecycle {
    tx: watch::Sender<LifecycleState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Initialized);
        Self { tx }
    }

    pub fn current(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Move to `next`. Illegal transitions are ignored and reported as `false`.
    pub fn transition(&self, next: LifecycleState) -> bool {
        let mut moved = false;
        self.tx.send_if_modified(|state| {
            if state.can_transition_to(next) {
                tracing::debug!(from = %state, to = %next, "Lifecycle transition");
                *state = next;
                moved = true;
            }
            moved
        });
        if !moved {
            tracing::warn!(from = %self.current(), to = %next, "Ignoring illegal lifecycle transition");
        }
        moved
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    #[test]
    fn forward_path() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.current(), Initialized);
        assert!(lifecycle.transition(Listening));
        assert!(lifecycle.transition(ShuttingDown));
        assert!(lifecycle.transition(Stopped));
        assert_eq!(lifecycle.current(), Stopped);
    }

    #[test]
    fn cannot_skip_shutting_down() {
        let lifecycle = Lifecycle::new();
        lifecycle.transition(Listening);
        assert!(!lifecycle.transition(Stopped));
        assert_eq!(lifecycle.current(), Listening);
    }

    #[test]
    fn never_moves_backwards() {
        assert!(!ShuttingDown.can_transition_to(Listening));
        assert!(!Stopped.can_transition_to(Initialized));
        assert!(!Listening.can_transition_to(Listening));
    }

    #[tokio::test]
    async fn observers_see_transitions() {
        let lifecycle = Lifecycle::new();
        let mut rx = lifecycle.subscribe();

        lifecycle.transition(Listening);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Listening);
    }
}
