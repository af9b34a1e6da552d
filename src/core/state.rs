//! # Connection state.
//!
//! [`ConnectionState`] only moves forward:
//! ```text
//! Uninitialized ──► Bootstrapping ──► Ready
//!                        ▲    │
//!                        └────┘  failed attempt (no transition)
//! ```
//! There is no failed terminal state: a failed attempt leaves the state at
//! `Bootstrapping` until a later attempt succeeds.
//!
//! [`StateCell`] is written by the bootstrap only and published through a
//! `tokio::sync::watch` channel so readers take non-blocking snapshots or await
//! a transition.

use tokio::sync::watch;

/// Lifecycle of the platform connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Session built, bootstrap not started.
    Uninitialized,
    /// Acquiring credentials (possibly retrying).
    Bootstrapping,
    /// Credentials acquired, readiness emitted.
    Ready,
}

impl ConnectionState {
    fn rank(self) -> u8 {
        match self {
            ConnectionState::Uninitialized => 0,
            ConnectionState::Bootstrapping => 1,
            ConnectionState::Ready => 2,
        }
    }

    pub fn is_ready(self) -> bool {
        self == ConnectionState::Ready
    }
}

/// Forward-only holder of the [`ConnectionState`].
#[derive(Debug)]
pub(crate) struct StateCell {
    tx: watch::Sender<ConnectionState>,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(ConnectionState::Uninitialized);
        Self { tx }
    }

    /// Moves to `next` if it lies strictly ahead of the current state.
    ///
    /// Returns `true` when the transition happened.
    pub(crate) fn advance(&self, next: ConnectionState) -> bool {
        self.tx.send_if_modified(|cur| {
            if next.rank() > cur.rank() {
                *cur = next;
                true
            } else {
                false
            }
        })
    }

    pub(crate) fn snapshot(&self) -> ConnectionState {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_move_forward() {
        let cell = StateCell::new();
        assert_eq!(cell.snapshot(), ConnectionState::Uninitialized);

        assert!(cell.advance(ConnectionState::Bootstrapping));
        assert!(!cell.advance(ConnectionState::Bootstrapping));
        assert!(!cell.advance(ConnectionState::Uninitialized));

        assert!(cell.advance(ConnectionState::Ready));
        assert!(!cell.advance(ConnectionState::Ready));
        assert!(!cell.advance(ConnectionState::Bootstrapping));
        assert_eq!(cell.snapshot(), ConnectionState::Ready);
    }

    #[test]
    fn ready_may_be_reached_directly() {
        let cell = StateCell::new();
        assert!(cell.advance(ConnectionState::Ready));
        assert!(cell.snapshot().is_ready());
    }

    #[tokio::test]
    async fn watchers_observe_transitions() {
        let cell = StateCell::new();
        let mut rx = cell.subscribe();
        cell.advance(ConnectionState::Bootstrapping);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ConnectionState::Bootstrapping);
    }
}
