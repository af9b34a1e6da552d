//! # SubscriptionRegistry: remote listener registration and teardown.
//!
//! Registers the fixed set of remote streams once the connection is ready and
//! owns the teardown capabilities of the registrations that succeeded.
//!
//! ## Architecture
//! ```text
//! register_all()
//!   ├─► on_session_changed(fanout.session())      ─┐
//!   ├─► on_tool_triggered(fanout.tool())           │  issued together,
//!   ├─► on_interaction(fanout.ui_interaction())    ├─ polled as a FuturesUnordered
//!   ├─► on_agent_changed(fanout.agent_changed())   │
//!   └─► on_user_login(log only)                   ─┘
//!                │
//!                ▼  (as each one settles)
//!   Ok(teardown) ──► active.insert(Subscription)  (kept in declaration order)
//!   Err(e)       ──► log error, stream stays unsubscribed
//! ```
//!
//! ## Rules
//! - One failing or stalled registration never blocks, cancels or undoes the others
//! - A teardown is held as soon as its own registration succeeds
//! - Failed registrations are **not** retried
//! - Dropping `register_all` mid-way keeps every teardown acquired so far
//! - The active list is ordered by [`RemoteStream::ALL`], whatever the completion order

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::{debug, error, info, warn};

use crate::core::fanout::EventFanout;
use crate::error::PlatformError;
use crate::events::{Bus, Channel};
use crate::platform::dto::UserLoginEvent;
use crate::platform::{Listener, PlatformRef, Teardown};

/// Remote event streams registered after bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteStream {
    SessionChanged,
    ToolTriggered,
    Interaction,
    AgentChanged,
    UserLogin,
}

impl RemoteStream {
    /// Every stream, in registration order.
    pub const ALL: [RemoteStream; 5] = [
        RemoteStream::SessionChanged,
        RemoteStream::ToolTriggered,
        RemoteStream::Interaction,
        RemoteStream::AgentChanged,
        RemoteStream::UserLogin,
    ];

    /// Local channel the stream is forwarded to; `None` for log-only streams.
    pub const fn forwards_to(&self) -> Option<Channel> {
        match self {
            RemoteStream::SessionChanged => Some(Channel::Session),
            RemoteStream::ToolTriggered => Some(Channel::Tool),
            RemoteStream::Interaction => Some(Channel::UiInteraction),
            RemoteStream::AgentChanged => Some(Channel::AgentChanged),
            RemoteStream::UserLogin => None,
        }
    }

    /// Position in [`RemoteStream::ALL`].
    const fn rank(self) -> usize {
        self as usize
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            RemoteStream::SessionChanged => "session_changed",
            RemoteStream::ToolTriggered => "tool_triggered",
            RemoteStream::Interaction => "interaction",
            RemoteStream::AgentChanged => "agent_changed",
            RemoteStream::UserLogin => "user_login",
        }
    }
}

impl fmt::Display for RemoteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful registration and the capability to undo it.
#[derive(Debug)]
struct Subscription {
    stream: RemoteStream,
    teardown: Teardown,
}

/// Registry of remote listener registrations.
pub struct SubscriptionRegistry {
    platform: PlatformRef,
    fanout: EventFanout,
    active: Mutex<Vec<Subscription>>,
    started: AtomicBool,
}

impl SubscriptionRegistry {
    /// Creates a registry forwarding onto `bus`.
    pub fn new(platform: PlatformRef, bus: Bus) -> Self {
        Self {
            platform,
            fanout: EventFanout::new(bus),
            active: Mutex::new(Vec::new()),
            started: AtomicBool::new(false),
        }
    }

    /// Registers every [`RemoteStream`] concurrently and keeps the successes.
    ///
    /// Returns the number of active subscriptions once all five attempts settled.
    /// Only the first call registers; later calls log a warning and return the
    /// current count. Cancel-safe: dropping the future keeps what was acquired.
    pub async fn register_all(&self) -> usize {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("remote listeners already registered");
            return self.held().len();
        }

        let mut pending: FuturesUnordered<_> = RemoteStream::ALL
            .into_iter()
            .map(|stream| async move { (stream, self.register(stream).await) })
            .collect();

        while let Some((stream, outcome)) = pending.next().await {
            match outcome {
                Ok(teardown) => {
                    debug!(%stream, "remote listener registered");
                    self.hold(Subscription { stream, teardown });
                }
                Err(e) => {
                    error!(%stream, error = %e, label = e.as_label(), "failed to register remote listener");
                }
            }
        }

        let active = self.held().len();
        info!(active, total = RemoteStream::ALL.len(), "remote listeners registered");
        active
    }

    fn held(&self) -> MutexGuard<'_, Vec<Subscription>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hold(&self, sub: Subscription) {
        let mut held = self.held();
        let at = held.partition_point(|h| h.stream.rank() < sub.stream.rank());
        held.insert(at, sub);
    }

    async fn register(&self, stream: RemoteStream) -> Result<Teardown, PlatformError> {
        match stream {
            RemoteStream::SessionChanged => {
                self.platform.on_session_changed(self.fanout.session()).await
            }
            RemoteStream::ToolTriggered => self.platform.on_tool_triggered(self.fanout.tool()).await,
            RemoteStream::Interaction => {
                self.platform
                    .on_interaction(self.fanout.ui_interaction())
                    .await
            }
            RemoteStream::AgentChanged => {
                self.platform
                    .on_agent_changed(self.fanout.agent_changed())
                    .await
            }
            RemoteStream::UserLogin => self.platform.on_user_login(login_notice()).await,
        }
    }

    /// Streams currently subscribed, in registration order.
    pub async fn active_streams(&self) -> Vec<RemoteStream> {
        self.held().iter().map(|s| s.stream).collect()
    }

    /// Releases every held teardown, in registration order, and empties the list.
    ///
    /// Returns how many listeners were detached.
    pub async fn release_all(&self) -> usize {
        let released: Vec<Subscription> = self.held().drain(..).collect();
        let n = released.len();
        for sub in released {
            debug!(stream = %sub.stream, "releasing remote listener");
            sub.teardown.release();
        }
        n
    }
}

/// User logins are reported in the log only.
fn login_notice() -> Listener<UserLoginEvent> {
    std::sync::Arc::new(|ev: UserLoginEvent| {
        info!(user_id = %ev.user_id, client_id = ?ev.client_id, "user logged in");
    })
}
