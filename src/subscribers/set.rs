//! # Non-blocking fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`], which distributes events to subscribers without
//! blocking the publisher.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► accepts? ──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │                  (bounded)         └─────► panic → logged, worker continues
//!     ├──► accepts? ──► [queue 2] ──► worker 2 ──► subscriber2.on_event()
//!     └──► accepts? ──► [queue N] ──► worker N ──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**: each subscriber sees its events in bus order
//! - **No cross-subscriber ordering**
//! - **Overflow**: event dropped for that subscriber only (warn)
//! - **Isolation**: a panicking subscriber is logged and keeps receiving events

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{error, warn};

use crate::events::ForwardedEvent;
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    sub: Arc<dyn Subscribe>,
    sender: mpsc::Sender<Arc<ForwardedEvent>>,
}

/// Fan-out coordinator for multiple subscribers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Must be called from within a tokio runtime. Minimum queue capacity is 1.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let (tx, mut rx) = mpsc::channel::<Arc<ForwardedEvent>>(sub.queue_capacity().max(1));
            let s = Arc::clone(&sub);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = s.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await
                    {
                        let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                            (*msg).to_string()
                        } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                            msg.clone()
                        } else {
                            "unknown panic".to_string()
                        };
                        error!(subscriber = s.name(), info = %info, "subscriber panicked");
                    }
                }
            });
            channels.push(SubscriberChannel { sub, sender: tx });
            workers.push(handle);
        }
        Self { channels, workers }
    }

    /// Fan-out one event to every subscriber accepting its channel (non-blocking).
    pub fn emit(&self, event: &ForwardedEvent) {
        let channel = event.channel();
        let ev = Arc::new(event.clone());

        for ch in self.channels.iter().filter(|ch| ch.sub.accepts(channel)) {
            match ch.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = ch.sub.name(), %channel, "subscriber dropped event: queue full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(subscriber = ch.sub.name(), %channel, "subscriber dropped event: worker closed");
                }
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    ///
    /// Events already queued are still delivered.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}
