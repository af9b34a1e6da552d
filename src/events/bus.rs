//! # Local event bus.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] carrying
//! [`ForwardedEvent`]s from the bootstrap and the fan-out listeners to every
//! local listener.
//!
//! ## Architecture
//! ```text
//! Publishers:                         Listeners (many):
//!   AuthBootstrap ──┐                   ┌──► Bus::subscribe()            (all channels)
//!   EventFanout   ──┼──► Bus ──────────┼──► Bus::subscribe_channel(ch)  (one channel)
//!                   │  (broadcast)      └──► session subscriber listener ──► SubscriberSet
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never waits on listeners.
//! - **At-most-once**: each listener sees an occurrence once or, if it lagged, not at all.
//! - **No replay**: a listener only gets events sent after it subscribed.
//! - **Per-channel order**: events of one channel arrive in publish order.

use tokio::sync::broadcast::{self, error::RecvError};

use super::event::{Channel, ForwardedEvent};

/// Broadcast channel for forwarded events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<ForwardedEvent>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// ### Notes
    /// - Capacity is **shared** across all receivers (not per-listener).
    /// - The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<ForwardedEvent>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active listeners.
    ///
    /// If there are no listeners the event is dropped.
    pub fn publish(&self, ev: ForwardedEvent) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver observing every channel.
    pub fn subscribe(&self) -> broadcast::Receiver<ForwardedEvent> {
        self.tx.subscribe()
    }

    /// Creates a receiver observing a single channel.
    pub fn subscribe_channel(&self, channel: Channel) -> ChannelReceiver {
        ChannelReceiver {
            channel,
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live receivers.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Receiver yielding only the events of one [`Channel`].
#[derive(Debug)]
pub struct ChannelReceiver {
    channel: Channel,
    rx: broadcast::Receiver<ForwardedEvent>,
}

impl ChannelReceiver {
    /// The channel this receiver is bound to.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Waits for the next event on the bound channel.
    ///
    /// Events of other channels are skipped. `RecvError::Lagged` is returned as-is
    /// so the caller can tell how many occurrences (of any channel) were missed.
    pub async fn recv(&mut self) -> Result<ForwardedEvent, RecvError> {
        loop {
            let ev = self.rx.recv().await?;
            if ev.channel() == self.channel {
                return Ok(ev);
            }
        }
    }
}
