//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging handlers onto the local bus.
//! Each subscriber is driven by a dedicated worker loop fed by a bounded queue
//! owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching); they do **not** block the bus
//!   nor other subscribers.
//! - [`Subscribe::accepts`] narrows the channels a subscriber is fed; filtered
//!   events never enter its queue.
//! - If a queue overflows, events for that subscriber are **dropped** (warn).

use async_trait::async_trait;

use crate::events::{Channel, ForwardedEvent};

/// Contract for local event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single forwarded event.
    async fn on_event(&self, event: &ForwardedEvent);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether this subscriber wants events of `channel`. Defaults to every channel.
    fn accepts(&self, channel: Channel) -> bool {
        let _ = channel;
        true
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
