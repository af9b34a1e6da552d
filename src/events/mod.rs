//! Local events: channel identities, forwarded payloads and the broadcast bus.
//!
//! This module groups the event **data model** and the **bus** the hosting
//! process listens on.
//!
//! ## Contents
//! - [`Channel`], [`ForwardedEvent`] the closed set of channels and their payloads
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//! - [`ChannelReceiver`] receiver narrowed to one channel
//!
//! ## Quick reference
//! - **Publishers**: `AuthBootstrap` (`sermas.ready`), `EventFanout` listeners (the rest).
//! - **Consumers**: host code via [`Bus::subscribe`] / [`Bus::subscribe_channel`], and the
//!   session's subscriber listener feeding [`SubscriberSet`](crate::SubscriberSet).

mod bus;
mod event;

pub use bus::{Bus, ChannelReceiver};
pub use event::{Channel, ForwardedEvent};
