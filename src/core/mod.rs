//! Session core: lifecycle and wiring.
//!
//! The public API from this module is [`Session`] (with its [`SessionBuilder`])
//! plus the components it wires, usable on their own.
//!
//! Internal modules:
//! - [`state`]: forward-only connection state;
//! - [`bootstrap`]: credential acquisition with fixed-interval retry;
//! - [`registry`]: remote listener registration and teardown;
//! - [`fanout`]: remote listeners republishing onto the local bus;
//! - [`cache`]: lazily fetched app descriptor;
//! - [`proxy`]: pass-through platform calls absorbing failures;
//! - [`session`]: wiring, start and graceful shutdown.

mod bootstrap;
mod builder;
mod cache;
mod fanout;
mod proxy;
mod registry;
mod session;
mod state;

pub use builder::SessionBuilder;
pub use cache::AppDescriptorCache;
pub use fanout::EventFanout;
pub use registry::{RemoteStream, SubscriptionRegistry};
pub use session::Session;
pub use state::ConnectionState;
