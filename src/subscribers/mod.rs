//! # Local subscribers for forwarded events.
//!
//! Besides raw bus receivers, hosts can hand [`Subscribe`] implementations to the
//! [`SessionBuilder`](crate::SessionBuilder). Each one gets its own bounded queue
//! and worker, so a slow or panicking subscriber never stalls the bus or its peers.
//!
//! ## Architecture
//! ```text
//! Bus ──► session subscriber listener ──► SubscriberSet::emit(&ForwardedEvent)
//!                                              │
//!                                    ┌─────────┼──────────┐
//!                                    ▼         ▼          ▼
//!                                LogWriter   Custom     ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use sermas_link::{Channel, ForwardedEvent, Subscribe};
//! use async_trait::async_trait;
//!
//! struct ToolAudit;
//!
//! #[async_trait]
//! impl Subscribe for ToolAudit {
//!     async fn on_event(&self, event: &ForwardedEvent) {
//!         if let ForwardedEvent::Tool(tool) = event {
//!             let _ = &tool.name; // write audit record...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "tool-audit" }
//!     fn accepts(&self, channel: Channel) -> bool { channel == Channel::Tool }
//! }
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
