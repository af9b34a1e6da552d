//! # LogWriter: forwarded-event logger
//!
//! A minimal subscriber that reports every forwarded event through `tracing`
//! at debug level. Attach it with
//! [`SessionBuilder::with_subscribers`](crate::SessionBuilder::with_subscribers).
//!
//! ## Example output
//! ```text
//! DEBUG sermas_link::subscribers::log: [ready]
//! DEBUG sermas_link::subscribers::log: [session] operation="updated" session_id="s1"
//! DEBUG sermas_link::subscribers::log: [tool] app_id="a1" name="open-door"
//! ```

use async_trait::async_trait;
use tracing::debug;

use crate::events::ForwardedEvent;
use crate::subscribers::Subscribe;

/// Event logging subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &ForwardedEvent) {
        match e {
            ForwardedEvent::Ready => debug!("[ready]"),
            ForwardedEvent::Session(ev) => debug!(
                operation = %ev.operation,
                session_id = %ev.record.session_id,
                "[session]"
            ),
            ForwardedEvent::Tool(ev) => debug!(app_id = %ev.app_id, name = %ev.name, "[tool]"),
            ForwardedEvent::UiInteraction(ev) => debug!(
                app_id = %ev.app_id,
                session_id = ?ev.session_id,
                "[ui.interaction]"
            ),
            ForwardedEvent::AgentChanged(ev) => debug!(operation = %ev.operation, "[agent.changed]"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
