//! # EventFanout: remote listeners republishing onto the local bus.
//!
//! Each method returns a [`Listener`] for one remote stream. When the platform
//! invokes it, the payload is wrapped in the matching [`ForwardedEvent`] variant
//! and published on the [`Bus`] unchanged.
//!
//! ```text
//! platform ── listener(payload) ──► ForwardedEvent::<Variant>(payload) ──► Bus
//! ```
//!
//! Pure forwarding: no buffering, no deduplication, no reordering.

use std::sync::Arc;

use crate::events::{Bus, ForwardedEvent};
use crate::platform::Listener;
use crate::platform::dto::{
    AgentChangedEvent, SessionChangedEvent, ToolTriggeredEvent, UiInteractionEvent,
};

/// Builds bus-forwarding listeners.
#[derive(Clone, Debug)]
pub struct EventFanout {
    bus: Bus,
}

impl EventFanout {
    pub fn new(bus: Bus) -> Self {
        Self { bus }
    }

    /// Listener that tags each payload with `wrap` and publishes it.
    pub fn listener<T, F>(&self, wrap: F) -> Listener<T>
    where
        T: 'static,
        F: Fn(T) -> ForwardedEvent + Send + Sync + 'static,
    {
        let bus = self.bus.clone();
        Arc::new(move |payload: T| bus.publish(wrap(payload)))
    }

    /// Forwards to `session`.
    pub fn session(&self) -> Listener<SessionChangedEvent> {
        self.listener(ForwardedEvent::Session)
    }

    /// Forwards to `tool`.
    pub fn tool(&self) -> Listener<ToolTriggeredEvent> {
        self.listener(ForwardedEvent::Tool)
    }

    /// Forwards to `ui.interaction`.
    pub fn ui_interaction(&self) -> Listener<UiInteractionEvent> {
        self.listener(ForwardedEvent::UiInteraction)
    }

    /// Forwards to `agent.changed`.
    pub fn agent_changed(&self) -> Listener<AgentChangedEvent> {
        self.listener(ForwardedEvent::AgentChanged)
    }
}
