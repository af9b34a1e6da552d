//! # Events forwarded onto the local bus.
//!
//! The [`Channel`] enum is the closed set of names the hosting process can listen
//! on. Each [`ForwardedEvent`] variant carries exactly the payload delivered by the
//! matching remote stream; readiness is a payload-less event on the same bus.
//!
//! | Channel                    | Name             | Payload                 |
//! |----------------------------|------------------|-------------------------|
//! | [`Channel::Session`]       | `session`        | `SessionChangedEvent`   |
//! | [`Channel::Tool`]          | `tool`           | `ToolTriggeredEvent`    |
//! | [`Channel::UiInteraction`] | `ui.interaction` | `UiInteractionEvent`    |
//! | [`Channel::AgentChanged`]  | `agent.changed`  | `AgentChangedEvent`     |
//! | [`Channel::Ready`]         | `sermas.ready`   | none                    |
//!
//! ## Example
//! ```rust
//! use sermas_link::{Channel, ForwardedEvent};
//!
//! let ch: Channel = "ui.interaction".parse().unwrap();
//! assert_eq!(ch, Channel::UiInteraction);
//! assert_eq!(ForwardedEvent::Ready.channel().as_str(), "sermas.ready");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownChannel;
use crate::platform::dto::{
    AgentChangedEvent, SessionChangedEvent, ToolTriggeredEvent, UiInteractionEvent,
};

/// Identity of a local bus channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Session created/updated/closed.
    Session,
    /// App tool triggered.
    Tool,
    /// UI interaction.
    UiInteraction,
    /// Agent changed.
    AgentChanged,
    /// Platform credentials acquired; fires once per session.
    Ready,
}

impl Channel {
    /// Every channel, in a stable order.
    pub const ALL: [Channel; 5] = [
        Channel::Session,
        Channel::Tool,
        Channel::UiInteraction,
        Channel::AgentChanged,
        Channel::Ready,
    ];

    /// Stable wire name of the channel.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Channel::Session => "session",
            Channel::Tool => "tool",
            Channel::UiInteraction => "ui.interaction",
            Channel::AgentChanged => "agent.changed",
            Channel::Ready => "sermas.ready",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|ch| ch.as_str() == s)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

/// Event republished on the local bus.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardedEvent {
    Session(SessionChangedEvent),
    Tool(ToolTriggeredEvent),
    UiInteraction(UiInteractionEvent),
    AgentChanged(AgentChangedEvent),
    Ready,
}

impl ForwardedEvent {
    /// Channel this event is published on.
    #[inline]
    pub fn channel(&self) -> Channel {
        match self {
            ForwardedEvent::Session(_) => Channel::Session,
            ForwardedEvent::Tool(_) => Channel::Tool,
            ForwardedEvent::UiInteraction(_) => Channel::UiInteraction,
            ForwardedEvent::AgentChanged(_) => Channel::AgentChanged,
            ForwardedEvent::Ready => Channel::Ready,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, ForwardedEvent::Ready)
    }
}
