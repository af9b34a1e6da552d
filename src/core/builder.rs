use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::session::Session;
use crate::{config::Config, platform::PlatformRef, subscribers::Subscribe};

/// Builder for constructing a [`Session`].
pub struct SessionBuilder {
    cfg: Config,
    platform: PlatformRef,
    subscribers: Vec<Arc<dyn Subscribe>>,
    token: Option<CancellationToken>,
}

impl SessionBuilder {
    /// Creates a new builder with the given configuration and platform client.
    pub fn new(cfg: Config, platform: PlatformRef) -> Self {
        Self {
            cfg,
            platform,
            subscribers: Vec::new(),
            token: None,
        }
    }

    /// Sets local subscribers.
    ///
    /// Subscribers receive forwarded events through dedicated workers with
    /// bounded queues, starting when the session starts.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Ties the session to an external cancellation token (e.g. the host's shutdown token).
    ///
    /// The session uses a child of `token`, so cancelling the session never cancels the parent.
    pub fn with_cancellation(mut self, token: &CancellationToken) -> Self {
        self.token = Some(token.child_token());
        self
    }

    /// Builds the session. Nothing runs until [`Session::start`].
    pub fn build(self) -> Arc<Session> {
        let token = self.token.unwrap_or_default();
        Arc::new(Session::new_internal(
            self.cfg,
            self.platform,
            self.subscribers,
            token,
        ))
    }
}
