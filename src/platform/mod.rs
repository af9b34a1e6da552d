//! # Remote platform boundary.
//!
//! The platform client itself (authentication mechanics, wire protocol, per-call
//! retries) lives outside this crate. [`Platform`] is the seam: hosts implement it
//! over their HTTP/MQTT client, tests implement it in memory.
//!
//! ## Contents
//! - [`Platform`] the async client contract consumed by the session
//! - [`Listener`] callback handed to the `on_*` subscription calls
//! - [`Teardown`] capability returned by a successful subscription
//! - [`dto`] payload shapes
//!
//! ## Listener contract
//! ```text
//! Session ── on_session_changed(listener) ──► Platform
//!                                               │ Ok(Teardown)
//!         (later, per remote occurrence)        ▼
//! Platform ── listener(SessionChangedEvent) ──► EventFanout ──► Bus
//! ```
//! Implementations call the listener once per remote occurrence, in the order the
//! remote stream delivers them, and stop calling it once the returned
//! [`Teardown`] has been released.

pub mod dto;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PlatformError;
use dto::{
    AgentChangedEvent, AppTool, DataRecord, DialogueMessage, PlatformApp, PlatformSession,
    QrCodeRequest, QrCodeResponse, RecordQuery, RepositoryOptions, SessionChangedEvent,
    ToolTriggeredEvent, UiContent, UiInteractionEvent, UserLoginEvent,
};

/// Callback invoked by the platform for each remote event occurrence.
pub type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Shared handle to a platform client.
pub type PlatformRef = Arc<dyn Platform>;

/// Opaque capability detaching a previously registered remote listener.
///
/// Consumed on release, so a listener is detached at most once.
pub struct Teardown {
    release: Box<dyn FnOnce() + Send>,
}

impl Teardown {
    /// Wraps a detach closure.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Box::new(release),
        }
    }

    /// A teardown that does nothing (for streams without server-side state).
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Detaches the remote listener.
    pub fn release(self) {
        (self.release)()
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Teardown")
    }
}

/// # Async client of the remote platform.
///
/// Every method is a suspension point. Errors are reported as [`PlatformError`];
/// lookups of missing records must use [`PlatformError::NotFound`], which the
/// session treats as an expected, silent outcome.
#[async_trait]
pub trait Platform: Send + Sync + 'static {
    /// Acquires credentials for subsequent calls.
    async fn load_token(&self, client_id: &str, client_secret: &str) -> Result<(), PlatformError>;

    /// Subscribes to user login notices.
    async fn on_user_login(
        &self,
        listener: Listener<UserLoginEvent>,
    ) -> Result<Teardown, PlatformError>;

    /// Subscribes to session lifecycle changes.
    async fn on_session_changed(
        &self,
        listener: Listener<SessionChangedEvent>,
    ) -> Result<Teardown, PlatformError>;

    /// Subscribes to tool triggers.
    async fn on_tool_triggered(
        &self,
        listener: Listener<ToolTriggeredEvent>,
    ) -> Result<Teardown, PlatformError>;

    /// Subscribes to UI interactions.
    async fn on_interaction(
        &self,
        listener: Listener<UiInteractionEvent>,
    ) -> Result<Teardown, PlatformError>;

    /// Subscribes to agent changes.
    async fn on_agent_changed(
        &self,
        listener: Listener<AgentChangedEvent>,
    ) -> Result<Teardown, PlatformError>;

    /// Reads the app descriptor.
    async fn read_app(&self, app_id: &str) -> Result<PlatformApp, PlatformError>;

    /// Replaces the tool list of the app.
    async fn update_app_tools(
        &self,
        app_id: &str,
        tools: Vec<AppTool>,
    ) -> Result<PlatformApp, PlatformError>;

    /// Sends a chat message into a session.
    async fn chat_message(
        &self,
        app_id: &str,
        session_id: &str,
        message: DialogueMessage,
    ) -> Result<(), PlatformError>;

    /// Replaces the tools of a repository.
    async fn set_tools(
        &self,
        repository_id: &str,
        app_id: &str,
        tools: Vec<AppTool>,
        options: Option<RepositoryOptions>,
    ) -> Result<(), PlatformError>;

    /// Appends tools to a repository.
    async fn add_tools(
        &self,
        repository_id: &str,
        app_id: &str,
        tools: Vec<AppTool>,
        options: Option<RepositoryOptions>,
    ) -> Result<(), PlatformError>;

    /// Reads a session.
    async fn read_session(&self, session_id: &str) -> Result<PlatformSession, PlatformError>;

    /// Reads one record.
    async fn get_record(&self, storage_id: &str) -> Result<DataRecord, PlatformError>;

    /// Searches records.
    async fn find_records(&self, query: RecordQuery) -> Result<Vec<DataRecord>, PlatformError>;

    /// Creates or replaces a record.
    async fn set_record(&self, record: DataRecord) -> Result<DataRecord, PlatformError>;

    /// Renders a QR code.
    async fn generate_qr_code(
        &self,
        request: QrCodeRequest,
    ) -> Result<QrCodeResponse, PlatformError>;

    /// Pushes content to the app UI.
    async fn publish_ui_content(&self, content: UiContent) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn teardown_runs_its_closure_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let teardown = Teardown::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        teardown.release();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
