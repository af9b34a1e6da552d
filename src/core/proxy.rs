//! # Pass-through platform calls.
//!
//! Each accessor makes one remote call and absorbs its failure:
//!
//! ```text
//! Ok(v)                       ──► Some(v)
//! Err(NotFound) on a record   ──► None   (expected, not logged)
//! Err(e)                      ──► None   (logged at error level)
//! ```
//!
//! Nothing here raises to the caller. Calls returning no data yield `Some(())`
//! on success so callers can still tell success from failure.

use std::sync::Arc;

use tracing::error;

use super::session::Session;
use crate::error::PlatformError;
use crate::platform::dto::{
    AppTool, DataRecord, DialogueMessage, PlatformApp, PlatformSession, QrCodeRequest,
    QrCodeResponse, RecordQuery, RepositoryOptions, UiContent,
};

/// Turns a call result into an optional value, logging the failure.
fn absorb<T>(op: &'static str, res: Result<T, PlatformError>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            error!(op, error = %e, label = e.as_label(), "platform call failed");
            None
        }
    }
}

/// Like [`absorb`], but a missing record is an expected outcome and stays silent.
fn absorb_lookup<T>(op: &'static str, res: Result<T, PlatformError>) -> Option<T> {
    match res {
        Err(e) if e.is_not_found() => None,
        res => absorb(op, res),
    }
}

impl Session {
    /// The app descriptor, from cache or fetched on a miss.
    pub async fn get_app(&self) -> Option<Arc<PlatformApp>> {
        self.cache.get_descriptor().await
    }

    /// Replaces the app's tool list.
    pub async fn update_app_tools(&self, tools: Vec<AppTool>) -> Option<PlatformApp> {
        absorb(
            "update_app_tools",
            self.platform.update_app_tools(&self.cfg.app_id, tools).await,
        )
    }

    /// Sends a chat message into `session_id` on behalf of the app.
    pub async fn send_chat_message(&self, session_id: &str, message: DialogueMessage) -> Option<()> {
        absorb(
            "chat_message",
            self.platform
                .chat_message(&self.cfg.app_id, session_id, message)
                .await,
        )
    }

    /// Replaces the tools of `repository_id`.
    pub async fn set_tools(
        &self,
        repository_id: &str,
        tools: Vec<AppTool>,
        options: Option<RepositoryOptions>,
    ) -> Option<()> {
        absorb(
            "set_tools",
            self.platform
                .set_tools(repository_id, &self.cfg.app_id, tools, options)
                .await,
        )
    }

    /// Appends tools to `repository_id`.
    pub async fn add_tools(
        &self,
        repository_id: &str,
        tools: Vec<AppTool>,
        options: Option<RepositoryOptions>,
    ) -> Option<()> {
        absorb(
            "add_tools",
            self.platform
                .add_tools(repository_id, &self.cfg.app_id, tools, options)
                .await,
        )
    }

    pub async fn read_session(&self, session_id: &str) -> Option<PlatformSession> {
        absorb("read_session", self.platform.read_session(session_id).await)
    }

    /// Reads a record; `None` when it does not exist or the call failed.
    pub async fn get_record(&self, storage_id: &str) -> Option<DataRecord> {
        absorb_lookup("get_record", self.platform.get_record(storage_id).await)
    }

    /// Searches records; `None` when nothing matched or the call failed.
    pub async fn find_records(&self, query: RecordQuery) -> Option<Vec<DataRecord>> {
        absorb_lookup("find_records", self.platform.find_records(query).await)
    }

    pub async fn set_record(&self, record: DataRecord) -> Option<DataRecord> {
        absorb("set_record", self.platform.set_record(record).await)
    }

    pub async fn generate_qr_code(&self, request: QrCodeRequest) -> Option<QrCodeResponse> {
        absorb("generate_qr_code", self.platform.generate_qr_code(request).await)
    }

    /// Pushes content to the app UI.
    pub async fn publish_ui_content(&self, content: UiContent) -> Option<()> {
        absorb(
            "publish_ui_content",
            self.platform.publish_ui_content(content).await,
        )
    }
}
