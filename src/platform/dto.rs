//! # Platform payloads.
//!
//! Data shapes exchanged with the remote platform. Field names follow the
//! platform's camelCase JSON; fields this crate does not model are kept in
//! `extra` so a payload deserialized here serializes back unchanged.
//!
//! The event DTOs ([`SessionChangedEvent`], [`ToolTriggeredEvent`],
//! [`UiInteractionEvent`], [`AgentChangedEvent`]) are forwarded onto the local
//! bus as-is; nothing in this crate mutates them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unmodelled JSON members carried alongside a DTO.
pub type Extra = Map<String, Value>;

/// A platform session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSession {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A session was created, updated or closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionChangedEvent {
    /// `created`, `updated`, `deleted`, ...
    pub operation: String,
    pub record: PlatformSession,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An app tool was triggered by the dialogue engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolTriggeredEvent {
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub values: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// The user interacted with a UI element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiInteractionEvent {
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub interaction: Value,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An agent joined, left or changed status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentChangedEvent {
    pub operation: String,
    #[serde(default)]
    pub record: Value,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A user logged in on the platform. Logged only, never forwarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginEvent {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Tool exposed by an app to the dialogue engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// The application descriptor cached by [`AppDescriptorCache`](crate::AppDescriptorCache).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformApp {
    pub app_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AppTool>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A chat message sent on behalf of the app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Options for tool repository updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_on_click: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A record in the platform key/value storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRecord {
    pub storage_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Filter for record searches. Empty fields do not constrain the search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub storage_ids: Vec<String>,
}

/// QR-code generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeRequest {
    pub version: String,
    pub data: String,
}

/// Generated QR code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeResponse {
    /// Image encoded as a `data:` URL.
    pub image_data_url: String,
}

/// Content pushed to the app UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiContent {
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub content_type: String,
    #[serde(default)]
    pub content: Value,
    #[serde(flatten)]
    pub extra: Extra,
}
