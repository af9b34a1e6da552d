#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sermas_link::dto::{
    AgentChangedEvent, AppTool, DataRecord, DialogueMessage, PlatformApp, PlatformSession,
    QrCodeRequest, QrCodeResponse, RecordQuery, RepositoryOptions, SessionChangedEvent,
    ToolTriggeredEvent, UiContent, UiInteractionEvent, UserLoginEvent,
};
use sermas_link::{Listener, Platform, PlatformError, RemoteStream, Teardown};
use tokio::sync::Barrier;

/// In-memory platform double recording every call it receives.
#[derive(Default)]
pub struct FakePlatform {
    calls: Mutex<Vec<String>>,
    token_failures: AtomicU32,
    token_never_succeeds: bool,
    token_attempts: AtomicU32,
    failing_streams: HashSet<RemoteStream>,
    stalled_streams: HashSet<RemoteStream>,
    registration_gate: Option<Arc<Barrier>>,
    session_listener: Mutex<Option<Listener<SessionChangedEvent>>>,
    tool_listener: Mutex<Option<Listener<ToolTriggeredEvent>>>,
    interaction_listener: Mutex<Option<Listener<UiInteractionEvent>>>,
    agent_listener: Mutex<Option<Listener<AgentChangedEvent>>>,
    login_listener: Mutex<Option<Listener<UserLoginEvent>>>,
    app: Option<PlatformApp>,
    app_failures: AtomicU32,
    app_delay: Option<Duration>,
    app_fetches: AtomicUsize,
    records: Mutex<HashMap<String, DataRecord>>,
    record_error: Option<PlatformError>,
    released: Arc<AtomicUsize>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the first `n` token attempts.
    pub fn failing_token(mut self, n: u32) -> Self {
        self.token_failures = AtomicU32::new(n);
        self
    }

    pub fn token_never_succeeds(mut self) -> Self {
        self.token_never_succeeds = true;
        self
    }

    pub fn failing_stream(mut self, stream: RemoteStream) -> Self {
        self.failing_streams.insert(stream);
        self
    }

    /// Registration of `stream` never settles.
    pub fn stalled_stream(mut self, stream: RemoteStream) -> Self {
        self.stalled_streams.insert(stream);
        self
    }

    /// Every registration waits on `gate` before settling.
    pub fn gated_registrations(mut self, gate: Arc<Barrier>) -> Self {
        self.registration_gate = Some(gate);
        self
    }

    pub fn with_app(mut self, app: PlatformApp) -> Self {
        self.app = Some(app);
        self
    }

    /// Fails the first `n` descriptor reads.
    pub fn failing_app(mut self, n: u32) -> Self {
        self.app_failures = AtomicU32::new(n);
        self
    }

    /// Delays every descriptor read.
    pub fn slow_app(mut self, delay: Duration) -> Self {
        self.app_delay = Some(delay);
        self
    }

    pub fn with_record(self, record: DataRecord) -> Self {
        lock(&self.records).insert(record.storage_id.clone(), record);
        self
    }

    /// Every record call fails with `err`.
    pub fn failing_records(mut self, err: PlatformError) -> Self {
        self.record_error = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn calls_named(&self, name: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.as_str() == name).count()
    }

    pub fn token_attempts(&self) -> u32 {
        self.token_attempts.load(Ordering::SeqCst)
    }

    pub fn app_fetches(&self) -> usize {
        self.app_fetches.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn emit_session(&self, ev: SessionChangedEvent) {
        if let Some(l) = lock(&self.session_listener).clone() {
            l(ev);
        }
    }

    pub fn emit_tool(&self, ev: ToolTriggeredEvent) {
        if let Some(l) = lock(&self.tool_listener).clone() {
            l(ev);
        }
    }

    pub fn emit_interaction(&self, ev: UiInteractionEvent) {
        if let Some(l) = lock(&self.interaction_listener).clone() {
            l(ev);
        }
    }

    pub fn emit_agent(&self, ev: AgentChangedEvent) {
        if let Some(l) = lock(&self.agent_listener).clone() {
            l(ev);
        }
    }

    pub fn emit_login(&self, ev: UserLoginEvent) {
        if let Some(l) = lock(&self.login_listener).clone() {
            l(ev);
        }
    }

    pub fn has_listener(&self, stream: RemoteStream) -> bool {
        match stream {
            RemoteStream::SessionChanged => lock(&self.session_listener).is_some(),
            RemoteStream::ToolTriggered => lock(&self.tool_listener).is_some(),
            RemoteStream::Interaction => lock(&self.interaction_listener).is_some(),
            RemoteStream::AgentChanged => lock(&self.agent_listener).is_some(),
            RemoteStream::UserLogin => lock(&self.login_listener).is_some(),
        }
    }

    fn record(&self, call: &str) {
        lock(&self.calls).push(call.to_string());
    }

    async fn attach<T>(
        &self,
        stream: RemoteStream,
        slot: &Mutex<Option<Listener<T>>>,
        listener: Listener<T>,
    ) -> Result<Teardown, PlatformError> {
        self.record(stream.as_str());
        if self.stalled_streams.contains(&stream) {
            *lock(slot) = Some(Arc::clone(&listener));
            futures::future::pending::<()>().await;
        }
        if let Some(gate) = &self.registration_gate {
            gate.wait().await;
        }
        if self.failing_streams.contains(&stream) {
            return Err(PlatformError::transport(format!("{stream} unavailable")));
        }
        *lock(slot) = Some(listener);
        let released = Arc::clone(&self.released);
        Ok(Teardown::new(move || {
            released.fetch_add(1, Ordering::SeqCst);
        }))
    }

    fn record_outcome<T>(&self, ok: impl FnOnce(&HashMap<String, DataRecord>) -> Result<T, PlatformError>) -> Result<T, PlatformError> {
        match &self.record_error {
            Some(err) => Err(err.clone()),
            None => ok(&lock(&self.records)),
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl Platform for FakePlatform {
    async fn load_token(&self, _client_id: &str, _client_secret: &str) -> Result<(), PlatformError> {
        self.record("load_token");
        self.token_attempts.fetch_add(1, Ordering::SeqCst);
        if self.token_never_succeeds {
            return Err(PlatformError::Unauthorized {
                reason: "bad credentials".into(),
            });
        }
        let left = self.token_failures.load(Ordering::SeqCst);
        if left > 0 {
            self.token_failures.store(left - 1, Ordering::SeqCst);
            return Err(PlatformError::transport("connection refused"));
        }
        Ok(())
    }

    async fn on_user_login(&self, listener: Listener<UserLoginEvent>) -> Result<Teardown, PlatformError> {
        self.attach(RemoteStream::UserLogin, &self.login_listener, listener).await
    }

    async fn on_session_changed(
        &self,
        listener: Listener<SessionChangedEvent>,
    ) -> Result<Teardown, PlatformError> {
        self.attach(RemoteStream::SessionChanged, &self.session_listener, listener).await
    }

    async fn on_tool_triggered(
        &self,
        listener: Listener<ToolTriggeredEvent>,
    ) -> Result<Teardown, PlatformError> {
        self.attach(RemoteStream::ToolTriggered, &self.tool_listener, listener).await
    }

    async fn on_interaction(
        &self,
        listener: Listener<UiInteractionEvent>,
    ) -> Result<Teardown, PlatformError> {
        self.attach(RemoteStream::Interaction, &self.interaction_listener, listener).await
    }

    async fn on_agent_changed(
        &self,
        listener: Listener<AgentChangedEvent>,
    ) -> Result<Teardown, PlatformError> {
        self.attach(RemoteStream::AgentChanged, &self.agent_listener, listener).await
    }

    async fn read_app(&self, app_id: &str) -> Result<PlatformApp, PlatformError> {
        self.record("read_app");
        self.app_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.app_delay {
            tokio::time::sleep(delay).await;
        }
        let left = self.app_failures.load(Ordering::SeqCst);
        if left > 0 {
            self.app_failures.store(left - 1, Ordering::SeqCst);
            return Err(PlatformError::transport("timeout"));
        }
        self.app
            .clone()
            .ok_or_else(|| PlatformError::not_found(app_id))
    }

    async fn update_app_tools(&self, app_id: &str, tools: Vec<AppTool>) -> Result<PlatformApp, PlatformError> {
        self.record("update_app_tools");
        let mut app = self.app.clone().unwrap_or_default();
        app.app_id = app_id.to_string();
        app.tools = tools;
        Ok(app)
    }

    async fn chat_message(
        &self,
        _app_id: &str,
        _session_id: &str,
        _message: DialogueMessage,
    ) -> Result<(), PlatformError> {
        self.record("chat_message");
        Ok(())
    }

    async fn set_tools(
        &self,
        _repository_id: &str,
        _app_id: &str,
        _tools: Vec<AppTool>,
        _options: Option<RepositoryOptions>,
    ) -> Result<(), PlatformError> {
        self.record("set_tools");
        Ok(())
    }

    async fn add_tools(
        &self,
        _repository_id: &str,
        _app_id: &str,
        _tools: Vec<AppTool>,
        _options: Option<RepositoryOptions>,
    ) -> Result<(), PlatformError> {
        self.record("add_tools");
        Err(PlatformError::Rejected {
            status: 400,
            reason: "repository is read-only".into(),
        })
    }

    async fn read_session(&self, session_id: &str) -> Result<PlatformSession, PlatformError> {
        self.record("read_session");
        Ok(PlatformSession {
            session_id: session_id.to_string(),
            ..Default::default()
        })
    }

    async fn get_record(&self, storage_id: &str) -> Result<DataRecord, PlatformError> {
        self.record("get_record");
        self.record_outcome(|records| {
            records
                .get(storage_id)
                .cloned()
                .ok_or_else(|| PlatformError::not_found(storage_id))
        })
    }

    async fn find_records(&self, query: RecordQuery) -> Result<Vec<DataRecord>, PlatformError> {
        self.record("find_records");
        self.record_outcome(|records| {
            let found: Vec<DataRecord> = records
                .values()
                .filter(|r| query.storage_ids.is_empty() || query.storage_ids.contains(&r.storage_id))
                .filter(|r| query.session_id.is_none() || r.session_id == query.session_id)
                .cloned()
                .collect();
            if found.is_empty() {
                Err(PlatformError::not_found("records"))
            } else {
                Ok(found)
            }
        })
    }

    async fn set_record(&self, record: DataRecord) -> Result<DataRecord, PlatformError> {
        self.record("set_record");
        if let Some(err) = &self.record_error {
            return Err(err.clone());
        }
        lock(&self.records).insert(record.storage_id.clone(), record.clone());
        Ok(record)
    }

    async fn generate_qr_code(&self, request: QrCodeRequest) -> Result<QrCodeResponse, PlatformError> {
        self.record("generate_qr_code");
        Ok(QrCodeResponse {
            image_data_url: format!("data:image/png;base64,{}", request.data),
        })
    }

    async fn publish_ui_content(&self, _content: UiContent) -> Result<(), PlatformError> {
        self.record("publish_ui_content");
        Ok(())
    }
}

/// Shared in-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Installs a capturing subscriber for the current thread.
    ///
    /// Keep the guard alive for the duration of the test.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.buf)).into_owned()
    }

    /// Lines logged at error level.
    pub fn errors(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| l.contains("ERROR"))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        lock(&self.buf).extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
