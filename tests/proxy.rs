mod support;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use sermas_link::dto::{
    AppTool, DataRecord, DialogueMessage, QrCodeRequest, RecordQuery, UiContent,
};
use sermas_link::{Config, PlatformError, PlatformRef, RemoteStream, Session};

use support::{FakePlatform, LogCapture};

fn record(id: &str, session_id: &str) -> DataRecord {
    DataRecord {
        storage_id: id.into(),
        session_id: Some(session_id.into()),
        data: json!({ "visits": 1 }),
        ..Default::default()
    }
}

fn session(fake: &Arc<FakePlatform>) -> Arc<Session> {
    let platform: PlatformRef = fake.clone();
    let cfg = Config {
        prefetch_descriptor: false,
        ..Config::default()
    };
    Session::builder(cfg, platform).build()
}

#[tokio::test]
async fn missing_record_is_absent_and_silent() {
    let (logs, _guard) = LogCapture::install();
    let fake = Arc::new(FakePlatform::new().with_record(record("r1", "s1")));
    let session = session(&fake);

    assert!(session.get_record("nope").await.is_none());
    let query = RecordQuery {
        session_id: Some("other".into()),
        ..Default::default()
    };
    assert!(session.find_records(query).await.is_none());
    assert!(logs.errors().is_empty(), "unexpected errors: {:?}", logs.errors());
}

#[tokio::test]
async fn record_lookups_return_stored_data() {
    let fake = Arc::new(FakePlatform::new().with_record(record("r1", "s1")));
    let session = session(&fake);

    let got = session.get_record("r1").await.expect("record");
    assert_eq!(got.data["visits"], 1);

    let query = RecordQuery {
        session_id: Some("s1".into()),
        ..Default::default()
    };
    let found = session.find_records(query).await.expect("records");
    assert_eq!(found.len(), 1);

    let saved = session.set_record(record("r2", "s2")).await.expect("saved");
    assert_eq!(saved.storage_id, "r2");
    assert!(session.get_record("r2").await.is_some());
}

#[tokio::test]
async fn other_record_failures_are_logged() {
    let (logs, _guard) = LogCapture::install();
    let fake = Arc::new(
        FakePlatform::new().failing_records(PlatformError::transport("connection reset")),
    );
    let session = session(&fake);

    assert!(session.get_record("r1").await.is_none());
    assert!(session.find_records(RecordQuery::default()).await.is_none());
    assert!(session.set_record(record("r1", "s1")).await.is_none());

    let errors = logs.errors();
    assert_eq!(errors.len(), 3, "errors: {errors:?}");
    assert!(errors.iter().all(|l| l.contains("platform_transport")));
    assert!(errors[0].contains("get_record"));
}

#[tokio::test]
async fn pass_through_calls_report_success() {
    let fake = Arc::new(FakePlatform::new());
    let session = session(&fake);
    let tools = vec![AppTool {
        name: "open-door".into(),
        description: "Opens the door".into(),
        ..Default::default()
    }];

    let app = session.update_app_tools(tools.clone()).await.expect("app");
    assert_eq!(app.app_id, "sermas-app");
    assert_eq!(app.tools, tools);

    let message = DialogueMessage {
        text: "hello".into(),
        ..Default::default()
    };
    assert_eq!(session.send_chat_message("s1", message).await, Some(()));
    assert_eq!(session.set_tools("repo", tools, None).await, Some(()));
    assert_eq!(
        session.read_session("s1").await.map(|s| s.session_id),
        Some("s1".to_string())
    );

    let qr = session
        .generate_qr_code(QrCodeRequest {
            version: "1".into(),
            data: "abc".into(),
        })
        .await
        .expect("qr");
    assert!(qr.image_data_url.ends_with("abc"));

    let content = UiContent {
        app_id: "sermas-app".into(),
        content_type: "text".into(),
        content: json!({ "text": "welcome" }),
        ..Default::default()
    };
    assert_eq!(session.publish_ui_content(content).await, Some(()));
    assert_eq!(
        fake.calls(),
        [
            "update_app_tools",
            "chat_message",
            "set_tools",
            "read_session",
            "generate_qr_code",
            "publish_ui_content",
        ]
    );
}

#[tokio::test]
async fn rejected_call_is_absorbed_and_logged() {
    let (logs, _guard) = LogCapture::install();
    let fake = Arc::new(FakePlatform::new());
    let session = session(&fake);

    assert!(session.add_tools("repo", Vec::new(), None).await.is_none());
    let errors = logs.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("add_tools") && errors[0].contains("platform_rejected"));
}

#[tokio::test]
async fn shutdown_releases_every_listener() {
    let fake = Arc::new(FakePlatform::new());
    let session = session(&fake);
    session.start();
    session.ready().await;
    while session.active_streams().await.len() < RemoteStream::ALL.len() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(session.shutdown().await, 5);
    assert_eq!(fake.released(), 5);
    assert!(session.active_streams().await.is_empty());
    assert_eq!(session.shutdown().await, 0);
    assert_eq!(fake.released(), 5);
}
