//! Integration test: run an in-process webhook on a free port and drive the channel message API
//! against it. The server records every request it receives.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Router,
};
use devkit::channel_message::{Attachment, ChannelMessageBody, ChannelMessages};
use devkit::host::QueueHost;
use devkit::token::TokenStore;
use devkit::webhook::Webhook;
use devkit::{DevKit, DevKitError};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
}

#[derive(Clone, Default)]
struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.requests.lock().unwrap())
    }
}

async fn record(
    State(rec): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    let status = if path.contains("/missing/") || path.ends_with("/missing") {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    rec.requests.lock().unwrap().push(Recorded {
        method,
        path,
        headers,
        body,
    });
    (status, r#"{"ok":true}"#.to_string())
}

async fn start_webhook() -> (String, Recorder) {
    let rec = Recorder::default();
    let app = Router::new().fallback(record).with_state(rec.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind free port");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{}/hooks", addr), rec)
}

fn api(base_url: &str, token: &str) -> ChannelMessages {
    let webhook = Webhook::new(base_url).expect("webhook client");
    ChannelMessages::new(webhook, Arc::new(TokenStore::with_token(token)))
}

fn header<'a>(r: &'a Recorded, name: &str) -> Option<&'a str> {
    r.headers.get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn create_posts_once_to_channel_path_with_round_tripping_body() {
    let (base, rec) = start_webhook().await;
    let api = api(&base, "app-tok");
    let attachments = vec![
        Attachment(json!({ "kind": "file", "uri": "https://files/x.pdf", "size": 12 })),
        Attachment(json!("opaque")),
    ];

    let res = api
        .create("chan-1", "hello", attachments.clone(), Some("res-1"))
        .await
        .expect("create");
    assert!(res.status().is_success());

    let reqs = rec.take();
    assert_eq!(reqs.len(), 1);
    let r = &reqs[0];
    assert_eq!(r.method, Method::POST);
    assert_eq!(r.path, "/hooks/chan-1");
    assert_eq!(header(r, "authorization"), Some("Bearer app-tok"));
    assert_eq!(header(r, "content-type"), Some("application/json"));
    assert_eq!(header(r, "cache-control"), Some("no-cache"));
    assert!(r.headers.get("referer").is_none());

    let body: ChannelMessageBody = serde_json::from_slice(&r.body).expect("decode body");
    assert_eq!(
        body,
        ChannelMessageBody {
            message: "hello".to_string(),
            attachments,
            resource_id: Some("res-1".to_string()),
        }
    );
}

#[tokio::test]
async fn update_by_message_id_puts_message_path() {
    let (base, rec) = start_webhook().await;
    let api = api(&base, "t");

    api.update_by_message_id("chan", "m-42", "edited", vec![])
        .await
        .expect("update");

    let reqs = rec.take();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method, Method::PUT);
    assert_eq!(reqs[0].path, "/hooks/chan/message/m-42");
    let body: serde_json::Value = serde_json::from_slice(&reqs[0].body).unwrap();
    assert_eq!(body, json!({ "message": "edited", "attachments": [] }));
}

#[tokio::test]
async fn update_by_resource_id_swaps_resource() {
    let (base, rec) = start_webhook().await;
    let api = api(&base, "t");

    api.update_by_resource_id("chan", "r-old", "moved", vec![], Some("r-new"))
        .await
        .expect("update");

    let reqs = rec.take();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method, Method::PUT);
    assert_eq!(reqs[0].path, "/hooks/chan/resource/r-old");
    let body: serde_json::Value = serde_json::from_slice(&reqs[0].body).unwrap();
    assert_eq!(body["resourceId"], "r-new");
    assert_eq!(body["message"], "moved");
}

#[tokio::test]
async fn deletes_use_delete_without_body() {
    let (base, rec) = start_webhook().await;
    let api = api(&base, "t");

    api.delete_by_message_id("chan", "m-1").await.expect("delete");
    api.delete_by_resource_id("chan", "r-1").await.expect("delete");

    let reqs = rec.take();
    assert_eq!(reqs.len(), 2);
    assert!(reqs.iter().all(|r| r.method == Method::DELETE && r.body.is_empty()));
    assert_eq!(reqs[0].path, "/hooks/chan/message/m-1");
    assert_eq!(reqs[1].path, "/hooks/chan/resource/r-1");
    assert_eq!(header(&reqs[1], "authorization"), Some("Bearer t"));
}

#[tokio::test]
async fn path_segments_are_percent_encoded() {
    let (base, rec) = start_webhook().await;
    let api = api(&base, "t");

    api.delete_by_message_id("chan/x", "m 1").await.expect("delete");

    let reqs = rec.take();
    assert_eq!(reqs[0].path, "/hooks/chan%2Fx/message/m%201");
}

#[tokio::test]
async fn non_success_status_is_returned_not_raised() {
    let (base, rec) = start_webhook().await;
    let api = api(&base, "t");

    let res = api
        .delete_by_resource_id("chan", "missing")
        .await
        .expect("non-2xx still resolves");
    assert_eq!(res.status().as_u16(), 404);
    assert_eq!(res.text().await.unwrap(), r#"{"ok":true}"#);
    assert_eq!(rec.take().len(), 1);
}

#[tokio::test]
async fn network_failure_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
        listener.local_addr().expect("local_addr").port()
    };
    let api = api(&format!("http://127.0.0.1:{}/hooks", port), "t");

    let err = api.create("chan", "hi", vec![], None).await.unwrap_err();
    assert!(matches!(err, DevKitError::Transport(_)));
}

#[tokio::test]
async fn uninitialized_session_sends_nothing() {
    let (base, rec) = start_webhook().await;
    let webhook = Webhook::new(&base).unwrap();
    let api = ChannelMessages::new(webhook, Arc::new(TokenStore::new()));

    let err = api.create("chan", "hi", vec![], None).await.unwrap_err();
    assert!(matches!(err, DevKitError::NotInitialized));
    assert!(rec.take().is_empty());
}

#[tokio::test]
async fn devkit_init_token_reaches_webhook() {
    let (base, rec) = start_webhook().await;
    let (host, _rx) = QueueHost::new("");
    let kit = DevKit::builder().host(host).base_url(&base).build().unwrap();

    kit.init("session-token");
    kit.messages()
        .create("chan", "hi", vec![], None)
        .await
        .expect("create");

    let reqs = rec.take();
    assert_eq!(header(&reqs[0], "authorization"), Some("Bearer session-token"));
}
