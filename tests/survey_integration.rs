//! Integration tests for the submission relay and WebSocket survey sessions.
//!
//! Each test spins up a stub upstream collection service and the real
//! survey app on random ports, then exercises the HTTP / WS contract.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use pretotype_survey::forwarder::{FAILURE_MESSAGE, Forwarder};
use pretotype_survey::server;
use pretotype_survey::survey::mindfulness_questions;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// What the stub upstream saw for one request.
#[derive(Debug)]
struct Received {
    content_type: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    reply: &'static str,
    tx: mpsc::UnboundedSender<Received>,
}

async fn stub_survey(State(state): State<StubState>, headers: HeaderMap, body: Bytes) -> (StatusCode, String) {
    let received = Received {
        content_type: headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    let _ = state.tx.send(received);
    (state.status, state.reply.to_string())
}

async fn serve(app: Router) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    port
}

/// Start a stub upstream answering `/survey` with `status` and `reply`.
async fn start_upstream(
    status: StatusCode,
    reply: &'static str,
) -> (u16, mpsc::UnboundedReceiver<Received>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route("/survey", post(stub_survey))
        .with_state(StubState { status, reply, tx });
    (serve(app).await, rx)
}

/// Start the survey app pointed at the given upstream port.
async fn start_app(upstream_port: u16) -> u16 {
    let forwarder = Arc::new(Forwarder::new(Some(format!(
        "http://127.0.0.1:{upstream_port}/"
    ))));
    let port = serve(server::app(Arc::new(mindfulness_questions()), forwarder)).await;
    // Give the servers a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;
    port
}

fn scenario_payload() -> Value {
    json!({
        "email": "a@b.co",
        "reason_mindfulness": "health, anxiety",
        "preferred_service_format": "ai_chat",
        "preferred_content_type": "guide, journal"
    })
}

async fn post_survey(port: u16, body: &Value) -> (StatusCode, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}/api/survey"))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

// ── Relay Tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn relay_returns_upstream_json_on_success() {
    timeout(TEST_TIMEOUT, async {
        let (upstream, mut rx) = start_upstream(StatusCode::OK, r#"{"success":true,"id":42}"#).await;
        let port = start_app(upstream).await;

        let (status, json) = post_survey(port, &scenario_payload()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"success": true, "id": 42}));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.content_type.as_deref(), Some("application/json"));
        assert_eq!(received.body, scenario_payload());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn relay_forwards_unknown_fields_verbatim() {
    timeout(TEST_TIMEOUT, async {
        let (upstream, mut rx) = start_upstream(StatusCode::CREATED, "{}").await;
        let port = start_app(upstream).await;

        let mut body = scenario_payload();
        body["extra"] = json!([1, 2, 3]);
        let (status, _) = post_survey(port, &body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rx.recv().await.unwrap().body, body);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn relay_maps_upstream_error_status_to_fixed_failure() {
    timeout(TEST_TIMEOUT, async {
        let (upstream, _rx) = start_upstream(StatusCode::SERVICE_UNAVAILABLE, "down").await;
        let port = start_app(upstream).await;

        let (status, json) = post_survey(port, &scenario_payload()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"success": false, "message": FAILURE_MESSAGE}));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn relay_maps_malformed_upstream_body_to_fixed_failure() {
    timeout(TEST_TIMEOUT, async {
        let (upstream, _rx) = start_upstream(StatusCode::OK, "<html>ok</html>").await;
        let port = start_app(upstream).await;

        let (status, json) = post_survey(port, &scenario_payload()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], FAILURE_MESSAGE);
    })
    .await
    .expect("test timed out");
}

// ── Session Tests ────────────────────────────────────────────────────

type Ws = tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn next_json(ws: &mut Ws) -> Value {
    loop {
        match ws.next().await.unwrap().unwrap() {
            Message::Text(txt) => return serde_json::from_str(&txt).expect("invalid JSON from server"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("expected Text frame, got {:?}", other),
        }
    }
}

/// Send an action and return the screen that follows it, asserting no
/// rejection came first.
async fn act(ws: &mut Ws, action: Value) -> Value {
    ws.send(Message::Text(action.to_string().into())).await.unwrap();
    let reply = next_json(ws).await;
    assert_eq!(reply["type"], "screen", "action {action} was not accepted: {reply}");
    reply
}

async fn run_scenario(ws: &mut Ws) -> Value {
    act(ws, json!({"type": "set_contact", "value": "a@b.co"})).await;
    act(ws, json!({"type": "advance"})).await;
    for (q, o) in [("needs", "health"), ("needs", "anxiety")] {
        act(ws, json!({"type": "toggle_option", "question_id": q, "option_id": o})).await;
    }
    act(ws, json!({"type": "advance"})).await;
    act(ws, json!({"type": "toggle_option", "question_id": "format", "option_id": "ai_chat"})).await;
    act(ws, json!({"type": "advance"})).await;
    for o in ["guide", "journal"] {
        act(ws, json!({"type": "toggle_option", "question_id": "content", "option_id": o})).await;
    }
    act(ws, json!({"type": "advance"})).await
}

#[tokio::test]
async fn session_completes_and_submits_once() {
    timeout(TEST_TIMEOUT, async {
        let (upstream, mut rx) = start_upstream(StatusCode::OK, r#"{"success":true}"#).await;
        let port = start_app(upstream).await;

        let (mut ws, _) = connect_async(format!("ws://127.0.0.1:{port}/ws/survey"))
            .await
            .expect("WS connect failed");

        let initial = next_json(&mut ws).await;
        assert_eq!(initial["type"], "screen");
        assert_eq!(initial["position"]["screen"], "intro");

        let done = run_scenario(&mut ws).await;
        assert_eq!(done["position"]["screen"], "thanks");

        let received = rx.recv().await.unwrap();
        assert_eq!(received.body, scenario_payload());

        // Further advances are refused and do not submit again.
        ws.send(Message::Text(json!({"type": "advance"}).to_string().into()))
            .await
            .unwrap();
        assert_eq!(next_json(&mut ws).await["type"], "rejected");
        assert_eq!(next_json(&mut ws).await["position"]["screen"], "thanks");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err(), "payload was submitted twice");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn session_reaches_thanks_when_upstream_fails() {
    timeout(TEST_TIMEOUT, async {
        let (upstream, mut rx) = start_upstream(StatusCode::SERVICE_UNAVAILABLE, "").await;
        let port = start_app(upstream).await;

        let (mut ws, _) = connect_async(format!("ws://127.0.0.1:{port}/ws/survey"))
            .await
            .unwrap();
        next_json(&mut ws).await;

        let done = run_scenario(&mut ws).await;
        assert_eq!(done["position"]["screen"], "thanks");
        assert!(rx.recv().await.is_some());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn session_rejects_invalid_contact() {
    timeout(TEST_TIMEOUT, async {
        let (upstream, _rx) = start_upstream(StatusCode::OK, "{}").await;
        let port = start_app(upstream).await;

        let (mut ws, _) = connect_async(format!("ws://127.0.0.1:{port}/ws/survey"))
            .await
            .unwrap();
        next_json(&mut ws).await;

        let screen = act(&mut ws, json!({"type": "set_contact", "value": "nope"})).await;
        assert_eq!(screen["can_advance"], false);

        ws.send(Message::Text(json!({"type": "advance"}).to_string().into()))
            .await
            .unwrap();
        let rejected = next_json(&mut ws).await;
        assert_eq!(rejected["type"], "rejected");
        assert_eq!(next_json(&mut ws).await["position"]["screen"], "intro");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn questions_endpoint_lists_catalogue() {
    timeout(TEST_TIMEOUT, async {
        let (upstream, _rx) = start_upstream(StatusCode::OK, "{}").await;
        let port = start_app(upstream).await;

        let json: Value = reqwest::get(format!("http://127.0.0.1:{port}/api/survey/questions"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let questions = json.as_array().unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[1]["options"][0]["id"], "ai_chat");
    })
    .await
    .expect("test timed out");
}
