//! Integration tests for the registration page server.
//!
//! Each test spins up a stub auth backend and the signup router on random
//! ports, then drives the wizard over HTTP exactly as the page script does.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time::timeout;

use weight_signup::api::{HttpSignupClient, SignupApi};
use weight_signup::signup::{SessionStore, SignupRouteState, signup_routes};
use weight_signup::templates::PageTemplates;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Bodies received by the stub backend.
type Received = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;
    port
}

/// Start a stub `/api/auth/signup` that answers with `status`.
async fn start_backend(status: StatusCode) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let router = Router::new().route(
        "/api/auth/signup",
        post(move |Json(body): Json<Value>| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().await.push(body);
                (status, Json(json!({"message": "stub"})))
            }
        }),
    );
    let port = serve(router).await;
    (format!("http://127.0.0.1:{port}/api"), received)
}

/// Start the page server talking to `backend`, return its base URL.
async fn start_server(backend: &str) -> (String, Arc<SessionStore>) {
    let sessions = SessionStore::new();
    let api: Arc<dyn SignupApi> =
        Arc::new(HttpSignupClient::new(backend, Duration::from_secs(5)).unwrap());
    let app = signup_routes(SignupRouteState {
        sessions: Arc::clone(&sessions),
        api,
        templates: Arc::new(PageTemplates::new().unwrap()),
    });
    let port = serve(app).await;
    (format!("http://127.0.0.1:{port}"), sessions)
}

/// Load the page and pull the session id out of `data-session`.
async fn open_page(client: &reqwest::Client, base: &str) -> String {
    let html = client
        .get(format!("{base}/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let marker = "data-session=\"";
    let start = html.find(marker).expect("page has no session id") + marker.len();
    let end = start + html[start..].find('"').unwrap();
    html[start..end].to_string()
}

async fn send(client: &reqwest::Client, base: &str, session: &str, event: Value) -> Value {
    let response = client
        .post(format!("{base}/api/signup/{session}/events"))
        .json(&event)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success(), "event {event} failed: {}", response.status());
    response.json().await.unwrap()
}

async fn change(client: &reqwest::Client, base: &str, session: &str, field: &str, value: &str) -> Value {
    send(client, base, session, json!({"type": "change", "field": field, "value": value})).await
}

async fn read_document(client: &reqwest::Client, base: &str, session: &str, document: &str) -> Value {
    send(client, base, session, json!({"type": "open_document", "document": document})).await;
    send(
        client,
        base,
        session,
        json!({
            "type": "scroll_document",
            "document": document,
            "metrics": {"scroll_top": 1500.0, "scroll_height": 2000.0, "client_height": 480.0}
        }),
    )
    .await;
    send(client, base, session, json!({"type": "accept_document", "document": document})).await
}

async fn complete_step1(client: &reqwest::Client, base: &str, session: &str) -> Value {
    change(client, base, session, "email", "a@b.co").await;
    change(client, base, session, "password", "12345678").await;
    change(client, base, session, "confirmPassword", "12345678").await;
    read_document(client, base, session, "terms").await;
    read_document(client, base, session, "privacy").await;
    send(client, base, session, json!({"type": "toggle_consent", "checked": true})).await;
    send(client, base, session, json!({"type": "next"})).await
}

async fn fill_step2(client: &reqwest::Client, base: &str, session: &str) {
    for (field, value) in [
        ("nickname", "はなこ"),
        ("gender", "female"),
        ("birthdate", "1995-10-16"),
        ("height", "160"),
        ("currentWeight", "55.2"),
        ("targetWeight", "50"),
        ("activityLevel", "light"),
    ] {
        change(client, base, session, field, value).await;
    }
}

#[tokio::test]
async fn health_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let (backend, _) = start_backend(StatusCode::OK).await;
        let (base, _) = start_server(&backend).await;

        let json: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["status"], "ok");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn full_registration_posts_to_backend() {
    timeout(TEST_TIMEOUT, async {
        let (backend, received) = start_backend(StatusCode::CREATED).await;
        let (base, sessions) = start_server(&backend).await;
        let client = reqwest::Client::new();
        let session = open_page(&client, &base).await;

        let view = complete_step1(&client, &base, &session).await;
        assert_eq!(view["step"], "profile");
        assert!(view["errors"].as_object().unwrap().is_empty());
        assert!(view["banner"].is_null());

        fill_step2(&client, &base, &session).await;
        let view = send(&client, &base, &session, json!({"type": "submit"})).await;
        assert_eq!(view["completed"], "登録成功！（デモ用メッセージ）");
        assert!(view["html"].as_str().unwrap().contains("登録成功"));

        let bodies = received.lock().await;
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["email"], "a@b.co");
        assert_eq!(bodies[0]["gender"], "female");
        assert_eq!(bodies[0]["currentWeight"], "55.2");
        assert_eq!(bodies[0]["activityLevel"], "light");

        // registered sessions are discarded
        assert!(sessions.is_empty().await);
        let status = client
            .get(format!("{base}/api/signup/{session}"))
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn step1_blocked_until_consent() {
    timeout(TEST_TIMEOUT, async {
        let (backend, _) = start_backend(StatusCode::OK).await;
        let (base, _) = start_server(&backend).await;
        let client = reqwest::Client::new();
        let session = open_page(&client, &base).await;

        change(&client, &base, &session, "email", "a@b.co").await;
        change(&client, &base, &session, "password", "12345678").await;
        change(&client, &base, &session, "confirmPassword", "12345678").await;

        // consent is inert before the documents are read
        send(&client, &base, &session, json!({"type": "toggle_consent", "checked": true})).await;
        let view = send(&client, &base, &session, json!({"type": "next"})).await;
        assert_eq!(view["step"], "account");
        assert_eq!(view["banner"], "入力内容に問題があります。各項目を確認してください。");
        assert_eq!(view["errors"]["termsAccepted"], "利用規約に同意してください");

        let view = read_document(&client, &base, &session, "terms").await;
        assert_eq!(view["terms_read"], true);
        assert_eq!(view["both_read"], false);
        let view = read_document(&client, &base, &session, "privacy").await;
        assert_eq!(view["both_read"], true);
        assert!(view["errors"].get("termsAccepted").is_none());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn accept_without_scrolling_is_ignored() {
    timeout(TEST_TIMEOUT, async {
        let (backend, _) = start_backend(StatusCode::OK).await;
        let (base, _) = start_server(&backend).await;
        let client = reqwest::Client::new();
        let session = open_page(&client, &base).await;

        let view = send(&client, &base, &session, json!({"type": "open_document", "document": "terms"})).await;
        assert_eq!(view["open_document"], "terms");
        assert!(view["html"].as_str().unwrap().contains("同意するには最後までお読みください。"));

        let view = send(&client, &base, &session, json!({"type": "accept_document", "document": "terms"})).await;
        assert_eq!(view["terms_read"], false);
        assert_eq!(view["open_document"], "terms");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn blur_then_keystroke_clears_error() {
    timeout(TEST_TIMEOUT, async {
        let (backend, _) = start_backend(StatusCode::OK).await;
        let (base, _) = start_server(&backend).await;
        let client = reqwest::Client::new();
        let session = open_page(&client, &base).await;

        let view = send(&client, &base, &session, json!({"type": "blur", "field": "email"})).await;
        assert_eq!(view["errors"]["email"], "メールアドレスは必須です");

        let view = change(&client, &base, &session, "email", "a").await;
        assert!(view["errors"].get("email").is_none());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn backend_failure_keeps_session_on_step2() {
    timeout(TEST_TIMEOUT, async {
        let (backend, received) = start_backend(StatusCode::INTERNAL_SERVER_ERROR).await;
        let (base, sessions) = start_server(&backend).await;
        let client = reqwest::Client::new();
        let session = open_page(&client, &base).await;

        complete_step1(&client, &base, &session).await;
        fill_step2(&client, &base, &session).await;
        let view = send(&client, &base, &session, json!({"type": "submit"})).await;

        assert_eq!(view["step"], "profile");
        assert!(view["completed"].is_null());
        assert_eq!(view["banner"], "登録に失敗しました。時間をおいて再度お試しください。");
        assert_eq!(received.lock().await.len(), 1);
        assert_eq!(sessions.len().await, 1);

        // back keeps data and clears the banner
        let view = send(&client, &base, &session, json!({"type": "back"})).await;
        assert_eq!(view["step"], "account");
        assert!(view["banner"].is_null());
        assert!(view["html"].as_str().unwrap().contains(r#"value="a@b.co""#));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn invalid_step2_never_reaches_backend() {
    timeout(TEST_TIMEOUT, async {
        let (backend, received) = start_backend(StatusCode::OK).await;
        let (base, _) = start_server(&backend).await;
        let client = reqwest::Client::new();
        let session = open_page(&client, &base).await;

        complete_step1(&client, &base, &session).await;
        let view = send(&client, &base, &session, json!({"type": "submit"})).await;

        assert_eq!(view["errors"]["nickname"], "ニックネームは必須です");
        assert_eq!(view["errors"]["height"], "身長は必須です");
        assert!(view["errors"].get("activityLevel").is_none());
        assert!(received.lock().await.is_empty());
    })
    .await
    .expect("test timed out");
}
