//! The registration page and its event endpoints.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::controller::{Applied, FormEvent, SignupForm, SubmitOutcome};
use super::model::SignupRequest;
use super::view::{FormView, render_page};
use crate::api::SignupApi;
use crate::config::DEFAULT_SESSION_TTL;
use crate::error::{ApiError, Error, FormError};
use crate::templates::PageTemplates;

/// How often idle sessions are swept.
pub const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Session {
    form: SignupForm,
    last_seen: Instant,
}

impl Session {
    fn touch(&mut self) -> &mut SignupForm {
        self.last_seen = Instant::now();
        &mut self.form
    }
}

/// In-memory page sessions, one `SignupForm` each.
///
/// Events for a session are applied while holding the write lock; the lock
/// is never held across the signup HTTP call. Callers get a copy of the
/// form to render from.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Arc<Self> {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    /// Store whose sessions expire after `ttl` without events.
    pub fn with_ttl(ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        })
    }

    /// Start a new session.
    pub async fn create(&self) -> (Uuid, SignupForm) {
        let id = Uuid::new_v4();
        let form = SignupForm::new();
        self.sessions.write().await.insert(
            id,
            Session {
                form: form.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(session = %id, "Signup session started");
        (id, form)
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<SignupForm, FormError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(FormError::SessionNotFound(id))?;
        Ok(session.touch().clone())
    }

    /// Apply one event. Returns the updated form and, for a validated
    /// submit, the request the caller must send.
    pub async fn apply(
        &self,
        id: Uuid,
        event: FormEvent,
    ) -> Result<(SignupForm, Option<SignupRequest>), FormError> {
        let mut sessions = self.sessions.write().await;
        let form = sessions
            .get_mut(&id)
            .ok_or(FormError::SessionNotFound(id))?
            .touch();
        let request = match form.apply(event)? {
            Applied::Updated => None,
            Applied::SubmissionReady(request) => Some(request),
        };
        Ok((form.clone(), request))
    }

    /// Record the signup result. A registered session is discarded.
    pub async fn complete(
        &self,
        id: Uuid,
        result: Result<serde_json::Value, ApiError>,
    ) -> Result<(SignupForm, SubmitOutcome), FormError> {
        let mut sessions = self.sessions.write().await;
        let form = sessions
            .get_mut(&id)
            .ok_or(FormError::SessionNotFound(id))?
            .touch();
        let outcome = form.complete_submission(result);
        let form = form.clone();
        if outcome == SubmitOutcome::Registered {
            sessions.remove(&id);
            info!(session = %id, "Signup session completed");
        }
        Ok((form, outcome))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop sessions idle for longer than the TTL.
    /// Sessions waiting on the signup call are kept.
    /// Returns the number of sessions dropped.
    pub async fn expire_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = session.form.is_submitting() || session.last_seen.elapsed() < self.ttl;
            if !keep {
                debug!(session = %id, "Signup session expired");
            }
            keep
        });

        let expired = before - sessions.len();
        if expired > 0 {
            info!(count = expired, "Expired idle signup sessions");
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Spawn a background task that periodically drops idle sessions.
pub fn spawn_expiry_task(store: Arc<SessionStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EXPIRY_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            store.expire_idle().await;
        }
    })
}

/// Shared state for the signup routes.
#[derive(Clone)]
pub struct SignupRouteState {
    pub sessions: Arc<SessionStore>,
    pub api: Arc<dyn SignupApi>,
    pub templates: Arc<PageTemplates>,
}

fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::Form(FormError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
        Error::Form(FormError::UnknownField(_) | FormError::UnknownDocument(_)) => {
            StatusCode::BAD_REQUEST
        }
        _ => {
            error!(error = %err, "Signup request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

fn view_response(state: &SignupRouteState, id: Uuid, form: &SignupForm) -> Response {
    match FormView::new(&state.templates, id, form) {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// GET /
///
/// Serves the registration page for a fresh session.
async fn index(State(state): State<SignupRouteState>) -> Response {
    let (id, form) = state.sessions.create().await;
    match render_page(&state.templates, id, &form) {
        Ok(page) => Html(page).into_response(),
        Err(e) => error_response(e.into()),
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "weight-signup"
    }))
}

/// GET /api/signup/{id}
async fn get_session(
    State(state): State<SignupRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.sessions.snapshot(id).await {
        Ok(form) => view_response(&state, id, &form),
        Err(e) => error_response(e.into()),
    }
}

/// POST /api/signup/{id}/events
///
/// Applies one UI event. A validated `submit` calls the signup API with
/// the session unlocked and returns the view after the result is applied.
/// A submit arriving while another is in flight just returns the current
/// view.
async fn post_event(
    State(state): State<SignupRouteState>,
    Path(id): Path<Uuid>,
    Json(event): Json<FormEvent>,
) -> Response {
    debug!(session = %id, event = event_kind(&event), "Signup event");

    let (form, request) = match state.sessions.apply(id, event).await {
        Ok(applied) => applied,
        Err(e) => {
            warn!(session = %id, error = %e, "Rejected signup event");
            return error_response(e.into());
        }
    };

    let Some(request) = request else {
        return view_response(&state, id, &form);
    };

    let result = state.api.signup(&request).await;
    match state.sessions.complete(id, result).await {
        Ok((form, _outcome)) => view_response(&state, id, &form),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE /api/signup/{id}
async fn delete_session(
    State(state): State<SignupRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    if state.sessions.remove(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(FormError::SessionNotFound(id).into())
    }
}

/// Event name only; values may contain passwords.
fn event_kind(event: &FormEvent) -> &'static str {
    match event {
        FormEvent::Change { .. } => "change",
        FormEvent::Blur { .. } => "blur",
        FormEvent::ToggleConsent { .. } => "toggle_consent",
        FormEvent::OpenDocument { .. } => "open_document",
        FormEvent::CloseDocument { .. } => "close_document",
        FormEvent::ScrollDocument { .. } => "scroll_document",
        FormEvent::AcceptDocument { .. } => "accept_document",
        FormEvent::Next => "next",
        FormEvent::Back => "back",
        FormEvent::Submit => "submit",
    }
}

/// Build the page and event routes.
pub fn signup_routes(state: SignupRouteState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/signup/{id}", get(get_session).delete(delete_session))
        .route("/api/signup/{id}/events", post(post_event))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::acknowledgment::ScrollMetrics;
    use crate::signup::FormStep;

    /// Accepts every registration after `delay`, counting calls.
    #[derive(Default)]
    struct CountingApi {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl SignupApi for CountingApi {
        async fn signup(&self, _request: &SignupRequest) -> Result<serde_json::Value, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(serde_json::Value::Null)
        }
    }

    fn state_with(api: Arc<CountingApi>) -> SignupRouteState {
        SignupRouteState {
            sessions: SessionStore::new(),
            api,
            templates: Arc::new(PageTemplates::new().unwrap()),
        }
    }

    fn state() -> SignupRouteState {
        state_with(Arc::new(CountingApi::default()))
    }

    async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn change(field: &str, value: &str) -> FormEvent {
        FormEvent::Change {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Drive a session to a valid, filled-in profile step.
    async fn fill_session(store: &SessionStore, id: Uuid) {
        for (field, value) in [
            ("email", "a@b.co"),
            ("password", "12345678"),
            ("confirmPassword", "12345678"),
        ] {
            store.apply(id, change(field, value)).await.unwrap();
        }
        for document in ["terms", "privacy"] {
            let document = document.to_string();
            store
                .apply(id, FormEvent::OpenDocument { document: document.clone() })
                .await
                .unwrap();
            store
                .apply(
                    id,
                    FormEvent::ScrollDocument {
                        document: document.clone(),
                        metrics: ScrollMetrics {
                            scroll_top: 100.0,
                            scroll_height: 400.0,
                            client_height: 300.0,
                        },
                    },
                )
                .await
                .unwrap();
            store.apply(id, FormEvent::AcceptDocument { document }).await.unwrap();
        }
        store.apply(id, FormEvent::ToggleConsent { checked: true }).await.unwrap();
        let (form, _) = store.apply(id, FormEvent::Next).await.unwrap();
        assert_eq!(form.step(), FormStep::Profile);

        for (field, value) in [
            ("nickname", "たろう"),
            ("gender", "male"),
            ("birthdate", "1990-04-01"),
            ("height", "172"),
            ("currentWeight", "70.5"),
            ("targetWeight", "65"),
        ] {
            store.apply(id, change(field, value)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn index_creates_session() {
        let state = state();
        let app = signup_routes(state.clone());

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.sessions.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let app = signup_routes(state());
        let uri = format!("/api/signup/{}/events", Uuid::new_v4());
        let (status, json) = post_json(&app, &uri, json!({"type": "next"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn unknown_field_is_400() {
        let state = state();
        let (id, _) = state.sessions.create().await;
        let app = signup_routes(state);
        let uri = format!("/api/signup/{id}/events");
        let (status, _) = post_json(&app, &uri, json!({"type": "blur", "field": "age"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_document_is_400() {
        let state = state();
        let (id, _) = state.sessions.create().await;
        let app = signup_routes(state);
        let uri = format!("/api/signup/{id}/events");
        let (status, json) =
            post_json(&app, &uri, json!({"type": "open_document", "document": "cookies"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Form error: Unknown document: cookies");
    }

    #[tokio::test]
    async fn store_applies_events_and_removes_registered_sessions() {
        let store = SessionStore::new();
        let (id, _) = store.create().await;
        fill_session(&store, id).await;

        let (form, request) = store.apply(id, FormEvent::Submit).await.unwrap();
        assert!(request.is_some());
        assert!(form.is_submitting());

        let (form, outcome) = store.complete(id, Ok(serde_json::Value::Null)).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Registered);
        assert!(form.is_completed());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn overlapping_submits_send_one_registration() {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
            delay: Duration::from_millis(100),
        });
        let state = state_with(Arc::clone(&api));
        let (id, _) = state.sessions.create().await;
        fill_session(&state.sessions, id).await;

        let app = signup_routes(state.clone());
        let uri = format!("/api/signup/{id}/events");
        let ((first_status, first), (second_status, second)) = tokio::join!(
            post_json(&app, &uri, json!({"type": "submit"})),
            post_json(&app, &uri, json!({"type": "submit"})),
        );

        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first_status, StatusCode::OK);
        assert_eq!(second_status, StatusCode::OK);

        let (done, pending) = if first["completed"].is_null() {
            (second, first)
        } else {
            (first, second)
        };
        assert_eq!(done["completed"], "登録成功！（デモ用メッセージ）");
        assert_eq!(pending["submitting"], true);
        assert!(pending["completed"].is_null());
        assert!(state.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::with_ttl(Duration::from_millis(500));
        for _ in 0..1000 {
            store.create().await;
        }
        assert_eq!(store.expire_idle().await, 0);
        assert_eq!(store.len().await, 1000);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let (fresh, _) = store.create().await;

        assert_eq!(store.expire_idle().await, 1000);
        assert_eq!(store.len().await, 1);
        assert!(store.snapshot(fresh).await.is_ok());
    }

    #[tokio::test]
    async fn events_keep_a_session_alive() {
        let store = SessionStore::with_ttl(Duration::from_millis(150));
        let (active, _) = store.create().await;
        let (abandoned, _) = store.create().await;

        tokio::time::sleep(Duration::from_millis(90)).await;
        store.apply(active, change("email", "a@b.co")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(90)).await;

        assert_eq!(store.expire_idle().await, 1);
        assert!(store.snapshot(active).await.is_ok());
        assert!(matches!(
            store.snapshot(abandoned).await,
            Err(FormError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn in_flight_session_survives_expiry() {
        let store = SessionStore::with_ttl(Duration::from_millis(20));
        let (id, _) = store.create().await;
        fill_session(&store, id).await;
        store.apply(id, FormEvent::Submit).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.expire_idle().await, 0);
        assert!(store.complete(id, Ok(serde_json::Value::Null)).await.is_ok());
    }

    #[tokio::test]
    async fn delete_session_twice() {
        let state = state();
        let (id, _) = state.sessions.create().await;
        let app = signup_routes(state);
        let uri = format!("/api/signup/{id}");

        let first = app
            .clone()
            .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::NO_CONTENT);

        let second = app
            .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }
}
