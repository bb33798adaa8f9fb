//! Axum-based mock of the identity platform's Connect-JSON endpoints
//!
//! Each test starts its own server on an ephemeral port, so tests never
//! share state.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use login_context::{HttpIdentityBackend, ServiceConfig};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use super::fixtures::SERVICE_TOKEN;

/// One request as seen by the mock
#[derive(Clone, Debug)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub authorization: Option<String>,
    pub protocol_version: Option<String>,
    pub tenant: Option<String>,
    pub body: Value,
}

/// Shared state for the mock server
#[derive(Clone, Default)]
pub struct MockIdentityState {
    /// session id -> (token, session json)
    pub sessions: Arc<Mutex<HashMap<String, (String, Value)>>>,
    /// user id -> AUTHENTICATION_METHOD_TYPE_* names
    pub auth_methods: Arc<Mutex<HashMap<String, Vec<String>>>>,
    pub login_settings: Arc<Mutex<Option<Value>>>,
    pub default_org: Arc<Mutex<Option<Value>>>,
    pub identity_providers: Arc<Mutex<Vec<Value>>>,
    pub password_complexity: Arc<Mutex<Option<Value>>>,
    /// When set every call answers with this status and raw body
    pub failure: Arc<Mutex<Option<(StatusCode, String)>>>,
    pub delay: Arc<Mutex<Option<Duration>>>,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockIdentityState {
    pub fn add_session(&self, token: &str, session: Value) {
        let id = session["id"].as_str().unwrap_or_default().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(id, (token.to_string(), session));
    }

    pub fn set_auth_methods(&self, user_id: &str, methods: &[&str]) {
        self.auth_methods.lock().unwrap().insert(
            user_id.to_string(),
            methods.iter().map(|m| m.to_string()).collect(),
        );
    }

    pub fn set_login_settings(&self, settings: Value) {
        *self.login_settings.lock().unwrap() = Some(settings);
    }

    pub fn set_default_org(&self, id: &str, name: &str) {
        *self.default_org.lock().unwrap() = Some(json!({ "id": id, "name": name }));
    }

    pub fn set_password_complexity(&self, settings: Value) {
        *self.password_complexity.lock().unwrap() = Some(settings);
    }

    pub fn fail_with(&self, status: StatusCode, body: &str) {
        *self.failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

pub struct MockIdentityServer {
    pub base_url: String,
    pub state: MockIdentityState,
    _handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl MockIdentityServer {
    pub async fn start() -> Self {
        let state = MockIdentityState::default();
        let app = create_mock_app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock identity server");
        let addr = listener.local_addr().expect("Failed to read local address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                println!("Mock identity server error: {e}");
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            _handle: handle,
        }
    }

    pub fn config(&self) -> ServiceConfig {
        ServiceConfig::new(&self.base_url)
            .expect("Mock url is valid")
            .with_service_token(SERVICE_TOKEN)
            .with_custom_headers("x-zitadel-tenant:acme")
    }

    pub fn backend(&self) -> HttpIdentityBackend {
        HttpIdentityBackend::new(self.config()).expect("Failed to build backend")
    }
}

fn create_mock_app(state: MockIdentityState) -> Router {
    Router::new()
        .route(
            "/zitadel.session.v2.SessionService/GetSession",
            post(get_session),
        )
        .route(
            "/zitadel.session.v2.SessionService/ListSessions",
            post(list_sessions),
        )
        .route(
            "/zitadel.user.v2.UserService/ListAuthenticationMethodTypes",
            post(list_auth_method_types),
        )
        .route(
            "/zitadel.settings.v2.SettingsService/GetLoginSettings",
            post(get_login_settings),
        )
        .route(
            "/zitadel.settings.v2.SettingsService/GetActiveIdentityProviders",
            post(get_active_identity_providers),
        )
        .route(
            "/zitadel.settings.v2.SettingsService/GetPasswordComplexitySettings",
            post(get_password_complexity),
        )
        .route(
            "/zitadel.org.v2.OrganizationService/ListOrganizations",
            post(list_organizations),
        )
        .with_state(state)
}

type MockResponse = (StatusCode, String);

fn ok(body: Value) -> MockResponse {
    (StatusCode::OK, body.to_string())
}

fn connect_error(status: StatusCode, code: &str, message: &str) -> MockResponse {
    (
        status,
        json!({ "code": code, "message": message }).to_string(),
    )
}

/// Record the request; answer with the configured failure if there is one.
async fn enter(
    state: &MockIdentityState,
    method: &'static str,
    headers: &HeaderMap,
    body: &Value,
) -> Option<MockResponse> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        authorization: header("authorization"),
        protocol_version: header("connect-protocol-version"),
        tenant: header("x-zitadel-tenant"),
        body: body.clone(),
    });

    let delay = *state.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    state.failure.lock().unwrap().clone()
}

async fn get_session(
    State(state): State<MockIdentityState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> MockResponse {
    if let Some(failure) = enter(&state, "GetSession", &headers, &body).await {
        return failure;
    }
    let id = body["sessionId"].as_str().unwrap_or_default();
    let token = body["sessionToken"].as_str().unwrap_or_default();

    let sessions = state.sessions.lock().unwrap();
    match sessions.get(id) {
        Some((stored, session)) if stored == token => ok(json!({ "session": session })),
        Some(_) => connect_error(
            StatusCode::FORBIDDEN,
            "permission_denied",
            "session token invalid",
        ),
        None => connect_error(StatusCode::NOT_FOUND, "not_found", "session not found"),
    }
}

async fn list_sessions(
    State(state): State<MockIdentityState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> MockResponse {
    if let Some(failure) = enter(&state, "ListSessions", &headers, &body).await {
        return failure;
    }
    let ids: Vec<String> = body["queries"][0]["idsQuery"]["ids"]
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let sessions = state.sessions.lock().unwrap();
    let found: Vec<Value> = ids
        .iter()
        .filter_map(|id| sessions.get(id).map(|(_, s)| s.clone()))
        .collect();
    ok(json!({ "details": { "totalResult": found.len().to_string() }, "sessions": found }))
}

async fn list_auth_method_types(
    State(state): State<MockIdentityState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> MockResponse {
    if let Some(failure) = enter(&state, "ListAuthenticationMethodTypes", &headers, &body).await {
        return failure;
    }
    let user_id = body["userId"].as_str().unwrap_or_default();
    match state.auth_methods.lock().unwrap().get(user_id) {
        Some(methods) => ok(json!({ "authMethodTypes": methods })),
        None => connect_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
    }
}

async fn get_login_settings(
    State(state): State<MockIdentityState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> MockResponse {
    if let Some(failure) = enter(&state, "GetLoginSettings", &headers, &body).await {
        return failure;
    }
    let settings = state.login_settings.lock().unwrap().clone();
    ok(json!({ "settings": settings }))
}

async fn get_active_identity_providers(
    State(state): State<MockIdentityState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> MockResponse {
    if let Some(failure) = enter(&state, "GetActiveIdentityProviders", &headers, &body).await {
        return failure;
    }
    let providers = state.identity_providers.lock().unwrap().clone();
    ok(json!({ "identityProviders": providers }))
}

async fn get_password_complexity(
    State(state): State<MockIdentityState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> MockResponse {
    if let Some(failure) = enter(&state, "GetPasswordComplexitySettings", &headers, &body).await {
        return failure;
    }
    let settings = state.password_complexity.lock().unwrap().clone();
    ok(json!({ "settings": settings }))
}

async fn list_organizations(
    State(state): State<MockIdentityState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> MockResponse {
    if let Some(failure) = enter(&state, "ListOrganizations", &headers, &body).await {
        return failure;
    }
    let result: Vec<Value> = state.default_org.lock().unwrap().clone().into_iter().collect();
    ok(json!({ "result": result }))
}
