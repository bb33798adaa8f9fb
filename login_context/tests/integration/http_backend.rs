use std::time::Duration;

use axum::http::StatusCode;
use login_context::{
    AuthMethod, HttpIdentityBackend, LookupError, MethodInventory, RpcCode, ServiceConfig,
    SessionCookieRef, SessionService, SettingsService,
};
use serde_json::json;

use crate::common::{MockIdentityServer, SERVICE_TOKEN, wire_session};

fn session_ref(id: &str, token: &str) -> SessionCookieRef {
    SessionCookieRef {
        id: id.to_string(),
        token: token.to_string(),
    }
}

#[tokio::test]
async fn test_get_session_sends_credentials_and_decodes() {
    // Given a session known to the identity platform
    let server = MockIdentityServer::start().await;
    server
        .state
        .add_session("tok-s2", wire_session("s2", "u1", "bob@example.com", "org1"));
    let backend = server.backend();

    // When fetching it
    let session = backend
        .get_session(&session_ref("s2", "tok-s2"))
        .await
        .expect("GetSession should succeed")
        .expect("Session should exist");

    // Then the session is decoded
    assert_eq!(session.session_id, "s2");
    assert_eq!(session.user_id(), Some("u1"));
    assert_eq!(session.login_name(), Some("bob@example.com"));
    assert_eq!(session.organization_id(), Some("org1"));
    assert!(session.factors.password.is_some());

    // And the request carried the service token, protocol and custom headers
    let requests = server.state.requests_to("GetSession");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {SERVICE_TOKEN}").as_str())
    );
    assert_eq!(request.protocol_version.as_deref(), Some("1"));
    assert_eq!(request.tenant.as_deref(), Some("acme"));
    assert_eq!(
        request.body,
        json!({ "sessionId": "s2", "sessionToken": "tok-s2" })
    );
}

#[tokio::test]
async fn test_get_session_not_found_is_absent() {
    let server = MockIdentityServer::start().await;
    let backend = server.backend();

    let session = backend
        .get_session(&session_ref("missing", "tok"))
        .await
        .unwrap();

    assert!(session.is_none());
}

#[tokio::test]
async fn test_get_session_wrong_token_is_permission_denied() {
    let server = MockIdentityServer::start().await;
    server
        .state
        .add_session("tok-s2", wire_session("s2", "u1", "bob", "org1"));

    let err = server
        .backend()
        .get_session(&session_ref("s2", "stolen"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LookupError::Rpc {
            code: RpcCode::PermissionDenied,
            message: "session token invalid".to_string(),
        }
    );
}

#[tokio::test]
async fn test_list_sessions_and_empty_ids() {
    let server = MockIdentityServer::start().await;
    server
        .state
        .add_session("t1", wire_session("s1", "u1", "alice", "org1"));
    server
        .state
        .add_session("t2", wire_session("s2", "u2", "bob", "org1"));
    let backend = server.backend();

    let sessions = backend
        .list_sessions(&["s2".to_string(), "gone".to_string()])
        .await
        .unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_id, "s2");

    // no ids, no call
    assert!(backend.list_sessions(&[]).await.unwrap().is_empty());
    assert_eq!(server.state.requests_to("ListSessions").len(), 1);
}

#[tokio::test]
async fn test_list_auth_methods() {
    let server = MockIdentityServer::start().await;
    server.state.set_auth_methods(
        "u1",
        &[
            "AUTHENTICATION_METHOD_TYPE_PASSWORD",
            "AUTHENTICATION_METHOD_TYPE_TOTP",
        ],
    );
    let backend = server.backend();

    let methods = backend.list_auth_methods("u1").await.unwrap();
    assert_eq!(
        methods.into_iter().collect::<Vec<_>>(),
        vec![AuthMethod::Password, AuthMethod::Totp]
    );

    // unknown user: not_found is an empty inventory
    assert!(backend.list_auth_methods("u9").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_settings_calls() {
    // Given settings, a default organization and a password policy
    let server = MockIdentityServer::start().await;
    server.state.set_login_settings(json!({
        "allowUsernamePassword": true,
        "allowRegister": true,
        "disableLoginWithPhone": true
    }));
    server.state.set_default_org("org-default", "Default Org");
    server.state.set_password_complexity(json!({
        "minLength": "12",
        "requiresNumber": true
    }));
    let backend = server.backend();

    // When reading them
    let settings = backend.login_settings(Some("org1")).await.unwrap().unwrap();
    let org = backend.default_organization().await.unwrap().unwrap();
    let complexity = backend.password_complexity(None).await.unwrap().unwrap();
    let providers = backend.active_identity_providers(None).await.unwrap();

    // Then they are decoded
    assert!(settings.allow_register);
    assert!(settings.disable_login_with_phone);
    assert!(!settings.ignore_unknown_usernames);
    assert_eq!(org.id, "org-default");
    assert_eq!(complexity.min_length, 12);
    assert!(complexity.has_number);
    assert!(providers.is_empty());

    // And settings requests are scoped by organization or instance
    assert_eq!(
        server.state.requests_to("GetLoginSettings")[0].body,
        json!({ "ctx": { "orgId": "org1" } })
    );
    assert_eq!(
        server.state.requests_to("GetPasswordComplexitySettings")[0].body,
        json!({ "ctx": { "instance": true } })
    );
}

#[tokio::test]
async fn test_connect_error_body_is_decoded() {
    let server = MockIdentityServer::start().await;
    server.state.fail_with(
        StatusCode::SERVICE_UNAVAILABLE,
        r#"{"code":"unavailable","message":"maintenance"}"#,
    );

    let err = server.backend().login_settings(None).await.unwrap_err();

    assert_eq!(err.code(), RpcCode::Unavailable);
    assert_eq!(err.to_string(), "Rpc error (unavailable): maintenance");
}

#[tokio::test]
async fn test_error_without_body_uses_http_status() {
    let server = MockIdentityServer::start().await;
    server.state.fail_with(StatusCode::UNAUTHORIZED, "nope");

    let err = server.backend().default_organization().await.unwrap_err();

    assert_eq!(
        err,
        LookupError::Rpc {
            code: RpcCode::Unauthenticated,
            message: "nope".to_string(),
        }
    );
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockIdentityServer::start().await;
    server.state.set_delay(Duration::from_secs(5));
    let backend =
        HttpIdentityBackend::new(server.config().with_timeout(Duration::from_millis(100))).unwrap();

    let err = backend.list_auth_methods("u1").await.unwrap_err();

    assert!(matches!(err, LookupError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Given a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend =
        HttpIdentityBackend::new(ServiceConfig::new(&format!("http://{addr}")).unwrap()).unwrap();

    let err = backend.default_organization().await.unwrap_err();
    assert!(matches!(err, LookupError::Transport(_)), "got {err:?}");
}
