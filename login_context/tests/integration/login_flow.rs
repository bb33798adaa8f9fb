use std::sync::Arc;

use login_context::{
    AuthMethod, AuthMethods, CancellationToken, ContextError, ContextOutcome, IdentityHint,
    LoginFlow, LookupFailureCause, Notice, StepPlan,
};
use serde_json::json;

use crate::common::{MockIdentityServer, cookie_entry, jar, wire_session};

async fn seeded_server() -> MockIdentityServer {
    let server = MockIdentityServer::start().await;
    server.state.add_session(
        "tok-s2",
        wire_session("s2", "u1", "bob@example.com", "org1"),
    );
    server.state.set_auth_methods(
        "u1",
        &[
            "AUTHENTICATION_METHOD_TYPE_PASSWORD",
            "AUTHENTICATION_METHOD_TYPE_TOTP",
        ],
    );
    server
}

#[tokio::test]
async fn test_resolve_session_over_http() {
    // Given session s2 of user u1 with {Password, TOTP} enrolled
    let server = seeded_server().await;
    let flow = LoginFlow::from_backend(Arc::new(server.backend()));
    let resolver = flow.resolver(jar(vec![cookie_entry(
        "s2",
        "tok-s2",
        "bob@example.com",
        "org1",
        1,
    )]));

    // When resolving by session id
    let ctx = resolver
        .resolve(&IdentityHint::new().with_session_id("s2"))
        .await
        .unwrap();

    // Then exactly that inventory is available
    let expected: AuthMethods = [AuthMethod::Totp, AuthMethod::Password].into_iter().collect();
    assert_eq!(ctx.available_methods, expected);
    assert_eq!(
        ctx.display_identity.unwrap().display_name.as_deref(),
        Some("bob@example.com (display)")
    );
}

#[tokio::test]
async fn test_unknown_session_id_over_http_is_session_expired() {
    let server = seeded_server().await;
    let flow = LoginFlow::from_backend(Arc::new(server.backend()));
    let resolver = flow.resolver(jar(vec![cookie_entry(
        "s1",
        "tok-s1",
        "bob@example.com",
        "org1",
        1,
    )]));

    let result = resolver
        .resolve(&IdentityHint::new().with_session_id("s1"))
        .await;

    assert_eq!(
        result,
        Err(ContextError::LookupFailure {
            session_id: "s1".to_string(),
            cause: LookupFailureCause::NotFound,
        })
    );
    assert_eq!(
        ContextOutcome::from_resolution(result),
        ContextOutcome::SessionExpired {
            session_id: "s1".to_string()
        }
    );
}

#[tokio::test]
async fn test_login_name_without_session_over_http() {
    let server = seeded_server().await;
    let flow = LoginFlow::from_backend(Arc::new(server.backend()));

    let ctx = flow
        .resolver(jar(vec![]))
        .resolve(
            &IdentityHint::new()
                .with_login_name("bob@example.com")
                .with_organization("org1"),
        )
        .await
        .unwrap();

    assert!(ctx.session.is_none());
    assert!(!ctx.unknown_context);
    assert!(ctx.available_methods.is_empty());
    assert!(server.state.requests().is_empty());
}

#[tokio::test]
async fn test_inventory_outage_keeps_the_session() {
    // Given a resolvable session and an inventory that answers with an error
    let server = seeded_server().await;
    let flow = LoginFlow::from_backend(Arc::new(server.backend()));
    let resolver = flow.resolver(jar(vec![cookie_entry(
        "s2",
        "tok-s2",
        "bob@example.com",
        "org1",
        1,
    )]));
    let ctx = resolver
        .resolve(&IdentityHint::new().with_session_id("s2"))
        .await
        .unwrap();
    assert!(!ctx.available_methods.is_empty());

    // When only the inventory user is removed
    server.state.auth_methods.lock().unwrap().clear();
    let ctx = resolver
        .resolve(&IdentityHint::new().with_session_id("s2"))
        .await
        .unwrap();

    // Then the session stays and the methods are empty
    assert!(ctx.session.is_some());
    assert!(ctx.available_methods.is_empty());
}

#[tokio::test]
async fn test_mfa_and_password_pages_over_http() {
    let server = seeded_server().await;
    server.state.set_default_org("org1", "Org One");
    server.state.set_login_settings(json!({ "allowUsernamePassword": true }));
    let flow = LoginFlow::from_backend(Arc::new(server.backend()));
    let cookies = || {
        jar(vec![cookie_entry(
            "s2",
            "tok-s2",
            "bob@example.com",
            "org1",
            1,
        )])
    };
    let cancel = CancellationToken::new();

    let mfa = flow
        .mfa_step(&IdentityHint::new().with_session_id("s2"), cookies(), &cancel)
        .await
        .unwrap();
    let StepPlan::Show(mfa) = mfa else {
        panic!("expected an mfa page");
    };
    assert_eq!(mfa.chooser.unwrap().methods, vec![AuthMethod::Totp]);

    let password = flow
        .password_step(
            &IdentityHint::new().with_login_name("bob@example.com"),
            cookies(),
            &cancel,
        )
        .await
        .unwrap();
    assert!(password.notices.is_empty());
    assert!(password.form.is_some());

    let unknown = flow
        .password_step(&IdentityHint::new(), cookies(), &cancel)
        .await
        .unwrap();
    assert_eq!(unknown.notices, vec![Notice::UnknownContext]);
}
