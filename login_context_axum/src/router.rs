//! Router for the login flow's step endpoints

use std::sync::Arc;

use axum::{Router, routing::get};
use login_context::LoginFlow;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers;

/// Create the router of every login step
///
/// The endpoints are relative to where the router is mounted:
/// - /login (redirects to /loginname)
/// - /loginname, /password, /passkey, /mfa, /accounts
/// - /register/password
///
/// Each step answers with its plan as JSON.
pub fn login_flow_router(flow: LoginFlow) -> Router {
    login_flow_router_no_trace(flow).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as `login_flow_router()` but without the HTTP tracing middleware
pub fn login_flow_router_no_trace(flow: LoginFlow) -> Router {
    Router::new()
        .route("/login", get(handlers::login))
        .route("/loginname", get(handlers::login_name))
        .route("/password", get(handlers::password))
        .route("/passkey", get(handlers::passkey))
        .route("/mfa", get(handlers::mfa))
        .route("/accounts", get(handlers::accounts))
        .route("/register/password", get(handlers::register_password))
        .with_state(Arc::new(flow))
}
