use std::sync::Arc;

use axum::{Router, response::Redirect, routing::get};
use dotenvy::dotenv;

use login_context::{
    AuthMethod, FactorCheck, FactorUser, HttpIdentityBackend, InMemoryIdentityBackend,
    LoginSettings, Organization, PasswordComplexity, ResolvedSession, ServiceConfig,
    SessionFactors,
};
use login_context_axum::{LOGIN_ROUTE_PREFIX, LoginFlow, login_flow_router};

mod server;
use server::{init_tracing, spawn_http_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing("demo-login");

    let prefix = LOGIN_ROUTE_PREFIX.as_str();
    let flow = match std::env::var("IDENTITY_BASE_URL") {
        Ok(_) => {
            let backend = HttpIdentityBackend::new(ServiceConfig::from_env()?)?;
            tracing::info!("Using identity backend at {}", backend.config().base_url);
            LoginFlow::from_backend(Arc::new(backend))
        }
        Err(_) => {
            tracing::info!("IDENTITY_BASE_URL not set, serving demo data from memory");
            LoginFlow::from_backend(Arc::new(demo_backend()))
        }
    }
    .with_base_path(prefix);

    let login_url = format!("{prefix}/login");
    let app = Router::new()
        .route("/", get(move || async move { Redirect::to(&login_url) }))
        .nest(prefix, login_flow_router(flow));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    let http_server = spawn_http_server(port, app).await?;
    http_server.await?;
    Ok(())
}

/// One organization and one user with a password and TOTP.
///
/// The user's session is `demo-session` with token `demo-token`; a cookie
/// holding that entry resolves it.
fn demo_backend() -> InMemoryIdentityBackend {
    let session = ResolvedSession {
        session_id: "demo-session".to_string(),
        factors: SessionFactors {
            user: Some(FactorUser {
                id: "demo-user".to_string(),
                login_name: Some("demo@example.com".to_string()),
                display_name: Some("Demo User".to_string()),
                organization_id: Some("demo-org".to_string()),
            }),
            password: Some(FactorCheck {
                verified_at: Some(chrono::Utc::now()),
            }),
            ..Default::default()
        },
        expiry: None,
    };

    InMemoryIdentityBackend::new()
        .with_default_organization(Organization {
            id: "demo-org".to_string(),
            name: "Demo".to_string(),
        })
        .with_login_settings(
            None,
            LoginSettings {
                allow_username_password: true,
                allow_register: true,
                ..Default::default()
            },
        )
        .with_password_complexity(PasswordComplexity {
            min_length: 8,
            has_number: true,
            ..Default::default()
        })
        .with_session("demo-token", session)
        .with_auth_methods("demo-user", [AuthMethod::Password, AuthMethod::Totp])
}
