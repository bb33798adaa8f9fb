use crate::backend::{FactorCheck, FactorUser, ResolvedSession, SessionFactors};
use crate::cookie::SessionCookie;

/// A session with a checked user factor.
pub(crate) fn session(
    id: &str,
    user_id: &str,
    login_name: &str,
    organization: Option<&str>,
) -> ResolvedSession {
    ResolvedSession {
        session_id: id.to_string(),
        factors: SessionFactors {
            user: Some(FactorUser {
                id: user_id.to_string(),
                login_name: Some(login_name.to_string()),
                display_name: None,
                organization_id: organization.map(str::to_string),
            }),
            password: Some(FactorCheck::default()),
            ..Default::default()
        },
        expiry: None,
    }
}

pub(crate) fn with_display_name(mut session: ResolvedSession, display_name: &str) -> ResolvedSession {
    if let Some(user) = session.factors.user.as_mut() {
        user.display_name = Some(display_name.to_string());
    }
    session
}

/// A cookie entry whose token is `token-{id}`.
pub(crate) fn cookie_entry(
    id: &str,
    login_name: &str,
    organization: Option<&str>,
    change_ts: i64,
) -> SessionCookie {
    SessionCookie {
        id: id.to_string(),
        token: format!("token-{id}"),
        login_name: login_name.to_string(),
        organization: organization.map(str::to_string),
        creation_ts: change_ts,
        expiration_ts: change_ts + 86_400_000,
        change_ts,
        request_id: None,
    }
}
