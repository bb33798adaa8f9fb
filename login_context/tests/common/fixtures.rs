use login_context::{SessionCookie, SessionCookieJar};
use serde_json::{Value, json};

pub const SERVICE_TOKEN: &str = "test-service-token";

/// Session as the identity platform returns it from GetSession.
pub fn wire_session(id: &str, user_id: &str, login_name: &str, organization: &str) -> Value {
    json!({
        "id": id,
        "creationDate": "2025-01-01T10:00:00Z",
        "changeDate": "2025-01-01T10:00:05Z",
        "factors": {
            "user": {
                "verifiedAt": "2025-01-01T10:00:00Z",
                "id": user_id,
                "loginName": login_name,
                "displayName": format!("{login_name} (display)"),
                "organizationId": organization
            },
            "password": { "verifiedAt": "2025-01-01T10:00:05Z" }
        },
        "expirationDate": "2099-01-01T10:00:00Z"
    })
}

pub fn cookie_entry(id: &str, token: &str, login_name: &str, organization: &str, change_ts: i64) -> SessionCookie {
    SessionCookie {
        id: id.to_string(),
        token: token.to_string(),
        login_name: login_name.to_string(),
        organization: Some(organization.to_string()),
        creation_ts: change_ts,
        expiration_ts: change_ts + 3_600_000,
        change_ts,
        request_id: None,
    }
}

pub fn jar(entries: Vec<SessionCookie>) -> SessionCookieJar {
    SessionCookieJar::new(entries)
}
