use serde::{Deserialize, Serialize};

use crate::backend::SessionCookieRef;
use crate::utils::de_lenient_i64;

/// One entry of the session cookie.
///
/// Timestamps are milliseconds since the epoch; older cookies wrote them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub id: String,
    pub token: String,
    #[serde(default)]
    pub login_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_i64")]
    pub creation_ts: i64,
    #[serde(default, deserialize_with = "de_lenient_i64")]
    pub expiration_ts: i64,
    #[serde(default, deserialize_with = "de_lenient_i64")]
    pub change_ts: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl SessionCookie {
    pub fn session_ref(&self) -> SessionCookieRef {
        SessionCookieRef {
            id: self.id.clone(),
            token: self.token.clone(),
        }
    }

    /// Entries written before organizations existed match every organization.
    pub(crate) fn matches_organization(&self, organization: Option<&str>) -> bool {
        let stored = self.organization.as_deref().filter(|org| !org.is_empty());
        match (organization, stored) {
            (None, _) | (_, None) => true,
            (Some(wanted), Some(stored)) => wanted == stored,
        }
    }
}
