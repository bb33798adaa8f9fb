use serde::{Deserialize, Serialize};

use crate::backend::{AuthMethods, ResolvedSession};
use crate::utils::{de_flag, non_empty};

/// Caller-supplied identifiers carried across login steps in the query string.
///
/// Untrusted: nothing here is taken as proof of identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityHint {
    #[serde(default)]
    pub login_name: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub alt_password: bool,
}

impl IdentityHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login_name(mut self, login_name: impl Into<String>) -> Self {
        self.login_name = Some(login_name.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_alt_password(mut self, alt_password: bool) -> Self {
        self.alt_password = alt_password;
        self
    }

    /// Trim every identifier; blank ones become absent.
    pub fn normalized(self) -> Self {
        Self {
            login_name: non_empty(self.login_name),
            session_id: non_empty(self.session_id),
            organization: non_empty(self.organization),
            request_id: non_empty(self.request_id),
            alt_password: self.alt_password,
        }
    }
}

/// Who the page should greet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayIdentity {
    pub login_name: Option<String>,
    pub display_name: Option<String>,
}

/// Per-request snapshot of who is logging in and what they can prove.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub session: Option<ResolvedSession>,
    pub available_methods: AuthMethods,
    pub display_identity: Option<DisplayIdentity>,
    pub unknown_context: bool,
    /// Effective organization: the session's own, else the hinted one.
    pub organization: Option<String>,
}

impl AuthContext {
    /// Nothing is known about the user.
    pub fn unknown() -> Self {
        Self {
            unknown_context: true,
            ..Default::default()
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref()?.user_id()
    }

    pub fn login_name(&self) -> Option<&str> {
        self.display_identity.as_ref()?.login_name.as_deref()
    }
}

/// What to do when the hinted organization differs from the session's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrgConflictPolicy {
    /// The resolved session wins; the hint only routed the lookup.
    #[default]
    PreferSession,
    /// Treat the mismatch as an invalid hint.
    Reject,
}
