use async_trait::async_trait;

use super::errors::LookupError;
use super::types::{
    AuthMethods, IdentityProvider, LoginSettings, Organization, PasswordComplexity,
    ResolvedSession, SessionCookieRef,
};

/// Session operations of the identity backend.
#[async_trait]
pub trait SessionService: Send + Sync + 'static {
    /// Fetch one session. `Ok(None)` when the backend does not know it.
    async fn get_session(
        &self,
        session: &SessionCookieRef,
    ) -> Result<Option<ResolvedSession>, LookupError>;

    /// Fetch every session whose id is listed. Unknown ids are skipped.
    async fn list_sessions(&self, ids: &[String]) -> Result<Vec<ResolvedSession>, LookupError>;
}

/// The authentication method inventory: which factors a user has enrolled.
#[async_trait]
pub trait MethodInventory: Send + Sync + 'static {
    async fn list_auth_methods(&self, user_id: &str) -> Result<AuthMethods, LookupError>;
}

/// Organization-scoped settings of the identity backend.
///
/// `organization = None` asks for the instance-wide defaults.
#[async_trait]
pub trait SettingsService: Send + Sync + 'static {
    async fn login_settings(
        &self,
        organization: Option<&str>,
    ) -> Result<Option<LoginSettings>, LookupError>;

    async fn default_organization(&self) -> Result<Option<Organization>, LookupError>;

    async fn active_identity_providers(
        &self,
        organization: Option<&str>,
    ) -> Result<Vec<IdentityProvider>, LookupError>;

    async fn password_complexity(
        &self,
        organization: Option<&str>,
    ) -> Result<Option<PasswordComplexity>, LookupError>;
}

/// Session store lookup as seen by the context resolver.
///
/// Absence is `Ok(None)`; `Err` is reserved for collaborator faults.
#[async_trait]
pub trait SessionLookup: Send + Sync {
    /// Find the cookie entry for `session_id`, scoped to `organization` when given.
    async fn lookup_session_by_cookie(
        &self,
        session_id: &str,
        organization: Option<&str>,
    ) -> Result<Option<SessionCookieRef>, LookupError>;

    async fn resolve_session(
        &self,
        session_ref: &SessionCookieRef,
    ) -> Result<Option<ResolvedSession>, LookupError>;

    /// The most recently changed session for a login name and organization.
    async fn most_recent_session(
        &self,
        login_name: Option<&str>,
        organization: Option<&str>,
    ) -> Result<Option<ResolvedSession>, LookupError>;
}
