use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::errors::{LookupError, RpcCode};
use super::traits::{MethodInventory, SessionService, SettingsService};
use super::types::{
    AuthMethod, AuthMethods, IdentityProvider, LoginSettings, Organization, PasswordComplexity,
    ResolvedSession, SessionCookieRef,
};

/// Backend operations, used to inject failures and to inspect calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetSession,
    ListSessions,
    ListAuthMethods,
    LoginSettings,
    DefaultOrganization,
    IdentityProviders,
    PasswordComplexity,
}

struct StoredSession {
    token: String,
    session: ResolvedSession,
}

/// Identity backend held entirely in memory.
///
/// Configured up front with the `with_*` builders, then shared read-only.
/// Used by the tests and by the demo server when no backend url is set.
#[derive(Default)]
pub struct InMemoryIdentityBackend {
    sessions: HashMap<String, StoredSession>,
    methods: HashMap<String, AuthMethods>,
    login_settings: HashMap<Option<String>, LoginSettings>,
    default_organization: Option<Organization>,
    identity_providers: HashMap<Option<String>, Vec<IdentityProvider>>,
    password_complexity: Option<PasswordComplexity>,
    failures: HashMap<Operation, LookupError>,
    latency: Option<Duration>,
    calls: Mutex<HashMap<Operation, usize>>,
}

impl InMemoryIdentityBackend {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory identity backend");
        Self::default()
    }

    pub fn with_session(mut self, token: impl Into<String>, session: ResolvedSession) -> Self {
        self.sessions.insert(
            session.session_id.clone(),
            StoredSession {
                token: token.into(),
                session,
            },
        );
        self
    }

    pub fn with_auth_methods(
        mut self,
        user_id: impl Into<String>,
        methods: impl IntoIterator<Item = AuthMethod>,
    ) -> Self {
        self.methods
            .insert(user_id.into(), methods.into_iter().collect());
        self
    }

    pub fn with_login_settings(mut self, organization: Option<&str>, settings: LoginSettings) -> Self {
        self.login_settings
            .insert(organization.map(str::to_string), settings);
        self
    }

    pub fn with_default_organization(mut self, organization: Organization) -> Self {
        self.default_organization = Some(organization);
        self
    }

    pub fn with_identity_providers(
        mut self,
        organization: Option<&str>,
        providers: Vec<IdentityProvider>,
    ) -> Self {
        self.identity_providers
            .insert(organization.map(str::to_string), providers);
        self
    }

    pub fn with_password_complexity(mut self, complexity: PasswordComplexity) -> Self {
        self.password_complexity = Some(complexity);
        self
    }

    /// Make every call of `operation` fail with `error`.
    pub fn with_failure(mut self, operation: Operation, error: LookupError) -> Self {
        self.failures.insert(operation, error);
        self
    }

    /// Delay every call, to exercise cancellation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of calls of `operation` so far.
    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(&operation).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Number of calls of any operation so far.
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.values().sum())
            .unwrap_or_default()
    }

    async fn enter(&self, operation: Operation) -> Result<(), LookupError> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(operation).or_default() += 1;
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.failures.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SessionService for InMemoryIdentityBackend {
    async fn get_session(
        &self,
        session: &SessionCookieRef,
    ) -> Result<Option<ResolvedSession>, LookupError> {
        self.enter(Operation::GetSession).await?;
        match self.sessions.get(&session.id) {
            Some(stored) if stored.token == session.token => Ok(Some(stored.session.clone())),
            Some(_) => Err(LookupError::rpc(
                RpcCode::PermissionDenied,
                "session token does not match",
            )),
            None => Ok(None),
        }
    }

    async fn list_sessions(&self, ids: &[String]) -> Result<Vec<ResolvedSession>, LookupError> {
        self.enter(Operation::ListSessions).await?;
        Ok(ids
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .map(|stored| stored.session.clone())
            .collect())
    }
}

#[async_trait]
impl MethodInventory for InMemoryIdentityBackend {
    async fn list_auth_methods(&self, user_id: &str) -> Result<AuthMethods, LookupError> {
        self.enter(Operation::ListAuthMethods).await?;
        Ok(self.methods.get(user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SettingsService for InMemoryIdentityBackend {
    async fn login_settings(
        &self,
        organization: Option<&str>,
    ) -> Result<Option<LoginSettings>, LookupError> {
        self.enter(Operation::LoginSettings).await?;
        let scoped = self.login_settings.get(&organization.map(str::to_string));
        Ok(scoped.or_else(|| self.login_settings.get(&None)).cloned())
    }

    async fn default_organization(&self) -> Result<Option<Organization>, LookupError> {
        self.enter(Operation::DefaultOrganization).await?;
        Ok(self.default_organization.clone())
    }

    async fn active_identity_providers(
        &self,
        organization: Option<&str>,
    ) -> Result<Vec<IdentityProvider>, LookupError> {
        self.enter(Operation::IdentityProviders).await?;
        let scoped = self
            .identity_providers
            .get(&organization.map(str::to_string));
        Ok(scoped
            .or_else(|| self.identity_providers.get(&None))
            .cloned()
            .unwrap_or_default())
    }

    async fn password_complexity(
        &self,
        _organization: Option<&str>,
    ) -> Result<Option<PasswordComplexity>, LookupError> {
        self.enter(Operation::PasswordComplexity).await?;
        Ok(self.password_complexity.clone())
    }
}
