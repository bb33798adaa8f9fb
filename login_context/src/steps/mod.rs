//! Planners for the pages of the login flow.
//!
//! Every page reduces to "resolve the context, then decide what to show".
//! The plans are plain data; rendering them is up to the caller.

mod accounts;
mod errors;
mod factors;
mod login;
mod register;
mod types;

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::backend::{LookupError, MethodInventory, SessionService, SettingsService};
use crate::context::{AuthContext, ContextError, ContextOutcome, ContextResolver, OrgConflictPolicy};
use crate::cookie::{CookieSessionLookup, SessionCookieJar};
use crate::utils::cancellable;

pub use errors::StepError;
pub use types::{
    AccountsPlan, FactorChooser, InputLabel, LoginNameParams, LoginNamePlan, LoginRedirectParams,
    MfaPlan, Notice, PasskeyPlan, PasskeyPrompt, PasswordForm, PasswordPlan,
    RegisterPasswordParams, RegisterPasswordPlan, StepPlan,
};

/// The login flow: shared collaborators plus the policy every step resolves with.
#[derive(Clone)]
pub struct LoginFlow {
    sessions: Arc<dyn SessionService>,
    methods: Arc<dyn MethodInventory>,
    settings: Arc<dyn SettingsService>,
    policy: OrgConflictPolicy,
    base_path: String,
}

impl LoginFlow {
    pub fn new(
        sessions: Arc<dyn SessionService>,
        methods: Arc<dyn MethodInventory>,
        settings: Arc<dyn SettingsService>,
    ) -> Self {
        Self {
            sessions,
            methods,
            settings,
            policy: OrgConflictPolicy::default(),
            base_path: String::new(),
        }
    }

    /// Use one backend for every collaborator.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: SessionService + MethodInventory + SettingsService,
    {
        Self::new(backend.clone(), backend.clone(), backend)
    }

    pub fn with_org_conflict_policy(mut self, policy: OrgConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Prefix of the links the planners produce, e.g. `/ui/login`.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// A resolver over this request's session cookie.
    pub fn resolver(&self, jar: SessionCookieJar) -> ContextResolver {
        let lookup = CookieSessionLookup::new(jar, self.sessions.clone());
        ContextResolver::new(Arc::new(lookup), self.methods.clone())
            .with_org_conflict_policy(self.policy)
    }

    pub(crate) fn link(&self, path: &str, query: &[(&str, Option<&str>)]) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in query {
            if let Some(value) = value {
                serializer.append_pair(key, value);
            }
        }
        let query = serializer.finish();
        if query.is_empty() {
            format!("{}{}", self.base_path, path)
        } else {
            format!("{}{}?{}", self.base_path, path, query)
        }
    }

    /// Id of the instance's default organization, used when no organization is given.
    pub(crate) async fn fallback_organization(
        &self,
        organization: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, StepError> {
        if let Some(organization) = organization {
            return Ok(Some(organization.to_string()));
        }
        let default = settle(cancel, self.settings.default_organization()).await?;
        tracing::debug!(default_organization = ?default.as_ref().map(|o| &o.id), "No organization given");
        Ok(default.map(|org| org.id))
    }
}

/// Await a backend call unless the request is cancelled.
pub(crate) async fn settle<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, StepError>
where
    F: Future<Output = Result<T, LookupError>>,
{
    match cancellable(cancel, fut).await {
        Some(result) => Ok(result?),
        None => Err(StepError::Cancelled),
    }
}

/// Cancellation aborts the step; every other resolution result is a page state.
pub(crate) fn outcome(
    result: Result<AuthContext, ContextError>,
) -> Result<ContextOutcome, StepError> {
    match ContextOutcome::from_resolution(result) {
        ContextOutcome::Cancelled => Err(StepError::Cancelled),
        outcome => Ok(outcome),
    }
}
