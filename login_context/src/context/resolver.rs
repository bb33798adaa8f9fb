use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::backend::{
    AuthMethods, LookupError, MethodInventory, ResolvedSession, SessionCookieRef, SessionLookup,
};
use crate::utils::cancellable;

use super::errors::ContextError;
use super::types::{AuthContext, DisplayIdentity, IdentityHint, OrgConflictPolicy};

/// Decides which session an authentication step works on and what it can offer.
///
/// One resolver serves every step page. It holds no state between calls, so
/// two resolutions of the same hint against an unchanged store are equal.
#[derive(Clone)]
pub struct ContextResolver {
    sessions: Arc<dyn SessionLookup>,
    methods: Arc<dyn MethodInventory>,
    policy: OrgConflictPolicy,
}

impl ContextResolver {
    pub fn new(sessions: Arc<dyn SessionLookup>, methods: Arc<dyn MethodInventory>) -> Self {
        Self {
            sessions,
            methods,
            policy: OrgConflictPolicy::default(),
        }
    }

    pub fn with_org_conflict_policy(mut self, policy: OrgConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn org_conflict_policy(&self) -> OrgConflictPolicy {
        self.policy
    }

    pub async fn resolve(&self, hint: &IdentityHint) -> Result<AuthContext, ContextError> {
        self.resolve_with_cancel(hint, &CancellationToken::new())
            .await
    }

    /// Resolve `hint`, giving up with [`ContextError::Cancelled`] once `cancel` fires.
    ///
    /// - A session id is authoritative: if it cannot be resolved the result is
    ///   [`ContextError::LookupFailure`], never an unknown context.
    /// - A login name alone selects the most recent matching session; finding
    ///   none is not an error.
    /// - Methods are listed only for a session with a user id, and an inventory
    ///   failure leaves them empty.
    pub async fn resolve_with_cancel(
        &self,
        hint: &IdentityHint,
        cancel: &CancellationToken,
    ) -> Result<AuthContext, ContextError> {
        let hint = hint.clone().normalized();
        let organization = hint.organization.as_deref();

        let session = match (hint.session_id.as_deref(), hint.login_name.as_deref()) {
            (Some(session_id), _) => {
                Some(self.session_by_id(session_id, organization, cancel).await?)
            }
            (None, Some(login_name)) => {
                self.session_by_login_name(login_name, organization, cancel)
                    .await?
            }
            (None, None) => None,
        };

        let available_methods = match session.as_ref().and_then(ResolvedSession::user_id) {
            Some(user_id) => self.methods_for(user_id, cancel).await?,
            None => AuthMethods::new(),
        };

        let display_identity = session.as_ref().map(|s| DisplayIdentity {
            login_name: hint
                .login_name
                .clone()
                .or_else(|| s.login_name().map(str::to_string)),
            display_name: s.display_name().map(str::to_string),
        });

        let effective_organization = session
            .as_ref()
            .and_then(ResolvedSession::organization_id)
            .map(str::to_string)
            .or_else(|| hint.organization.clone());

        let unknown_context = session.is_none() && hint.login_name.is_none();
        tracing::debug!(
            session_id = session.as_ref().map(|s| s.session_id.as_str()),
            methods = available_methods.len(),
            unknown_context,
            "Resolved authentication context"
        );

        Ok(AuthContext {
            session,
            available_methods,
            display_identity,
            unknown_context,
            organization: effective_organization,
        })
    }

    async fn session_by_id(
        &self,
        session_id: &str,
        organization: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ResolvedSession, ContextError> {
        let mut session_ref = self.cookie_ref(session_id, organization, cancel).await?;

        if session_ref.is_none() {
            if let Some(hinted) = organization {
                // the entry may be stored under another organization
                let unscoped = self.cookie_ref(session_id, None, cancel).await?;
                if unscoped.is_some() {
                    if self.policy == OrgConflictPolicy::Reject {
                        return Err(org_conflict(session_id, hinted));
                    }
                    tracing::debug!(
                        session_id,
                        organization = hinted,
                        "Session is stored outside the hinted organization"
                    );
                }
                session_ref = unscoped;
            }
        }

        let Some(session_ref) = session_ref else {
            tracing::warn!(session_id, "Requested session is not in the session cookie");
            return Err(ContextError::not_found(session_id));
        };

        let resolved = cancellable(cancel, self.sessions.resolve_session(&session_ref))
            .await
            .ok_or(ContextError::Cancelled)?
            .map_err(|e| ContextError::backend(session_id, e))?;

        let Some(session) = resolved else {
            tracing::warn!(session_id, "Requested session no longer exists");
            return Err(ContextError::not_found(session_id));
        };

        match (organization, session.organization_id()) {
            (Some(hinted), Some(actual)) if hinted != actual => match self.policy {
                OrgConflictPolicy::Reject => Err(org_conflict(session_id, hinted)),
                OrgConflictPolicy::PreferSession => {
                    tracing::debug!(
                        session_id,
                        hinted,
                        actual,
                        "Session organization overrides the hint"
                    );
                    Ok(session)
                }
            },
            _ => Ok(session),
        }
    }

    async fn cookie_ref(
        &self,
        session_id: &str,
        organization: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<SessionCookieRef>, ContextError> {
        cancellable(
            cancel,
            self.sessions
                .lookup_session_by_cookie(session_id, organization),
        )
        .await
        .ok_or(ContextError::Cancelled)?
        .map_err(|e| ContextError::backend(session_id, e))
    }

    async fn session_by_login_name(
        &self,
        login_name: &str,
        organization: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<ResolvedSession>, ContextError> {
        let result = cancellable(
            cancel,
            self.sessions
                .most_recent_session(Some(login_name), organization),
        )
        .await
        .ok_or(ContextError::Cancelled)?;

        match result {
            Ok(session) => Ok(session),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => {
                tracing::warn!(login_name, "Most recent session lookup failed: {}", e);
                Ok(None)
            }
        }
    }

    async fn methods_for(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<AuthMethods, ContextError> {
        let result: Result<AuthMethods, LookupError> =
            cancellable(cancel, self.methods.list_auth_methods(user_id))
                .await
                .ok_or(ContextError::Cancelled)?;

        Ok(result.unwrap_or_else(|e| {
            tracing::warn!(user_id, "Listing authentication methods failed: {}", e);
            AuthMethods::new()
        }))
    }
}

fn org_conflict(session_id: &str, organization: &str) -> ContextError {
    tracing::warn!(session_id, organization, "Session belongs to another organization");
    ContextError::InvalidHint(format!(
        "session {session_id} does not belong to organization {organization}"
    ))
}
