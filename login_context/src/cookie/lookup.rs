use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::{LookupError, ResolvedSession, SessionCookieRef, SessionLookup, SessionService};

use super::jar::SessionCookieJar;

/// Session lookup over the request's cookie jar and the backend session service.
pub struct CookieSessionLookup {
    jar: SessionCookieJar,
    sessions: Arc<dyn SessionService>,
}

impl CookieSessionLookup {
    pub fn new(jar: SessionCookieJar, sessions: Arc<dyn SessionService>) -> Self {
        Self { jar, sessions }
    }

    pub fn jar(&self) -> &SessionCookieJar {
        &self.jar
    }
}

#[async_trait]
impl SessionLookup for CookieSessionLookup {
    async fn lookup_session_by_cookie(
        &self,
        session_id: &str,
        organization: Option<&str>,
    ) -> Result<Option<SessionCookieRef>, LookupError> {
        Ok(self
            .jar
            .find_by_id(session_id, organization)
            .map(|entry| entry.session_ref()))
    }

    async fn resolve_session(
        &self,
        session_ref: &SessionCookieRef,
    ) -> Result<Option<ResolvedSession>, LookupError> {
        self.sessions.get_session(session_ref).await
    }

    async fn most_recent_session(
        &self,
        login_name: Option<&str>,
        organization: Option<&str>,
    ) -> Result<Option<ResolvedSession>, LookupError> {
        let Some(entry) = self.jar.most_recent(login_name, organization) else {
            tracing::debug!(?login_name, ?organization, "No session cookie matches");
            return Ok(None);
        };
        self.sessions.get_session(&entry.session_ref()).await
    }
}
