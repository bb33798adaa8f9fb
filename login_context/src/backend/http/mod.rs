mod config;
mod wire;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::errors::{LookupError, RpcCode};
use super::traits::{MethodInventory, SessionService, SettingsService};
use super::types::{
    AuthMethods, IdentityProvider, LoginSettings, Organization, PasswordComplexity,
    ResolvedSession, SessionCookieRef,
};

pub use config::ServiceConfig;

use wire::{
    ConnectErrorBody, ContextRequest, GetActiveIdpsResponse, GetLoginSettingsResponse,
    GetPasswordComplexityResponse, GetSessionRequest, GetSessionResponse, IdsQuery,
    ListAuthMethodTypesRequest, ListAuthMethodTypesResponse, ListOrganizationsRequest,
    ListOrganizationsResponse, ListSessionsRequest, ListSessionsResponse, SessionQuery,
};

/// Identity backend reached over Connect-JSON RPC.
///
/// Every method is a `POST {base_url}/{package.Service}/{Method}` with a JSON body.
#[derive(Clone)]
pub struct HttpIdentityBackend {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpIdentityBackend {
    pub fn new(config: ServiceConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(32)
            .build()?;

        tracing::info!(base_url = %config.base_url, "Created HTTP identity backend");
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn call<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp, LookupError>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self
            .config
            .endpoint(method)
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let mut request = self
            .client
            .post(url)
            .header("Connect-Protocol-Version", "1")
            .json(body);
        if let Some(token) = &self.config.service_token {
            request = request.bearer_auth(token);
        }
        for (name, value) in &self.config.custom_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        tracing::debug!(method, "Calling identity backend");
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            let payload: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
            return Ok(serde_json::from_slice(payload)?);
        }

        let text = response.text().await.unwrap_or_default();
        let error_body: Option<ConnectErrorBody> = serde_json::from_str(&text).ok();
        let (code, message) = match error_body {
            Some(ConnectErrorBody { code, message }) => (
                code.as_deref()
                    .map(RpcCode::from_wire)
                    .unwrap_or_else(|| RpcCode::from_http_status(status.as_u16())),
                message.unwrap_or_else(|| status.to_string()),
            ),
            None => (RpcCode::from_http_status(status.as_u16()), text),
        };

        tracing::debug!(method, status = status.as_u16(), %code, "Identity backend call failed");
        Err(LookupError::rpc(code, message))
    }
}

/// A backend `not_found` means the entity is absent, not that the call failed.
fn absent_on_not_found<T>(result: Result<T, LookupError>) -> Result<Option<T>, LookupError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl SessionService for HttpIdentityBackend {
    async fn get_session(
        &self,
        session: &SessionCookieRef,
    ) -> Result<Option<ResolvedSession>, LookupError> {
        let request = GetSessionRequest {
            session_id: &session.id,
            session_token: &session.token,
        };
        let response: Option<GetSessionResponse> =
            absent_on_not_found(self.call(wire::GET_SESSION, &request).await)?;
        Ok(response.and_then(|r| r.session).map(Into::into))
    }

    async fn list_sessions(&self, ids: &[String]) -> Result<Vec<ResolvedSession>, LookupError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = ListSessionsRequest {
            queries: vec![SessionQuery {
                ids_query: IdsQuery { ids },
            }],
        };
        let response: ListSessionsResponse = self.call(wire::LIST_SESSIONS, &request).await?;
        Ok(response.sessions.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl MethodInventory for HttpIdentityBackend {
    async fn list_auth_methods(&self, user_id: &str) -> Result<AuthMethods, LookupError> {
        let request = ListAuthMethodTypesRequest { user_id };
        let response: Option<ListAuthMethodTypesResponse> =
            absent_on_not_found(self.call(wire::LIST_AUTH_METHOD_TYPES, &request).await)?;
        Ok(response.map(|r| r.into_methods()).unwrap_or_default())
    }
}

#[async_trait]
impl SettingsService for HttpIdentityBackend {
    async fn login_settings(
        &self,
        organization: Option<&str>,
    ) -> Result<Option<LoginSettings>, LookupError> {
        let response: GetLoginSettingsResponse = self
            .call(wire::GET_LOGIN_SETTINGS, &ContextRequest::new(organization))
            .await?;
        Ok(response.settings.map(Into::into))
    }

    async fn default_organization(&self) -> Result<Option<Organization>, LookupError> {
        let response: ListOrganizationsResponse = self
            .call(
                wire::LIST_ORGANIZATIONS,
                &ListOrganizationsRequest::default_only(),
            )
            .await?;
        Ok(response.result.into_iter().next().map(Into::into))
    }

    async fn active_identity_providers(
        &self,
        organization: Option<&str>,
    ) -> Result<Vec<IdentityProvider>, LookupError> {
        let response: GetActiveIdpsResponse = self
            .call(wire::GET_ACTIVE_IDPS, &ContextRequest::new(organization))
            .await?;
        Ok(response
            .identity_providers
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn password_complexity(
        &self,
        organization: Option<&str>,
    ) -> Result<Option<PasswordComplexity>, LookupError> {
        let response: GetPasswordComplexityResponse = self
            .call(
                wire::GET_PASSWORD_COMPLEXITY,
                &ContextRequest::new(organization),
            )
            .await?;
        Ok(response.settings.map(Into::into))
    }
}
