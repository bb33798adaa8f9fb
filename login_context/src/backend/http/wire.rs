//! JSON shapes of the identity backend's RPC methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::types::{
    AuthMethod, AuthMethods, FactorCheck, FactorUser, IdentityProvider, LoginSettings,
    Organization, PasswordComplexity, ResolvedSession, SessionFactors, WebAuthNFactor,
};
use crate::utils::de_lenient_i64;

pub(super) const GET_SESSION: &str = "zitadel.session.v2.SessionService/GetSession";
pub(super) const LIST_SESSIONS: &str = "zitadel.session.v2.SessionService/ListSessions";
pub(super) const LIST_AUTH_METHOD_TYPES: &str =
    "zitadel.user.v2.UserService/ListAuthenticationMethodTypes";
pub(super) const GET_LOGIN_SETTINGS: &str = "zitadel.settings.v2.SettingsService/GetLoginSettings";
pub(super) const GET_ACTIVE_IDPS: &str =
    "zitadel.settings.v2.SettingsService/GetActiveIdentityProviders";
pub(super) const GET_PASSWORD_COMPLEXITY: &str =
    "zitadel.settings.v2.SettingsService/GetPasswordComplexitySettings";
pub(super) const LIST_ORGANIZATIONS: &str = "zitadel.org.v2.OrganizationService/ListOrganizations";

#[derive(Debug, Deserialize)]
pub(super) struct ConnectErrorBody {
    pub(super) code: Option<String>,
    pub(super) message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GetSessionRequest<'a> {
    pub(super) session_id: &'a str,
    pub(super) session_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct GetSessionResponse {
    pub(super) session: Option<WireSession>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IdsQuery<'a> {
    pub(super) ids: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SessionQuery<'a> {
    pub(super) ids_query: IdsQuery<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct ListSessionsRequest<'a> {
    pub(super) queries: Vec<SessionQuery<'a>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListSessionsResponse {
    #[serde(default)]
    pub(super) sessions: Vec<WireSession>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireSession {
    pub(super) id: String,
    #[serde(default)]
    pub(super) factors: Option<WireFactors>,
    pub(super) expiration_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireFactors {
    user: Option<WireUserFactor>,
    password: Option<WireCheck>,
    #[serde(rename = "webAuthN")]
    web_auth_n: Option<WireWebAuthN>,
    totp: Option<WireCheck>,
    otp_sms: Option<WireCheck>,
    otp_email: Option<WireCheck>,
    intent: Option<WireCheck>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUserFactor {
    #[serde(default)]
    id: String,
    login_name: Option<String>,
    display_name: Option<String>,
    organization_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCheck {
    verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWebAuthN {
    verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    user_verified: bool,
}

impl From<WireCheck> for FactorCheck {
    fn from(check: WireCheck) -> Self {
        Self {
            verified_at: check.verified_at,
        }
    }
}

impl From<WireSession> for ResolvedSession {
    fn from(session: WireSession) -> Self {
        let factors = session.factors.unwrap_or_default();
        Self {
            session_id: session.id,
            factors: SessionFactors {
                user: factors.user.map(|u| FactorUser {
                    id: u.id,
                    login_name: u.login_name,
                    display_name: u.display_name,
                    organization_id: u.organization_id,
                }),
                password: factors.password.map(Into::into),
                web_auth_n: factors.web_auth_n.map(|w| WebAuthNFactor {
                    verified_at: w.verified_at,
                    user_verified: w.user_verified,
                }),
                totp: factors.totp.map(Into::into),
                otp_sms: factors.otp_sms.map(Into::into),
                otp_email: factors.otp_email.map(Into::into),
                intent: factors.intent.map(Into::into),
            },
            expiry: session.expiration_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListAuthMethodTypesRequest<'a> {
    pub(super) user_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListAuthMethodTypesResponse {
    #[serde(default)]
    pub(super) auth_method_types: Vec<String>,
}

impl ListAuthMethodTypesResponse {
    /// Unrecognised method names are not enrolled methods and are left out.
    pub(super) fn into_methods(self) -> AuthMethods {
        self.auth_method_types
            .iter()
            .filter_map(|name| match AuthMethod::from_wire(name) {
                AuthMethod::Unspecified => {
                    tracing::debug!("Skipping unrecognised auth method type: {}", name);
                    None
                }
                method => Some(method),
            })
            .collect()
    }
}

/// Settings requests address either one organization or the instance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RequestContext<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    org_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instance: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(super) struct ContextRequest<'a> {
    ctx: RequestContext<'a>,
}

impl<'a> ContextRequest<'a> {
    pub(super) fn new(organization: Option<&'a str>) -> Self {
        let ctx = match organization {
            Some(org_id) => RequestContext {
                org_id: Some(org_id),
                instance: None,
            },
            None => RequestContext {
                org_id: None,
                instance: Some(true),
            },
        };
        Self { ctx }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GetLoginSettingsResponse {
    pub(super) settings: Option<WireLoginSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct WireLoginSettings {
    allow_username_password: bool,
    allow_register: bool,
    allow_external_idp: bool,
    ignore_unknown_usernames: bool,
    disable_login_with_email: bool,
    disable_login_with_phone: bool,
}

impl From<WireLoginSettings> for LoginSettings {
    fn from(s: WireLoginSettings) -> Self {
        Self {
            allow_username_password: s.allow_username_password,
            allow_register: s.allow_register,
            allow_external_idp: s.allow_external_idp,
            ignore_unknown_usernames: s.ignore_unknown_usernames,
            disable_login_with_email: s.disable_login_with_email,
            disable_login_with_phone: s.disable_login_with_phone,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GetActiveIdpsResponse {
    #[serde(default)]
    pub(super) identity_providers: Vec<WireIdentityProvider>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireIdentityProvider {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl From<WireIdentityProvider> for IdentityProvider {
    fn from(idp: WireIdentityProvider) -> Self {
        Self {
            id: idp.id,
            name: idp.name,
            kind: idp
                .kind
                .map(|k| k.trim_start_matches("IDENTITY_PROVIDER_TYPE_").to_lowercase())
                .unwrap_or_else(|| "unspecified".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GetPasswordComplexityResponse {
    pub(super) settings: Option<WirePasswordComplexity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct WirePasswordComplexity {
    #[serde(deserialize_with = "de_lenient_i64")]
    min_length: i64,
    requires_uppercase: bool,
    requires_lowercase: bool,
    requires_number: bool,
    requires_symbol: bool,
}

impl From<WirePasswordComplexity> for PasswordComplexity {
    fn from(p: WirePasswordComplexity) -> Self {
        Self {
            min_length: u64::try_from(p.min_length).unwrap_or(0),
            has_uppercase: p.requires_uppercase,
            has_lowercase: p.requires_lowercase,
            has_number: p.requires_number,
            has_symbol: p.requires_symbol,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OrganizationQuery {
    pub(super) default_query: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(super) struct ListOrganizationsRequest {
    pub(super) queries: Vec<OrganizationQuery>,
}

impl ListOrganizationsRequest {
    pub(super) fn default_only() -> Self {
        Self {
            queries: vec![OrganizationQuery {
                default_query: serde_json::Map::new(),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ListOrganizationsResponse {
    #[serde(default)]
    pub(super) result: Vec<WireOrganization>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireOrganization {
    id: String,
    #[serde(default)]
    name: String,
}

impl From<WireOrganization> for Organization {
    fn from(org: WireOrganization) -> Self {
        Self {
            id: org.id,
            name: org.name,
        }
    }
}
