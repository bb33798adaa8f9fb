use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user a session belongs to, as reported by the identity backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorUser {
    pub id: String,
    pub login_name: Option<String>,
    pub display_name: Option<String>,
    pub organization_id: Option<String>,
}

/// A checked factor. Presence alone means the check was completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorCheck {
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAuthNFactor {
    pub verified_at: Option<DateTime<Utc>>,
    pub user_verified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFactors {
    pub user: Option<FactorUser>,
    pub password: Option<FactorCheck>,
    #[serde(rename = "webAuthN")]
    pub web_auth_n: Option<WebAuthNFactor>,
    pub totp: Option<FactorCheck>,
    pub otp_sms: Option<FactorCheck>,
    pub otp_email: Option<FactorCheck>,
    pub intent: Option<FactorCheck>,
}

/// A session as resolved from the identity backend for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSession {
    pub session_id: String,
    pub factors: SessionFactors,
    pub expiry: Option<DateTime<Utc>>,
}

impl ResolvedSession {
    /// The owning user id, if the backend reported a non-empty one.
    pub fn user_id(&self) -> Option<&str> {
        self.factors
            .user
            .as_ref()
            .map(|u| u.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn login_name(&self) -> Option<&str> {
        self.factors.user.as_ref()?.login_name.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.factors.user.as_ref()?.display_name.as_deref()
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.factors
            .user
            .as_ref()?
            .organization_id
            .as_deref()
            .filter(|org| !org.is_empty())
    }
}

/// An authentication method a user has enrolled.
///
/// Declaration order is display priority; `AuthMethods` iterates in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Passkey,
    Password,
    Idp,
    Totp,
    U2f,
    OtpSms,
    OtpEmail,
    Unspecified,
}

impl AuthMethod {
    /// Map the backend's `AUTHENTICATION_METHOD_TYPE_*` enum names.
    pub fn from_wire(name: &str) -> Self {
        match name.trim_start_matches("AUTHENTICATION_METHOD_TYPE_") {
            "PASSWORD" => Self::Password,
            "PASSKEY" => Self::Passkey,
            "IDP" => Self::Idp,
            "TOTP" => Self::Totp,
            "U2F" => Self::U2f,
            "OTP_SMS" => Self::OtpSms,
            "OTP_EMAIL" => Self::OtpEmail,
            _ => Self::Unspecified,
        }
    }

    /// Second factors are what the mfa step offers to choose from.
    pub fn is_second_factor(&self) -> bool {
        matches!(
            self,
            Self::Totp | Self::U2f | Self::OtpSms | Self::OtpEmail
        )
    }
}

pub type AuthMethods = BTreeSet<AuthMethod>;

/// What is needed to fetch a session from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookieRef {
    pub id: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSettings {
    pub allow_username_password: bool,
    pub allow_register: bool,
    pub allow_external_idp: bool,
    pub ignore_unknown_usernames: bool,
    pub disable_login_with_email: bool,
    pub disable_login_with_phone: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProvider {
    pub id: String,
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordComplexity {
    pub min_length: u64,
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_number: bool,
    pub has_symbol: bool,
}
