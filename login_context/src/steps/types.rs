use serde::{Deserialize, Serialize};

use crate::backend::{AuthMethod, IdentityProvider, PasswordComplexity, ResolvedSession};
use crate::context::DisplayIdentity;
use crate::utils::de_flag;

/// A message shown above a step form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Notice {
    /// Nothing identifies the user any more
    UnknownContext,
    /// No second factor can be offered
    NoResults,
}

/// Label of the login-name input, following which identifiers are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputLabel {
    LoginName,
    Username,
    UsernameOrPhoneNumber,
    UsernameOrEmail,
}

/// A step either renders its page or tells the user their session is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum StepPlan<P> {
    Show(P),
    #[serde(rename_all = "camelCase")]
    SessionExpired {
        session_id: String,
    },
}

impl<P> StepPlan<P> {
    pub fn page(&self) -> Option<&P> {
        match self {
            Self::Show(page) => Some(page),
            Self::SessionExpired { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRedirectParams {
    #[serde(default)]
    pub auth_request: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub login_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginNamePlan {
    pub login_name: Option<String>,
    pub request_id: Option<String>,
    pub organization: Option<String>,
    pub suffix: Option<String>,
    pub submit: bool,
    pub allow_register: bool,
    pub input_label: InputLabel,
    pub identity_providers: Vec<IdentityProvider>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    pub login_name: String,
    pub request_id: Option<String>,
    pub organization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPlan {
    pub user: Option<DisplayIdentity>,
    pub notices: Vec<Notice>,
    pub form: Option<PasswordForm>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyPrompt {
    pub login_name: Option<String>,
    pub session_id: Option<String>,
    pub request_id: Option<String>,
    pub organization: Option<String>,
    pub alt_password: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasskeyPlan {
    pub user: Option<DisplayIdentity>,
    pub notices: Vec<Notice>,
    pub prompt: Option<PasskeyPrompt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorChooser {
    pub login_name: Option<String>,
    pub session_id: Option<String>,
    pub request_id: Option<String>,
    pub organization: Option<String>,
    pub methods: Vec<AuthMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaPlan {
    pub user: Option<DisplayIdentity>,
    pub notices: Vec<Notice>,
    pub chooser: Option<FactorChooser>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsPlan {
    pub sessions: Vec<ResolvedSession>,
    pub request_id: Option<String>,
    /// Link that starts a fresh login for another account
    pub add_account_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterPasswordParams {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default, rename = "requestId")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RegisterPasswordPlan {
    MissingData,
    Disabled,
    #[serde(rename_all = "camelCase")]
    Ready {
        first_name: String,
        last_name: String,
        email: String,
        organization: String,
        request_id: Option<String>,
        complexity: Option<PasswordComplexity>,
    },
}

/// Query of the login-name page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginNameParams {
    #[serde(default)]
    pub login_name: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub submit: bool,
}
