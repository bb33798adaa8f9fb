use tokio_util::sync::CancellationToken;

use crate::backend::LoginSettings;
use crate::context::IdentityHint;
use crate::utils::non_empty;

use super::types::{InputLabel, LoginNamePlan, LoginRedirectParams};
use super::{LoginFlow, StepError, settle};

impl LoginFlow {
    /// Where `/login` sends the browser: the login-name page with the
    /// identity platform's `authRequest` renamed to `requestId`.
    pub fn login_redirect(&self, params: &LoginRedirectParams) -> String {
        let request_id = non_empty(params.auth_request.clone());
        let organization = non_empty(params.organization.clone());
        let login_name = non_empty(params.login_name.clone());

        self.link(
            "/loginname",
            &[
                ("requestId", request_id.as_deref()),
                ("organization", organization.as_deref()),
                ("loginName", login_name.as_deref()),
            ],
        )
    }

    pub async fn login_name_step(
        &self,
        hint: &IdentityHint,
        suffix: Option<&str>,
        submit: bool,
        cancel: &CancellationToken,
    ) -> Result<LoginNamePlan, StepError> {
        let hint = hint.clone().normalized();
        let organization = self
            .fallback_organization(hint.organization.as_deref(), cancel)
            .await?;

        let login_settings = settle(cancel, self.settings.login_settings(organization.as_deref()))
            .await?
            .unwrap_or_default();
        // the input label follows the settings of the organization actually asked for
        let context_settings = if organization == hint.organization {
            login_settings.clone()
        } else {
            settle(cancel, self.settings.login_settings(hint.organization.as_deref()))
                .await?
                .unwrap_or_default()
        };

        let identity_providers = if login_settings.allow_external_idp {
            settle(
                cancel,
                self.settings
                    .active_identity_providers(organization.as_deref()),
            )
            .await?
        } else {
            Vec::new()
        };

        Ok(LoginNamePlan {
            login_name: hint.login_name,
            request_id: hint.request_id,
            organization: hint.organization,
            suffix: suffix.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            submit,
            allow_register: login_settings.allow_register,
            input_label: input_label(&context_settings),
            identity_providers,
        })
    }
}

pub(crate) fn input_label(settings: &LoginSettings) -> InputLabel {
    match (
        settings.disable_login_with_email,
        settings.disable_login_with_phone,
    ) {
        (true, true) => InputLabel::Username,
        (true, false) => InputLabel::UsernameOrPhoneNumber,
        (false, true) => InputLabel::UsernameOrEmail,
        (false, false) => InputLabel::LoginName,
    }
}
