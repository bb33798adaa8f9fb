use tokio_util::sync::CancellationToken;

use crate::context::{ContextOutcome, IdentityHint};
use crate::cookie::SessionCookieJar;

use super::types::{
    FactorChooser, MfaPlan, Notice, PasskeyPlan, PasskeyPrompt, PasswordForm, PasswordPlan,
    StepPlan,
};
use super::{LoginFlow, StepError, outcome, settle};

impl LoginFlow {
    /// The password page works on the login name alone; a session id in the
    /// query is ignored.
    pub async fn password_step(
        &self,
        hint: &IdentityHint,
        jar: SessionCookieJar,
        cancel: &CancellationToken,
    ) -> Result<PasswordPlan, StepError> {
        let hint = IdentityHint {
            session_id: None,
            ..hint.clone().normalized()
        };
        let organization = self
            .fallback_organization(hint.organization.as_deref(), cancel)
            .await?;

        let resolved = self
            .resolver(jar)
            .resolve_with_cancel(&hint, cancel)
            .await;
        let context = outcome(resolved)?.context().cloned();

        let settings = settle(cancel, self.settings.login_settings(organization.as_deref()))
            .await?
            .unwrap_or_default();

        let has_session = context.as_ref().is_some_and(|ctx| ctx.session.is_some());
        let mut notices = Vec::new();
        if (!has_session || hint.login_name.is_none()) && !settings.ignore_unknown_usernames {
            notices.push(Notice::UnknownContext);
        }

        let form = hint.login_name.clone().map(|login_name| PasswordForm {
            login_name,
            request_id: hint.request_id.clone(),
            organization: hint.organization.clone(),
        });

        Ok(PasswordPlan {
            user: context.and_then(|ctx| ctx.display_identity),
            notices,
            form,
        })
    }

    pub async fn passkey_step(
        &self,
        hint: &IdentityHint,
        jar: SessionCookieJar,
        cancel: &CancellationToken,
    ) -> Result<StepPlan<PasskeyPlan>, StepError> {
        let hint = hint.clone().normalized();
        let resolved = self
            .resolver(jar)
            .resolve_with_cancel(&hint, cancel)
            .await;

        let ctx = match outcome(resolved)? {
            ContextOutcome::Known(ctx) | ContextOutcome::Unknown(ctx) => ctx,
            ContextOutcome::SessionExpired { session_id } => {
                return Ok(StepPlan::SessionExpired { session_id });
            }
            ContextOutcome::Cancelled => return Err(StepError::Cancelled),
        };

        let mut notices = Vec::new();
        if ctx.unknown_context {
            notices.push(Notice::UnknownContext);
        }

        let prompt = (hint.login_name.is_some() || hint.session_id.is_some()).then(|| {
            PasskeyPrompt {
                login_name: hint.login_name.clone(),
                session_id: hint.session_id.clone(),
                request_id: hint.request_id.clone(),
                organization: hint.organization.clone(),
                alt_password: hint.alt_password,
            }
        });

        Ok(StepPlan::Show(PasskeyPlan {
            user: ctx.display_identity,
            notices,
            prompt,
        }))
    }

    /// Offers the user's second factors, or a "no results" notice without a
    /// session user.
    pub async fn mfa_step(
        &self,
        hint: &IdentityHint,
        jar: SessionCookieJar,
        cancel: &CancellationToken,
    ) -> Result<StepPlan<MfaPlan>, StepError> {
        let hint = hint.clone().normalized();
        let resolved = self
            .resolver(jar)
            .resolve_with_cancel(&hint, cancel)
            .await;

        let ctx = match outcome(resolved)? {
            ContextOutcome::Known(ctx) | ContextOutcome::Unknown(ctx) => ctx,
            ContextOutcome::SessionExpired { session_id } => {
                return Ok(StepPlan::SessionExpired { session_id });
            }
            ContextOutcome::Cancelled => return Err(StepError::Cancelled),
        };

        let mut notices = Vec::new();
        if ctx.unknown_context {
            notices.push(Notice::UnknownContext);
        }

        let chooser = if ctx.user_id().is_some() {
            Some(FactorChooser {
                login_name: hint.login_name.clone(),
                session_id: hint.session_id.clone(),
                request_id: hint.request_id.clone(),
                organization: hint.organization.clone(),
                methods: ctx
                    .available_methods
                    .iter()
                    .copied()
                    .filter(|method| method.is_second_factor())
                    .collect(),
            })
        } else {
            notices.push(Notice::NoResults);
            None
        };

        Ok(StepPlan::Show(MfaPlan {
            user: ctx.display_identity,
            notices,
            chooser,
        }))
    }
}
