use tokio_util::sync::CancellationToken;

use crate::utils::non_empty;

use super::types::{RegisterPasswordParams, RegisterPasswordPlan};
use super::{LoginFlow, StepError, settle};

impl LoginFlow {
    /// Password page of the registration: needs the user's names, email and an
    /// organization, and registration with username and password enabled.
    pub async fn register_password_step(
        &self,
        params: &RegisterPasswordParams,
        cancel: &CancellationToken,
    ) -> Result<RegisterPasswordPlan, StepError> {
        let first_name = non_empty(params.firstname.clone());
        let last_name = non_empty(params.lastname.clone());
        let email = non_empty(params.email.clone());
        let organization = self
            .fallback_organization(non_empty(params.organization.clone()).as_deref(), cancel)
            .await?;

        let (Some(first_name), Some(last_name), Some(email), Some(organization)) =
            (first_name, last_name, email, organization)
        else {
            tracing::debug!("Registration data is incomplete");
            return Ok(RegisterPasswordPlan::MissingData);
        };

        let settings = settle(cancel, self.settings.login_settings(Some(&organization)))
            .await?
            .unwrap_or_default();
        if !(settings.allow_register && settings.allow_username_password) {
            tracing::debug!(organization = %organization, "Registration with password is disabled");
            return Ok(RegisterPasswordPlan::Disabled);
        }

        let complexity =
            settle(cancel, self.settings.password_complexity(Some(&organization))).await?;

        Ok(RegisterPasswordPlan::Ready {
            first_name,
            last_name,
            email,
            organization,
            request_id: non_empty(params.request_id.clone()),
            complexity,
        })
    }
}
