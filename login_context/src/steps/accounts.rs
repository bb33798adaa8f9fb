use tokio_util::sync::CancellationToken;

use crate::cookie::SessionCookieJar;
use crate::utils::non_empty;

use super::types::AccountsPlan;
use super::{LoginFlow, StepError, settle};

impl LoginFlow {
    /// Every session this browser holds, for picking an account.
    pub async fn accounts_step(
        &self,
        request_id: Option<&str>,
        organization: Option<&str>,
        jar: &SessionCookieJar,
        cancel: &CancellationToken,
    ) -> Result<AccountsPlan, StepError> {
        let request_id = non_empty(request_id.map(str::to_string));
        let organization = non_empty(organization.map(str::to_string));

        let ids: Vec<String> = jar.ids().into_iter().filter(|id| !id.is_empty()).collect();
        let sessions = if ids.is_empty() {
            tracing::info!("No session cookie found");
            Vec::new()
        } else {
            settle(cancel, self.sessions.list_sessions(&ids)).await?
        };

        let add_account_url = self.link(
            "/loginname",
            &[
                ("requestId", request_id.as_deref()),
                ("organization", organization.as_deref()),
            ],
        );

        Ok(AccountsPlan {
            sessions,
            request_id,
            add_account_url,
        })
    }
}
