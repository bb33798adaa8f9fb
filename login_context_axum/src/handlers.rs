use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use http::StatusCode;
use login_context::{
    AccountsPlan, IdentityHint, LoginFlow, LoginNameParams, LoginNamePlan, LoginRedirectParams,
    MfaPlan, PasskeyPlan, PasswordPlan, RegisterPasswordParams, RegisterPasswordPlan, StepPlan,
};
use serde::Deserialize;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::error::IntoResponseError;
use super::extractor::SessionCookies;

type StepResponse<T> = Result<Json<T>, (StatusCode, String)>;

/// A token cancelled once the handler future is dropped, e.g. on client disconnect.
fn request_cancellation() -> (CancellationToken, DropGuard) {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    (cancel, guard)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountsQuery {
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    organization: Option<String>,
}

pub(crate) async fn login(
    State(flow): State<Arc<LoginFlow>>,
    Query(params): Query<LoginRedirectParams>,
) -> Redirect {
    let location = flow.login_redirect(&params);
    tracing::debug!("Redirecting to {}", location);
    Redirect::temporary(&location)
}

pub(crate) async fn login_name(
    State(flow): State<Arc<LoginFlow>>,
    Query(params): Query<LoginNameParams>,
) -> StepResponse<LoginNamePlan> {
    let (cancel, _guard) = request_cancellation();
    let hint = IdentityHint {
        login_name: params.login_name,
        request_id: params.request_id,
        organization: params.organization,
        ..Default::default()
    };
    flow.login_name_step(&hint, params.suffix.as_deref(), params.submit, &cancel)
        .await
        .map(Json)
        .into_response_error()
}

pub(crate) async fn password(
    State(flow): State<Arc<LoginFlow>>,
    SessionCookies(jar): SessionCookies,
    Query(hint): Query<IdentityHint>,
) -> StepResponse<PasswordPlan> {
    let (cancel, _guard) = request_cancellation();
    flow.password_step(&hint, jar, &cancel)
        .await
        .map(Json)
        .into_response_error()
}

pub(crate) async fn passkey(
    State(flow): State<Arc<LoginFlow>>,
    SessionCookies(jar): SessionCookies,
    Query(hint): Query<IdentityHint>,
) -> StepResponse<StepPlan<PasskeyPlan>> {
    let (cancel, _guard) = request_cancellation();
    flow.passkey_step(&hint, jar, &cancel)
        .await
        .map(Json)
        .into_response_error()
}

pub(crate) async fn mfa(
    State(flow): State<Arc<LoginFlow>>,
    SessionCookies(jar): SessionCookies,
    Query(hint): Query<IdentityHint>,
) -> StepResponse<StepPlan<MfaPlan>> {
    let (cancel, _guard) = request_cancellation();
    flow.mfa_step(&hint, jar, &cancel)
        .await
        .map(Json)
        .into_response_error()
}

pub(crate) async fn accounts(
    State(flow): State<Arc<LoginFlow>>,
    SessionCookies(jar): SessionCookies,
    Query(query): Query<AccountsQuery>,
) -> StepResponse<AccountsPlan> {
    let (cancel, _guard) = request_cancellation();
    flow.accounts_step(
        query.request_id.as_deref(),
        query.organization.as_deref(),
        &jar,
        &cancel,
    )
    .await
    .map(Json)
    .into_response_error()
}

pub(crate) async fn register_password(
    State(flow): State<Arc<LoginFlow>>,
    Query(params): Query<RegisterPasswordParams>,
) -> StepResponse<RegisterPasswordPlan> {
    let (cancel, _guard) = request_cancellation();
    flow.register_password_step(&params, &cancel)
        .await
        .map(Json)
        .into_response_error()
}
