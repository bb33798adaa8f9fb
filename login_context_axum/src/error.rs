use http::StatusCode;
use login_context::{RpcCode, StepError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Backend failures are upstream failures; a cancelled step never reaches the client
impl<T> IntoResponseError<T> for Result<T, StepError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match &e {
                StepError::Backend(err) => match err.code() {
                    RpcCode::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
                    RpcCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::BAD_GATEWAY,
                },
                StepError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            };
            (status, e.log().to_string())
        })
    }
}
