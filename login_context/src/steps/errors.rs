use thiserror::Error;

use crate::backend::LookupError;

/// Errors that stop a step from being planned at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StepError {
    /// Settings or session listing failed at the identity backend
    #[error("Backend error: {0}")]
    Backend(LookupError),

    /// The request went away before the plan was ready
    #[error("Step cancelled")]
    Cancelled,
}

impl StepError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Backend(err) => tracing::error!("Backend error: {}", err),
            Self::Cancelled => tracing::debug!("Step cancelled"),
        }
        self
    }
}

impl From<LookupError> for StepError {
    fn from(err: LookupError) -> Self {
        let error = Self::Backend(err);
        tracing::error!("{}", error);
        error
    }
}
