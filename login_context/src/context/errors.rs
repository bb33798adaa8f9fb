use thiserror::Error;

use crate::backend::LookupError;

/// Why an explicitly requested session could not be resolved.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupFailureCause {
    #[error("session not found")]
    NotFound,

    #[error("{0}")]
    Backend(LookupError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContextError {
    /// An explicit session id did not resolve. Rendered as "session expired".
    #[error("Session {session_id} could not be resolved: {cause}")]
    LookupFailure {
        session_id: String,
        cause: LookupFailureCause,
    },

    #[error("Invalid hint: {0}")]
    InvalidHint(String),

    #[error("Context resolution cancelled")]
    Cancelled,
}

impl ContextError {
    pub(crate) fn not_found(session_id: &str) -> Self {
        Self::LookupFailure {
            session_id: session_id.to_string(),
            cause: LookupFailureCause::NotFound,
        }
    }

    pub(crate) fn backend(session_id: &str, err: LookupError) -> Self {
        let error = Self::LookupFailure {
            session_id: session_id.to_string(),
            cause: LookupFailureCause::Backend(err),
        };
        tracing::error!("{}", error);
        error
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::LookupFailure { .. })
    }
}
