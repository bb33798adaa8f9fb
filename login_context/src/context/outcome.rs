use super::errors::ContextError;
use super::types::AuthContext;

/// What a step page renders, derived from a resolution result.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextOutcome {
    Known(AuthContext),
    /// Nothing identifies the user; the page shows the unknown-context notice.
    Unknown(AuthContext),
    /// The requested session is gone; the page asks to start over.
    SessionExpired { session_id: String },
    /// The request was abandoned; nothing is rendered.
    Cancelled,
}

impl ContextOutcome {
    pub fn from_resolution(result: Result<AuthContext, ContextError>) -> Self {
        match result {
            Ok(ctx) if ctx.unknown_context => Self::Unknown(ctx),
            Ok(ctx) => Self::Known(ctx),
            Err(ContextError::LookupFailure { session_id, .. }) => {
                Self::SessionExpired { session_id }
            }
            Err(ContextError::InvalidHint(reason)) => {
                tracing::debug!("Treating invalid hint as unknown context: {}", reason);
                Self::Unknown(AuthContext::unknown())
            }
            Err(ContextError::Cancelled) => Self::Cancelled,
        }
    }

    pub fn context(&self) -> Option<&AuthContext> {
        match self {
            Self::Known(ctx) | Self::Unknown(ctx) => Some(ctx),
            Self::SessionExpired { .. } | Self::Cancelled => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl From<Result<AuthContext, ContextError>> for ContextOutcome {
    fn from(result: Result<AuthContext, ContextError>) -> Self {
        Self::from_resolution(result)
    }
}
