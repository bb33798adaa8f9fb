//! Authentication context resolution for a multi-step login front-end.
//!
//! Given the optional identifiers a login page receives (login name, session
//! id, organization, request id), [`ContextResolver`] decides which session
//! the page works on and which authentication methods it can offer.
//! [`LoginFlow`] builds on it to plan each page of the flow.
//!
//! All identity data lives in an external identity backend, reached through
//! the traits in this crate. [`HttpIdentityBackend`] talks to it over
//! Connect-JSON RPC; [`InMemoryIdentityBackend`] serves tests and demos.

mod backend;
mod context;
mod cookie;
mod steps;
mod utils;

#[cfg(test)]
mod test_utils;

pub use backend::{
    AuthMethod, AuthMethods, ConfigError, FactorCheck, FactorUser, HttpIdentityBackend,
    IdentityProvider, InMemoryIdentityBackend, LoginSettings, LookupError, MethodInventory,
    Operation, Organization, PasswordComplexity, ResolvedSession, RpcCode, ServiceConfig,
    SessionCookieRef, SessionFactors, SessionLookup, SessionService, SettingsService,
    WebAuthNFactor,
};
pub use context::{
    AuthContext, ContextError, ContextOutcome, ContextResolver, DisplayIdentity, IdentityHint,
    LookupFailureCause, OrgConflictPolicy,
};
pub use cookie::{CookieError, CookieSessionLookup, SESSION_COOKIE_NAME, SessionCookie, SessionCookieJar};
pub use steps::{
    AccountsPlan, FactorChooser, InputLabel, LoginFlow, LoginNameParams, LoginNamePlan,
    LoginRedirectParams, MfaPlan, Notice, PasskeyPlan, PasskeyPrompt, PasswordForm, PasswordPlan,
    RegisterPasswordParams, RegisterPasswordPlan, StepError, StepPlan,
};

// Cancellation token accepted by the `*_with_cancel` and step methods
pub use tokio_util::sync::CancellationToken;
