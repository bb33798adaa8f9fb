//! Resolution of the authentication context for one login step.

mod errors;
mod outcome;
mod resolver;
mod types;

pub use errors::{ContextError, LookupFailureCause};
pub use outcome::ContextOutcome;
pub use resolver::ContextResolver;
pub use types::{AuthContext, DisplayIdentity, IdentityHint, OrgConflictPolicy};
