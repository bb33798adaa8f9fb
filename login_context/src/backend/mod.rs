//! Collaborators of the login flow: the identity backend seen through traits,
//! an HTTP implementation and an in-memory one.

mod errors;
mod http;
mod memory;
mod traits;
mod types;

pub use errors::{ConfigError, LookupError, RpcCode};
pub use http::{HttpIdentityBackend, ServiceConfig};
pub use memory::{InMemoryIdentityBackend, Operation};
pub use traits::{MethodInventory, SessionLookup, SessionService, SettingsService};
pub use types::{
    AuthMethod, AuthMethods, FactorCheck, FactorUser, IdentityProvider, LoginSettings,
    Organization, PasswordComplexity, ResolvedSession, SessionCookieRef, SessionFactors,
    WebAuthNFactor,
};
