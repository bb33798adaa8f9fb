//! Axum integration for login-context
//!
//! Mount [`login_flow_router`] under [`LOGIN_ROUTE_PREFIX`] to serve the step
//! plans of the login flow as JSON.

mod config;
mod error;
mod extractor;
mod handlers;
mod router;

pub use config::LOGIN_ROUTE_PREFIX;
pub use error::IntoResponseError;
pub use extractor::SessionCookies;
pub use router::{login_flow_router, login_flow_router_no_trace};

// Re-export the flow so applications need only this crate to mount it
pub use login_context::LoginFlow;
