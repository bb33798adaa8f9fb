//! The session cookie: which sessions this browser holds, and how to look them up.

mod config;
mod errors;
mod jar;
mod lookup;
mod types;

pub use config::SESSION_COOKIE_NAME;
pub use errors::CookieError;
pub use jar::SessionCookieJar;
pub use lookup::CookieSessionLookup;
pub use types::SessionCookie;
