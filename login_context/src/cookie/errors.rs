use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CookieError {
    #[error("Cookie value is not valid percent-encoding: {0}")]
    Encoding(String),

    #[error("Cookie value is not a session list: {0}")]
    Format(String),
}
