use std::sync::LazyLock;

/// Name of the cookie holding the list of sessions this browser knows.
pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or("sessions".to_string())
});
