//! Central configuration for the login_context_axum crate

use std::sync::LazyLock;

/// Path the login flow is mounted under. Links in step plans start with it.
/// Default: "/ui/v2/login"
pub static LOGIN_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    route_prefix(std::env::var("LOGIN_ROUTE_PREFIX").ok().as_deref())
});

fn route_prefix(env_value: Option<&str>) -> String {
    let prefix = env_value.map(str::trim).unwrap_or("/ui/v2/login");
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        "/ui/v2/login".to_string()
    } else if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{prefix}")
    }
}
