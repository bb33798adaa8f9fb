use headers::{Cookie, HeaderMapExt};
use http::HeaderMap;

use super::config::SESSION_COOKIE_NAME;
use super::errors::CookieError;
use super::types::SessionCookie;

/// The sessions this browser holds, read from the session cookie of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookieJar {
    entries: Vec<SessionCookie>,
}

impl SessionCookieJar {
    pub fn new(entries: Vec<SessionCookie>) -> Self {
        Self { entries }
    }

    /// Strict parse of a raw cookie value (percent-encoded JSON array).
    pub fn parse(raw: &str) -> Result<Self, CookieError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        let decoded =
            urlencoding::decode(raw).map_err(|e| CookieError::Encoding(e.to_string()))?;
        let entries: Vec<SessionCookie> =
            serde_json::from_str(&decoded).map_err(|e| CookieError::Format(e.to_string()))?;
        Ok(Self { entries })
    }

    /// Like [`parse`](Self::parse), but a malformed value yields an empty jar.
    pub fn from_cookie_value(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(jar) => jar,
            Err(e) => {
                tracing::warn!("Ignoring malformed session cookie: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_cookies(cookies: &Cookie) -> Self {
        match cookies.get(SESSION_COOKIE_NAME.as_str()) {
            Some(value) => Self::from_cookie_value(value),
            None => {
                tracing::debug!("No session cookie '{}' found", SESSION_COOKIE_NAME.as_str());
                Self::default()
            }
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.typed_get::<Cookie>() {
            Some(cookies) => Self::from_cookies(&cookies),
            None => {
                tracing::debug!("No cookie header found");
                Self::default()
            }
        }
    }

    /// Encode the jar back into a cookie value.
    pub fn to_cookie_value(&self) -> Result<String, CookieError> {
        let json =
            serde_json::to_string(&self.entries).map_err(|e| CookieError::Format(e.to_string()))?;
        Ok(urlencoding::encode(&json).into_owned())
    }

    pub fn entries(&self) -> &[SessionCookie] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn find_by_id(&self, id: &str, organization: Option<&str>) -> Option<&SessionCookie> {
        self.entries
            .iter()
            .find(|entry| entry.id == id && entry.matches_organization(organization))
    }

    /// The entry with the greatest `change_ts` among those matching the filters.
    /// Ties go to the entry written last.
    pub fn most_recent(
        &self,
        login_name: Option<&str>,
        organization: Option<&str>,
    ) -> Option<&SessionCookie> {
        self.entries
            .iter()
            .filter(|entry| login_name.is_none_or(|name| entry.login_name == name))
            .filter(|entry| entry.matches_organization(organization))
            .max_by_key(|entry| entry.change_ts)
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }
}
