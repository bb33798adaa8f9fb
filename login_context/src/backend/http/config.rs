use std::env;
use std::time::Duration;

use url::Url;

use crate::backend::errors::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Explicit configuration of the HTTP identity backend.
///
/// Nothing in the resolver reads the environment; `from_env` exists for
/// binaries that want the conventional variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: Url,
    pub service_token: Option<String>,
    pub custom_headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(base_url.to_string()));
        }
        // Url::join drops the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            service_token: None,
            custom_headers: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_service_token(mut self, token: impl Into<String>) -> Self {
        self.service_token = Some(token.into());
        self
    }

    /// Add headers from a `name:value,name:value` list.
    ///
    /// Entries without a name before the first `:` are skipped.
    pub fn with_custom_headers(mut self, raw: &str) -> Self {
        self.custom_headers.extend(parse_custom_headers(raw));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from `IDENTITY_BASE_URL`, `IDENTITY_SERVICE_TOKEN`,
    /// `CUSTOM_REQUEST_HEADERS` and `IDENTITY_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("IDENTITY_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("IDENTITY_BASE_URL".to_string()))?;
        let mut config = Self::new(&base_url)?;

        if let Ok(token) = env::var("IDENTITY_SERVICE_TOKEN") {
            if !token.is_empty() {
                config = config.with_service_token(token);
            }
        }

        if let Ok(headers) = env::var("CUSTOM_REQUEST_HEADERS") {
            config = config.with_custom_headers(&headers);
        }

        if let Ok(timeout) = env::var("IDENTITY_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                name: "IDENTITY_REQUEST_TIMEOUT_SECS".to_string(),
                value: timeout.clone(),
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        tracing::debug!(
            base_url = %config.base_url,
            custom_headers = config.custom_headers.len(),
            timeout_secs = config.timeout.as_secs(),
            "Loaded identity backend configuration"
        );
        Ok(config)
    }

    /// Absolute url of an RPC method such as `pkg.Service/Method`.
    pub(crate) fn endpoint(&self, method: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(method)
            .map_err(|e| ConfigError::InvalidUrl(format!("{method}: {e}")))
    }
}

fn parse_custom_headers(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|header| {
            let kv = header.find(':')?;
            if kv == 0 {
                return None;
            }
            let name = header[..kv].trim();
            let value = header[kv + 1..].trim();
            if name.is_empty() {
                None
            } else {
                Some((name.to_string(), value.to_string()))
            }
        })
        .collect()
}
