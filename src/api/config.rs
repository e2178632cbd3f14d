//! Connection settings for the users API. Values come from the command line or
//! `ROSTER_*` environment variables; see `cli::commands::api`.

use super::errors::TransportError;
use std::time::Duration;
use url::Url;

/// Host serving the `/api/user` resource when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://13282.wu.elitepro.ltd";
/// Overall request deadline (seconds).
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
/// TCP/TLS connect deadline (seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ApiConfig {
    /// Builds a config for `base_url` with the default deadlines.
    ///
    /// # Errors
    /// Returns [`TransportError::Config`] if the URL is empty, unparsable, has no
    /// host, or uses a scheme other than `http`/`https`.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECONDS),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

fn parse_base_url(value: &str) -> Result<Url, TransportError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransportError::Config("API base URL is required.".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|err| TransportError::Config(format!("Invalid API base URL {trimmed}: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(TransportError::Config(format!(
                "Unsupported API URL scheme: {scheme}"
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(TransportError::Config(format!(
            "API base URL has no host: {trimmed}"
        )));
    }

    Ok(url)
}
