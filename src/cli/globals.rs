use crate::api::{
    config::{DEFAULT_CONNECT_TIMEOUT_SECONDS, DEFAULT_TIMEOUT_SECONDS},
    ApiConfig, TransportError,
};
use std::time::Duration;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    pub api_url: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
        }
    }

    pub fn set_timeouts(&mut self, timeout_seconds: u64, connect_timeout_seconds: u64) {
        self.timeout_seconds = timeout_seconds;
        self.connect_timeout_seconds = connect_timeout_seconds;
    }

    /// Client configuration for these settings.
    ///
    /// # Errors
    /// Returns [`TransportError::Config`] if the API URL is invalid.
    pub fn api_config(&self) -> Result<ApiConfig, TransportError> {
        Ok(ApiConfig::new(&self.api_url)?
            .with_timeout(Duration::from_secs(self.timeout_seconds))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_seconds)))
    }
}
