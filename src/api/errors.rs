use thiserror::Error;

/// Failure of a single request against the users API.
///
/// Every variant is terminal for the operation that produced it; nothing is
/// retried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("Timeout: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Decode(String),
}

impl TransportError {
    /// HTTP status of the rejected response, if the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
