//! HTTP helpers for the JSON users API with consistent timeouts and error
//! handling. Feature clients go through [`ApiClient`] so request setup, payload
//! unwrapping and status mapping live in one place. No authentication headers
//! are attached.

pub mod config;
pub mod errors;

pub use self::{config::ApiConfig, errors::TransportError};

use crate::APP_USER_AGENT;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

/// Response body as sent by the server: either the payload itself or the
/// payload wrapped in a `{ "data": ... }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Envelope { data } | Self::Bare(data) => data,
        }
    }
}

/// Shared `reqwest` client bound to one API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client with JSON content type, user agent and the configured
    /// deadlines.
    ///
    /// # Errors
    /// Returns [`TransportError::Config`] if the underlying client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| TransportError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches JSON and unwraps the payload.
    ///
    /// # Errors
    /// Returns a [`TransportError`] on network failure, non-2xx status or an
    /// undecodable body.
    #[instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let request = self.http.get(self.build_url(path));
        let response = send(request).await?;

        handle_json_response(response).await
    }

    /// Posts a JSON body and parses the JSON response.
    ///
    /// # Errors
    /// Same as [`ApiClient::get_json`].
    #[instrument(skip(self, body))]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.build_url(path)).json(body);
        let response = send(request).await?;

        handle_json_response(response).await
    }

    /// Puts a JSON body and parses the JSON response.
    ///
    /// # Errors
    /// Same as [`ApiClient::get_json`].
    #[instrument(skip(self, body))]
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.put(self.build_url(path)).json(body);
        let response = send(request).await?;

        handle_json_response(response).await
    }

    /// Sends a DELETE with a JSON body; the response body is ignored.
    ///
    /// # Errors
    /// Returns a [`TransportError`] on network failure or non-2xx status.
    #[instrument(skip(self, body))]
    pub async fn delete_json<B>(&self, path: &str, body: &B) -> Result<(), TransportError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.http.delete(self.build_url(path)).json(body);
        let response = send(request).await?;

        handle_empty_response(response).await
    }

    /// Builds a URL from the configured base URL and the provided path.
    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim().trim_start_matches('/'))
    }
}

async fn send(request: RequestBuilder) -> Result<Response, TransportError> {
    request.send().await.map_err(map_request_error)
}

/// Maps `reqwest` failures into transport variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> TransportError {
    error!("API request failed: {err}");

    if err.is_timeout() {
        TransportError::Timeout(err)
    } else {
        TransportError::Network(err)
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let response = check_status(response).await?;

    let bytes = response
        .bytes()
        .await
        .map_err(|err| TransportError::Decode(format!("Failed to read response: {err}")))?;

    serde_json::from_slice::<Payload<T>>(&bytes)
        .map(Payload::into_inner)
        .map_err(|err| {
            error!("API response could not be decoded: {err}");
            TransportError::Decode(format!("Failed to decode response: {err}"))
        })
}

async fn handle_empty_response(response: Response) -> Result<(), TransportError> {
    check_status(response).await.map(|_| ())
}

/// Passes 2xx responses through; logs and rejects everything else.
async fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    debug!("API response status: {status}");

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = sanitize_body(&body);
    error!("API error {status}: {message}");

    Err(TransportError::Http {
        status: status.as_u16(),
        message,
    })
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
