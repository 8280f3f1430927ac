//! REST adapters for the hosted job board service.
//!
//! The service exposes a token-based auth API under `/auth/v1` and table
//! reads under `/rest/v1` using PostgREST query syntax. Both adapters share
//! one [`RestClient`] carrying the base URL, API key, and request timeout.

mod auth_gateway;
mod dto;
mod job_source;
#[cfg(test)]
mod scripted_server;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};

pub use auth_gateway::RestAuthGateway;
pub use job_source::RestJobSource;

const USER_AGENT: &str = "jobboard-client/0.1";

/// Errors raised while building a [`RestClient`].
#[derive(Debug, thiserror::Error)]
pub enum RestClientError {
    #[error("service url cannot be used as a base: {url}")]
    InvalidBaseUrl { url: Url },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Shared HTTP plumbing for the REST adapters.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl RestClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` cannot carry paths or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RestClientError> {
        if base_url.cannot_be_a_base() {
            return Err(RestClientError::InvalidBaseUrl { url: base_url });
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> Url {
        endpoint(&self.base_url, path)
    }

    /// Request carrying the API key, authorised as `bearer` or the key itself.
    pub(crate) fn request(
        &self,
        method: reqwest::Method,
        url: Url,
        bearer: Option<&str>,
    ) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(bearer.unwrap_or(self.api_key.as_str()))
            .header(reqwest::header::ACCEPT, "application/json")
    }
}

fn endpoint(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    let joined = format!(
        "{}/{}",
        base_url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url.set_query(None);
    url
}

/// Compact single-line excerpt of a response body for error messages.
fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

fn status_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}
