//! Client configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

/// Errors raised when configuration values cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid service url '{value}': {message}")]
    InvalidServiceUrl { value: String, message: String },
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Settings for reaching the hosted job board service.
///
/// Values come from `JOBBOARD_*` environment variables or a configuration
/// file. Without a service URL the client runs against the built-in fixtures.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JOBBOARD")]
pub struct ClientSettings {
    /// Base URL of the hosted service, e.g. `https://project.example.co`.
    pub service_url: Option<String>,
    /// Public API key sent with every request.
    pub api_key: Option<String>,
    /// Bound on each request to the service, in seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// Number of postings on the home page's featured list.
    #[ortho_config(default = 6)]
    pub featured_limit: usize,
    /// Optional sample catalogue overriding the embedded one.
    pub sample_catalogue_path: Option<PathBuf>,
}

impl ClientSettings {
    /// Parsed service URL, if one is configured.
    pub fn service_url(&self) -> Result<Option<Url>, SettingsError> {
        self.service_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                Url::parse(value).map_err(|err| SettingsError::InvalidServiceUrl {
                    value: value.to_owned(),
                    message: err.to_string(),
                })
            })
            .transpose()
    }

    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}
