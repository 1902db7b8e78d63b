//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `LOANFLOW_*` environment variables and configuration
//! files; command-line flags are layered on top by the CLI.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080/api/";
const DEFAULT_SESSION_FILE: &str = ".loanflow/session.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The API base URL does not parse.
    #[error("invalid API URL '{value}': {source}")]
    InvalidApiUrl {
        /// Configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The API base URL cannot carry endpoint paths.
    #[error("API URL '{0}' must be an http(s) URL")]
    UnsupportedScheme(String),
    /// A zero timeout would fail every request.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Values given explicitly on the command line.
///
/// Each present value replaces whatever the environment or configuration
/// files supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `--api-url`.
    pub api_url: Option<String>,
    /// `--session-file`.
    pub session_file: Option<String>,
    /// `--request-timeout-secs`.
    pub request_timeout_secs: Option<u64>,
    /// `--log-json`; only ever switches JSON logging on.
    pub log_json: bool,
}

/// Settings controlling how the client reaches the backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOANFLOW")]
pub struct ClientSettings {
    /// Backend API base URL.
    pub api_url: Option<String>,
    /// Path of the session file.
    pub session_file: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Emit JSON log lines.
    #[ortho_config(default = false)]
    pub log_json: bool,
}

impl ClientSettings {
    /// The API base URL, falling back to the local backend.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the value is not an http(s) URL.
    pub fn api_url(&self) -> Result<Url, SettingsError> {
        let raw = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL).trim();
        let url = Url::parse(raw).map_err(|source| SettingsError::InvalidApiUrl {
            value: raw.to_owned(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SettingsError::UnsupportedScheme(raw.to_owned()));
        }
        Ok(url)
    }

    /// Session file path, falling back to `.loanflow/session.json`.
    pub fn session_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(
            self.session_file
                .as_deref()
                .unwrap_or(DEFAULT_SESSION_FILE),
        )
    }

    /// Request timeout, falling back to thirty seconds.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Replace values with any explicitly provided overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        let SettingsOverrides {
            api_url,
            session_file,
            request_timeout_secs,
            log_json,
        } = overrides;
        if api_url.is_some() {
            self.api_url = api_url;
        }
        if session_file.is_some() {
            self.session_file = session_file;
        }
        if request_timeout_secs.is_some() {
            self.request_timeout_secs = request_timeout_secs;
        }
        self.log_json |= log_json;
        self
    }
}
