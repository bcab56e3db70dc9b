//! TOML Configuration File Support
//!
//! Centralized settings for the friend-action conductor, with an optional
//! TOML file at `~/.config/socknet/conductor.toml`.
//!
//! # Configuration Priority
//!
//! Values are applied with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:8000"
//! endpoint = "friends"          # profile | friends | following | friend_requests | full URL
//! request_timeout_ms = 10000
//!
//! [identity]
//! author_id = "6f1d2c8e-8d0b-4a44-a3a3-1c2b9f0e7d55"
//!
//! [csrf]
//! cookie_header = "sessionid=abc; csrftoken=XYZ"
//! cookie_name = "csrftoken"
//! ```
//!
//! # Environment Variables
//!
//! - `SOCKNET_BASE_URL`, `SOCKNET_ENDPOINT`, `SOCKNET_REQUEST_TIMEOUT_MS`
//! - `SOCKNET_AUTHOR_ID`
//! - `SOCKNET_CSRF_TOKEN`, `SOCKNET_COOKIE`

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::button::AuthorId;
use crate::controller::ControllerConfig;
use crate::csrf::{CookieHeaderToken, NoToken, StaticToken, TokenSource, DEFAULT_COOKIE_NAME};
use crate::endpoint::{Endpoint, EndpointKind};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Backend section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendToml {
    /// Site base URL
    pub base_url: Option<String>,

    /// Page kind or full URL actions are POSTed to
    pub endpoint: Option<String>,

    /// Request timeout in milliseconds (unset = client default)
    pub request_timeout_ms: Option<u64>,
}

/// Identity section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityToml {
    /// UUID of the logged-in author
    pub author_id: Option<String>,
}

/// CSRF section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfToml {
    /// Fixed token value
    pub token: Option<String>,

    /// Cookie header to read the token from
    pub cookie_header: Option<String>,

    /// Cookie holding the token (default `csrftoken`)
    pub cookie_name: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocknetToml {
    /// Backend configuration section
    pub backend: BackendToml,

    /// Identity configuration section
    pub identity: IdentityToml,

    /// CSRF configuration section
    pub csrf: CsrfToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Centralized settings for the conductor
///
/// Use [`load_config`] to load with priority handling, then
/// [`ConductorSettings::controller_config`] to validate.
#[derive(Clone, Debug)]
pub struct ConductorSettings {
    /// Site base URL
    pub base_url: Option<String>,

    /// Page kind or full URL actions are POSTed to
    pub endpoint: String,

    /// Request timeout in milliseconds
    pub request_timeout_ms: Option<u64>,

    /// UUID of the logged-in author
    pub author_id: Option<String>,

    /// Fixed CSRF token
    pub csrf_token: Option<String>,

    /// Cookie header to read the CSRF token from
    pub cookie_header: Option<String>,

    /// Cookie holding the CSRF token
    pub cookie_name: String,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for ConductorSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            endpoint: "friends".to_string(),
            request_timeout_ms: None,
            author_id: None,
            csrf_token: None,
            cookie_header: None,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ConductorSettings {
    /// Create settings with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the highest-priority source that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Validate the settings into a controller configuration
    ///
    /// # Errors
    ///
    /// Fails when the author id is missing or malformed, the endpoint is
    /// unknown, or a page endpoint has no base URL.
    pub fn controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let raw_author = self.author_id.as_deref().ok_or_else(|| {
            ConfigError::ValidationError(
                "author_id is required (set [identity] author_id or SOCKNET_AUTHOR_ID)"
                    .to_string(),
            )
        })?;
        let author = AuthorId::parse(raw_author).map_err(|e| {
            ConfigError::ValidationError(format!("author_id {raw_author:?} is not a UUID: {e}"))
        })?;

        let endpoint = if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")
        {
            Endpoint::Url(self.endpoint.clone())
        } else {
            EndpointKind::parse(&self.endpoint)
                .ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "unknown endpoint {:?} (expected profile, friends, following, friend_requests or a URL)",
                        self.endpoint
                    ))
                })?
                .for_author(author)
        };

        let base_url = match (&endpoint, &self.base_url) {
            (_, Some(base)) => base.clone(),
            (Endpoint::Url(_), None) => String::new(),
            (_, None) => {
                return Err(ConfigError::ValidationError(
                    "base_url is required (set [backend] base_url or SOCKNET_BASE_URL)".to_string(),
                ))
            }
        };

        let mut config = ControllerConfig::new(author, base_url).with_endpoint(endpoint);
        if let Some(ms) = self.request_timeout_ms.filter(|ms| *ms > 0) {
            config = config.with_request_timeout(Duration::from_millis(ms));
        }
        Ok(config)
    }

    /// Token source described by these settings
    ///
    /// A fixed token wins over a cookie header; with neither, no token is
    /// sent.
    #[must_use]
    pub fn token_source(&self) -> Box<dyn TokenSource> {
        if let Some(ref token) = self.csrf_token {
            Box::new(StaticToken::new(token.clone()))
        } else if let Some(ref header) = self.cookie_header {
            Box::new(CookieHeaderToken::with_name(
                header.clone(),
                self.cookie_name.clone(),
            ))
        } else {
            Box::new(NoToken)
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/socknet/conductor.toml` or
/// `~/.config/socknet/conductor.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("socknet").join("conductor.toml"))
}

/// Load configuration from all sources with proper priority
///
/// CLI overrides are not handled here; apply [`ConfigOverrides`] afterwards.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<ConductorSettings, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ConductorSettings, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration reading environment values through `env`
fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ConductorSettings, ConfigError> {
    // Start with defaults
    let mut config = ConductorSettings::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: SocknetToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config, env);

    Ok(config)
}

/// Apply TOML configuration values to the settings
fn apply_toml_config(config: &mut ConductorSettings, toml: &SocknetToml) {
    if toml.backend.base_url.is_some() {
        config.base_url = toml.backend.base_url.clone();
    }
    if let Some(ref endpoint) = toml.backend.endpoint {
        config.endpoint = endpoint.clone();
    }
    if toml.backend.request_timeout_ms.is_some() {
        config.request_timeout_ms = toml.backend.request_timeout_ms;
    }

    if toml.identity.author_id.is_some() {
        config.author_id = toml.identity.author_id.clone();
    }

    if toml.csrf.token.is_some() {
        config.csrf_token = toml.csrf.token.clone();
    }
    if toml.csrf.cookie_header.is_some() {
        config.cookie_header = toml.csrf.cookie_header.clone();
    }
    if let Some(ref name) = toml.csrf.cookie_name {
        config.cookie_name = name.clone();
    }
}

/// Apply environment variable overrides to the settings
fn apply_env_config(config: &mut ConductorSettings, env: impl Fn(&str) -> Option<String>) {
    if let Some(url) = env("SOCKNET_BASE_URL") {
        config.base_url = Some(url);
        config.source = ConfigSource::Env;
    }
    if let Some(endpoint) = env("SOCKNET_ENDPOINT") {
        config.endpoint = endpoint;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("SOCKNET_REQUEST_TIMEOUT_MS") {
        if let Ok(ms) = timeout.parse::<u64>() {
            config.request_timeout_ms = Some(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(author) = env("SOCKNET_AUTHOR_ID") {
        config.author_id = Some(author);
        config.source = ConfigSource::Env;
    }
    if let Some(token) = env("SOCKNET_CSRF_TOKEN") {
        config.csrf_token = Some(token);
        config.source = ConfigSource::Env;
    }
    if let Some(cookie) = env("SOCKNET_COOKIE") {
        config.cookie_header = Some(cookie);
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Command-line overrides, applied last
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Base URL override
    pub base_url: Option<String>,

    /// Endpoint override
    pub endpoint: Option<String>,

    /// Author id override
    pub author_id: Option<String>,

    /// CSRF token override
    pub csrf_token: Option<String>,

    /// Cookie header override
    pub cookie_header: Option<String>,

    /// Request timeout override
    pub request_timeout_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set endpoint override
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set author id override
    #[must_use]
    pub fn with_author_id(mut self, author: impl Into<String>) -> Self {
        self.author_id = Some(author.into());
        self
    }

    /// Set CSRF token override
    #[must_use]
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Set cookie header override
    #[must_use]
    pub fn with_cookie_header(mut self, header: impl Into<String>) -> Self {
        self.cookie_header = Some(header.into());
        self
    }

    /// Set request timeout override
    #[must_use]
    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = Some(ms);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base_url.is_none()
            && self.endpoint.is_none()
            && self.author_id.is_none()
            && self.csrf_token.is_none()
            && self.cookie_header.is_none()
            && self.request_timeout_ms.is_none()
    }

    /// Apply overrides to the settings
    pub fn apply(&self, config: &mut ConductorSettings) {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref url) = self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(ref endpoint) = self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(ref author) = self.author_id {
            config.author_id = Some(author.clone());
        }
        if let Some(ref token) = self.csrf_token {
            config.csrf_token = Some(token.clone());
        }
        if let Some(ref header) = self.cookie_header {
            config.cookie_header = Some(header.clone());
        }
        if let Some(ms) = self.request_timeout_ms {
            config.request_timeout_ms = Some(ms);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const AUTHOR: &str = "6f1d2c8e-8d0b-4a44-a3a3-1c2b9f0e7d55";

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ConductorSettings::default();
        assert_eq!(config.endpoint, "friends");
        assert_eq!(config.cookie_name, "csrftoken");
        assert!(config.base_url.is_none());
        assert!(config.request_timeout_ms.is_none());
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("socknet/conductor.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(&format!(
            r#"
[backend]
base_url = "http://localhost:8000"
endpoint = "profile"
request_timeout_ms = 5000

[identity]
author_id = "{AUTHOR}"

[csrf]
cookie_header = "csrftoken=abc"
"#
        ));

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.endpoint, "profile");
        assert_eq!(config.request_timeout_ms, Some(5000));
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));

        let controller = config.controller_config().unwrap();
        assert_eq!(
            controller.endpoint_url(),
            format!("http://localhost:8000/profile/{AUTHOR}/")
        );
        assert_eq!(controller.request_timeout, Some(Duration::from_millis(5000)));
        assert_eq!(config.token_source().token().unwrap().as_str(), "abc");
    }

    #[test]
    fn test_parse_empty_toml() {
        let file = write_toml("");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.endpoint, "friends");
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/socknet/conductor.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[backend\nbase_url = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml(
            r#"
[backend]
base_url = "http://file.example"
"#,
        );
        let env = env_from(&[
            ("SOCKNET_BASE_URL", "http://env.example"),
            ("SOCKNET_AUTHOR_ID", AUTHOR),
            ("SOCKNET_REQUEST_TIMEOUT_MS", "not-a-number"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://env.example"));
        assert_eq!(config.author_id.as_deref(), Some(AUTHOR));
        assert!(config.request_timeout_ms.is_none());
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = env_from(&[("SOCKNET_BASE_URL", "http://env.example")]);
        let mut config = load_config_with_env(None, env).unwrap();

        ConfigOverrides::new()
            .with_base_url("http://cli.example")
            .with_csrf_token("cli-token")
            .apply(&mut config);

        assert_eq!(config.base_url.as_deref(), Some("http://cli.example"));
        assert_eq!(config.source(), ConfigSource::Cli);
        assert_eq!(config.token_source().token().unwrap().as_str(), "cli-token");
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = ConductorSettings::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_missing_author_rejected() {
        let mut config = ConductorSettings::default();
        config.base_url = Some("http://localhost".to_string());
        assert!(matches!(
            config.controller_config(),
            Err(ConfigError::ValidationError(_))
        ));

        config.author_id = Some("bogus".to_string());
        assert!(matches!(
            config.controller_config(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_page_endpoint_needs_base_url() {
        let mut config = ConductorSettings::default();
        config.author_id = Some(AUTHOR.to_string());
        assert!(config.controller_config().is_err());

        config.endpoint = "https://sock.net/friends/x/".to_string();
        let controller = config.controller_config().unwrap();
        assert_eq!(controller.endpoint_url(), "https://sock.net/friends/x/");
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let mut config = ConductorSettings::default();
        config.author_id = Some(AUTHOR.to_string());
        config.base_url = Some("http://localhost".to_string());
        config.endpoint = "timeline".to_string();
        assert!(config.controller_config().is_err());
    }

    #[test]
    fn test_zero_timeout_means_default() {
        let mut config = ConductorSettings::default();
        config.author_id = Some(AUTHOR.to_string());
        config.base_url = Some("http://localhost".to_string());
        config.request_timeout_ms = Some(0);
        assert!(config.controller_config().unwrap().request_timeout.is_none());
    }

    #[test]
    fn test_token_source_precedence() {
        let mut config = ConductorSettings::default();
        assert!(config.token_source().token().is_none());

        config.cookie_header = Some("session=1; my_token=fromcookie".to_string());
        config.cookie_name = "my_token".to_string();
        assert_eq!(config.token_source().token().unwrap().as_str(), "fromcookie");

        config.csrf_token = Some("fixed".to_string());
        assert_eq!(config.token_source().token().unwrap().as_str(), "fixed");
    }

    #[test]
    fn test_config_error_display() {
        let read_err = ConfigError::ReadError {
            path: PathBuf::from("/test/path"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(read_err.to_string().contains("/test/path"));

        let validation_err = ConfigError::ValidationError("invalid value".to_string());
        assert!(validation_err.to_string().contains("invalid value"));
    }
}
