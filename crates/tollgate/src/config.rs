//! Configuration management for Tollgate.

use anyhow::{Context, Result};
use serde::Deserialize;

use tollgate_common::constants::{
    DEFAULT_EXPIRY_SECS, DEFAULT_LISTEN_ADDR, DEFAULT_LOCALE_ROTATION_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use tollgate_common::{Locale, TollgateError};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Secret key, standard base64 (ephemeral key generated if unset)
    #[serde(default)]
    pub key: Option<String>,

    /// CAPTCHA configuration
    #[serde(default)]
    pub captcha: CaptchaConfig,

    /// HTTP transport configuration
    #[serde(default)]
    pub http: HttpConfig,
}

/// CAPTCHA-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    /// Token validity in seconds
    #[serde(default = "default_expiry")]
    pub expiry_secs: u64,

    /// Locales to rotate through
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Seconds each locale stays active
    #[serde(default = "default_rotation")]
    pub locale_rotation_secs: u64,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            expiry_secs: default_expiry(),
            locales: default_locales(),
            locale_rotation_secs: default_rotation(),
        }
    }
}

impl CaptchaConfig {
    /// Parse the configured locale tags. Any unknown tag is fatal.
    pub fn parsed_locales(&self) -> Result<Vec<Locale>, TollgateError> {
        self.locales.iter().map(|tag| tag.parse()).collect()
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Origins allowed to call the API cross-origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Header carrying the client address when behind a proxy
    /// (e.g. `X-Forwarded-For`). Peer address is used when unset.
    #[serde(default)]
    pub client_ip_header: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            client_ip_header: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_expiry() -> u64 { DEFAULT_EXPIRY_SECS } // 3 minutes
fn default_locales() -> Vec<String> { vec!["de".to_string(), "fr".to_string()] }
fn default_rotation() -> u64 { DEFAULT_LOCALE_ROTATION_SECS }
fn default_allowed_origins() -> Vec<String> { vec!["http://localhost:8002".to_string()] }
fn default_request_timeout() -> u64 { DEFAULT_REQUEST_TIMEOUT_SECS }

impl AppConfig {
    /// Load configuration from file and `TOLLGATE__*` environment
    /// variables, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("TOLLGATE").separator("__"))
            .build()
            .context("Failed to load config file")?;

        let mut config: Self = settings
            .try_deserialize()
            .context("Failed to parse config")?;

        // Apply CLI overrides
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(ref key) = args.key {
            config.key = Some(key.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that could only fail later, at request time
    pub fn validate(&self) -> Result<(), TollgateError> {
        if self.captcha.expiry_secs == 0 {
            return Err(TollgateError::Config("captcha.expiry_secs must be positive".into()));
        }
        if self.captcha.expiry_secs > i64::MAX as u64 {
            return Err(TollgateError::Config("captcha.expiry_secs is too large".into()));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(TollgateError::Config(
                "http.request_timeout_secs must be positive".into(),
            ));
        }
        self.captcha.parsed_locales()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            key: None,
            captcha: CaptchaConfig::default(),
            http: HttpConfig::default(),
        }
    }
}
