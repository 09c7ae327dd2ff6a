//! Application state and shared resources.

use anyhow::{Context, Result};
use axum::http::{HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;

use crate::challenge::LocaleRotation;
use crate::config::AppConfig;
use crate::token::{SecretKey, TokenCodec, TokenIssuer, TokenValidator};

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Token issuer
    pub issuer: Arc<TokenIssuer>,

    /// Token validator
    pub validator: Arc<TokenValidator>,

    /// Locale chooser
    pub rotation: Arc<LocaleRotation>,

    /// Origins reflected in CORS responses
    pub allowed_origins: Vec<HeaderValue>,

    /// Trusted header carrying the client address, if any
    pub client_ip_header: Option<HeaderName>,
}

impl AppState {
    /// Build state from validated configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let key = match config.key.as_deref() {
            Some(encoded) => SecretKey::from_base64(encoded).context("Failed to load secret key")?,
            None => {
                tracing::warn!("No secret key configured, using ephemeral key (tokens will not survive a restart)");
                SecretKey::generate()
            }
        };

        let rotation = LocaleRotation::new(
            config.captcha.parsed_locales()?,
            config.captcha.locale_rotation_secs,
        )?;

        let allowed_origins = config
            .http
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid allowed origin: {origin}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let client_ip_header = config
            .http
            .client_ip_header
            .as_deref()
            .map(|name| {
                HeaderName::try_from(name)
                    .with_context(|| format!("Invalid client IP header name: {name}"))
            })
            .transpose()?;

        // Issuer and validator share one key
        let codec = TokenCodec::new(key);
        let issuer = Arc::new(TokenIssuer::new(codec.clone(), config.captcha.expiry_secs));
        let validator = Arc::new(TokenValidator::new(codec));

        Ok(Self {
            config: Arc::new(config),
            issuer,
            validator,
            rotation: Arc::new(rotation),
            allowed_origins,
            client_ip_header,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.http.request_timeout_secs)
    }
}
