//! Token issuance.

use rand::Rng;
use thiserror::Error;
use tollgate_common::{Locale, TokenPayload};

use super::codec::{TokenCodec, TokenError};
use crate::challenge;

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Seal(#[from] TokenError),
}

/// Challenge text and the sealed token that carries its answer
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    pub token: String,
    pub challenge: String,
    pub locale: Locale,
}

/// Builds token payloads and seals them
#[derive(Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
    expiry_secs: u64,
}

impl TokenIssuer {
    pub fn new(codec: TokenCodec, expiry_secs: u64) -> Self {
        Self { codec, expiry_secs }
    }

    /// Issue a challenge for `client_ip` using the thread-local RNG
    pub fn issue(
        &self,
        client_ip: &str,
        locale: Locale,
        now: i64,
    ) -> Result<IssuedChallenge, IssueError> {
        self.issue_with(&mut rand::rng(), client_ip, locale, now)
    }

    /// Issue a challenge, drawing question selection from `rng`.
    ///
    /// The token nonce always comes from the OS random source.
    pub fn issue_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        client_ip: &str,
        locale: Locale,
        now: i64,
    ) -> Result<IssuedChallenge, IssueError> {
        let challenge = challenge::generate(locale, rng);

        let payload = TokenPayload {
            solution: challenge.solution,
            client_ip: client_ip.to_string(),
            valid_from: now,
            valid_until: now.saturating_add(self.expiry_secs as i64),
        };
        let token = self.seal_payload(&payload)?;

        tracing::debug!(
            client_ip = %client_ip,
            locale = %locale,
            valid_until = payload.valid_until,
            "Issued CAPTCHA token"
        );

        Ok(IssuedChallenge {
            token,
            challenge: challenge.text,
            locale,
        })
    }

    /// Serialize and seal an explicit payload
    pub fn seal_payload(&self, payload: &TokenPayload) -> Result<String, IssueError> {
        let plaintext = serde_json::to_vec(payload)?;
        Ok(self.codec.seal(&plaintext)?)
    }
}
