//! Token validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. unseal (tag, nonce, decryption)
//! 2. parse the payload as JSON
//! 3. all four payload fields present with the right types
//! 4. not before `valid_from`
//! 5. not after `valid_until`
//! 6. same client as at issuance
//! 7. answer matches
//!
//! Only after 1-6 pass can a caller learn that the answer itself was wrong.

use subtle::ConstantTimeEq;
use tollgate_common::{TokenPayload, ValidationFailure};

use super::codec::TokenCodec;

/// Unseals tokens and checks a submitted answer against them
#[derive(Clone)]
pub struct TokenValidator {
    codec: TokenCodec,
}

impl TokenValidator {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    pub fn validate(
        &self,
        token: &str,
        user_answer: &str,
        client_ip: &str,
        now: i64,
    ) -> Result<(), ValidationFailure> {
        let payload = self.open(token)?;

        if now < payload.valid_from {
            tracing::warn!(
                valid_from = payload.valid_from,
                now,
                "Token is not yet valid"
            );
            return Err(ValidationFailure::TokenNotYetValid {
                valid_from: payload.valid_from,
                now,
            });
        }

        if now > payload.valid_until {
            tracing::warn!(
                valid_until = payload.valid_until,
                now,
                "Token has expired"
            );
            return Err(ValidationFailure::TokenExpired {
                valid_until: payload.valid_until,
                now,
            });
        }

        if !ct_str_eq(&payload.client_ip, client_ip) {
            tracing::warn!(client_ip = %client_ip, "Token was issued to a different client");
            return Err(ValidationFailure::ClientMismatch);
        }

        if !ct_str_eq(&payload.solution, user_answer) {
            tracing::warn!(client_ip = %client_ip, "Wrong answer to CAPTCHA challenge");
            return Err(ValidationFailure::WrongAnswer);
        }

        tracing::debug!(client_ip = %client_ip, "CAPTCHA verified successfully");
        Ok(())
    }

    /// Unseal and decode the payload (checks 1-3)
    fn open(&self, token: &str) -> Result<TokenPayload, ValidationFailure> {
        let plaintext = self.codec.unseal(token).map_err(|e| {
            tracing::warn!(reason = %e, "Failed to authenticate or decrypt token");
            ValidationFailure::TokenInvalid(e.to_string())
        })?;

        let value: serde_json::Value = serde_json::from_slice(&plaintext).map_err(|_| {
            tracing::warn!("Token payload is not valid JSON");
            ValidationFailure::TokenInvalid("invalid JSON".into())
        })?;

        serde_json::from_value(value).map_err(|e| {
            tracing::warn!(reason = %e, "Token payload has missing or improper fields");
            ValidationFailure::TokenInvalid("improper payload".into())
        })
    }
}

/// Constant-time string equality. Lengths are compared first; the length
/// of the expected value is not treated as secret.
fn ct_str_eq(expected: &str, given: &str) -> bool {
    expected.len() == given.len() && bool::from(expected.as_bytes().ct_eq(given.as_bytes()))
}
