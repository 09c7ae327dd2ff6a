//! Secret key material shared by the issuer and validator.

use base64::{Engine, engine::general_purpose::STANDARD};
use crypto_secretbox::XSalsa20Poly1305;
use crypto_secretbox::aead::{KeyInit, OsRng};
use std::fmt;

use tollgate_common::TollgateError;
use tollgate_common::constants::KEY_BYTES;

/// Fixed-length symmetric key. Read-only for the life of the process.
#[derive(Clone)]
pub struct SecretKey([u8; KEY_BYTES]);

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Decode a key from standard (padded) base64
    pub fn from_base64(encoded: &str) -> Result<Self, TollgateError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| TollgateError::InvalidKey(format!("not valid base64: {e}")))?;

        let bytes: [u8; KEY_BYTES] = bytes.try_into().map_err(|b: Vec<u8>| {
            TollgateError::InvalidKey(format!(
                "expected {KEY_BYTES} bytes, got {}",
                b.len()
            ))
        })?;

        Ok(Self::from_bytes(bytes))
    }

    /// Generate a fresh key from the OS random source
    pub fn generate() -> Self {
        let key = XSalsa20Poly1305::generate_key(&mut OsRng);
        Self(key.into())
    }

    /// Encode in the same format `from_base64` accepts
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}
