//! Sealed token codec.
//!
//! Token format: `base64url(tag).base64url(nonce).base64url(ciphertext)`
//!
//! - `ciphertext` is an XSalsa20-Poly1305 secretbox of the payload
//! - `tag` is HMAC-SHA-512/256 over the literal `nonce.ciphertext` text
//!
//! The outer tag covers the *encoded* nonce and ciphertext together, so a
//! nonce lifted from one token cannot be spliced onto another token's
//! ciphertext even though both are individually well formed.
//!
//! The construction matches libsodium's `crypto_secretbox` + `crypto_auth`,
//! so tokens are interchangeable with libsodium-based issuers sharing the key.

use base64::{Engine, engine::general_purpose::URL_SAFE};
use crypto_secretbox::XSalsa20Poly1305;
use crypto_secretbox::aead::{Aead, AeadCore, Key, KeyInit, Nonce, OsRng};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use thiserror::Error;

use tollgate_common::constants::TOKEN_SEPARATOR;

use super::SecretKey;

type HmacSha512 = Hmac<Sha512>;

/// Outer tag length (HMAC-SHA-512 truncated to 256 bits)
pub const AUTH_TAG_BYTES: usize = 32;

/// XSalsa20 nonce length
pub const NONCE_BYTES: usize = 24;

/// Reasons a token could not be sealed or unsealed.
///
/// None of these carry token contents; they are for server logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("{0} segment is not valid base64")]
    Encoding(&'static str),

    #[error("auth tag did not match")]
    AuthTag,

    #[error("ciphertext failed to decrypt")]
    Decrypt,

    #[error("encryption failed")]
    Encrypt,
}

/// Seals and unseals opaque tokens under one secret key
#[derive(Clone)]
pub struct TokenCodec {
    key: SecretKey,
}

impl TokenCodec {
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }

    /// Encrypt and authenticate `plaintext` into a token string
    pub fn seal(&self, plaintext: &[u8]) -> Result<String, TokenError> {
        // Fresh nonce from the OS CSPRNG on every call
        let nonce = XSalsa20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher()
            .encrypt(&nonce, plaintext)
            .map_err(|_| TokenError::Encrypt)?;

        let signed = format!(
            "{}{}{}",
            URL_SAFE.encode(nonce),
            TOKEN_SEPARATOR,
            URL_SAFE.encode(ciphertext)
        );
        let tag = self
            .auth_tag(signed.as_bytes())
            .map_err(|_| TokenError::Encrypt)?;

        Ok(format!("{}{}{}", URL_SAFE.encode(tag), TOKEN_SEPARATOR, signed))
    }

    /// Verify and decrypt a token produced by [`seal`](Self::seal)
    pub fn unseal(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let parts: Vec<&str> = token.split(TOKEN_SEPARATOR).collect();
        let &[encoded_tag, encoded_nonce, encoded_ciphertext] = parts.as_slice() else {
            return Err(TokenError::SegmentCount(parts.len()));
        };

        let tag = URL_SAFE
            .decode(encoded_tag)
            .map_err(|_| TokenError::Encoding("auth tag"))?;
        let nonce = URL_SAFE
            .decode(encoded_nonce)
            .map_err(|_| TokenError::Encoding("nonce"))?;
        let ciphertext = URL_SAFE
            .decode(encoded_ciphertext)
            .map_err(|_| TokenError::Encoding("ciphertext"))?;

        // Recompute over the segments exactly as received
        let signed = format!("{encoded_nonce}{TOKEN_SEPARATOR}{encoded_ciphertext}");
        let expected = self
            .auth_tag(signed.as_bytes())
            .map_err(|_| TokenError::AuthTag)?;
        // ct_eq on slices of different lengths is false
        if !bool::from(tag.as_slice().ct_eq(&expected[..])) {
            return Err(TokenError::AuthTag);
        }

        if nonce.len() != NONCE_BYTES {
            return Err(TokenError::Decrypt);
        }

        self.cipher()
            .decrypt(Nonce::<XSalsa20Poly1305>::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|_| TokenError::Decrypt)
    }

    fn cipher(&self) -> XSalsa20Poly1305 {
        XSalsa20Poly1305::new(Key::<XSalsa20Poly1305>::from_slice(self.key.as_bytes()))
    }

    /// HMAC takes keys of any length, so `InvalidLength` never occurs with a
    /// `SecretKey`; callers map it to their own failure kind.
    fn auth_tag(&self, message: &[u8]) -> Result<[u8; AUTH_TAG_BYTES], InvalidLength> {
        let mut mac = <HmacSha512 as Mac>::new_from_slice(self.key.as_bytes())?;
        mac.update(message);
        let full = mac.finalize().into_bytes();

        let mut tag = [0u8; AUTH_TAG_BYTES];
        tag.copy_from_slice(&full[..AUTH_TAG_BYTES]);
        Ok(tag)
    }
}
