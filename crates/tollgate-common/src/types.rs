//! Core types shared across Tollgate components.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::result_codes;
use crate::error::TollgateError;

/// Supported challenge languages.
///
/// Each variant owns one question bank. Unknown tags are rejected when
/// parsed, so a `Locale` value always has a bank behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// German
    De,
    /// French
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::De, Locale::Fr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::De => "de",
            Self::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = TollgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "de" => Ok(Self::De),
            "fr" => Ok(Self::Fr),
            other => Err(TollgateError::UnsupportedLocale(other.to_string())),
        }
    }
}

/// Plaintext sealed inside every token.
///
/// All four fields are required and no others are accepted, so a payload
/// that deserializes is also structurally valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenPayload {
    /// Exact expected answer
    pub solution: String,

    /// Network identity of the requester at issuance time
    pub client_ip: String,

    /// Issuance timestamp (Unix epoch seconds)
    pub valid_from: i64,

    /// Expiry timestamp (Unix epoch seconds)
    pub valid_until: i64,
}

/// Result code reported to the client after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultCode {
    Ok,
    ValidationFailed,
    WrongAnswer,
}

impl ResultCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => result_codes::OK,
            Self::ValidationFailed => result_codes::VALIDATION_FAILED,
            Self::WrongAnswer => result_codes::WRONG_ANSWER,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issued challenge sent to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// Sealed token to send back with the answer
    pub token: String,

    /// Question shown to the user
    pub challenge: String,

    /// Language of the question
    pub lang: Locale,
}

/// Verification outcome sent to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub result: ResultCode,

    /// Current locale, so the widget can render the failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<Locale>,
}
