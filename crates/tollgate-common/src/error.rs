//! Common error types for Tollgate components.

use thiserror::Error;

/// Configuration-level errors. These are fatal at startup and never
/// produced while serving a request.
#[derive(Debug, Error)]
pub enum TollgateError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Locale tag with no question bank
    #[error("Unsupported locale: '{0}'")]
    UnsupportedLocale(String),

    /// Secret key could not be decoded or has the wrong length
    #[error("Invalid secret key: {0}")]
    InvalidKey(String),
}

/// Why a submitted token/answer pair was rejected.
///
/// The variants are only distinguished in server logs. Clients see the
/// coarser [`ResultCode`](crate::ResultCode).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// Token failed to unseal or its payload is malformed
    #[error("token invalid: {0}")]
    TokenInvalid(String),

    /// Current time is before `valid_from`
    #[error("token not yet valid (valid from {valid_from}, now {now})")]
    TokenNotYetValid { valid_from: i64, now: i64 },

    /// Current time is after `valid_until`
    #[error("token expired (valid until {valid_until}, now {now})")]
    TokenExpired { valid_until: i64, now: i64 },

    /// Token was issued to a different client
    #[error("token was issued to a different client")]
    ClientMismatch,

    /// Answer does not match the embedded solution
    #[error("wrong answer")]
    WrongAnswer,
}

impl ValidationFailure {
    /// Returns the code reported to the client for this failure
    pub fn result_code(&self) -> crate::ResultCode {
        match self {
            Self::WrongAnswer => crate::ResultCode::WrongAnswer,
            _ => crate::ResultCode::ValidationFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultCode;

    #[test]
    fn test_only_wrong_answer_is_surfaced() {
        let collapsed = [
            ValidationFailure::TokenInvalid("bad".into()),
            ValidationFailure::TokenNotYetValid { valid_from: 2, now: 1 },
            ValidationFailure::TokenExpired { valid_until: 1, now: 2 },
            ValidationFailure::ClientMismatch,
        ];
        for failure in collapsed {
            assert_eq!(failure.result_code(), ResultCode::ValidationFailed);
        }
        assert_eq!(
            ValidationFailure::WrongAnswer.result_code(),
            ResultCode::WrongAnswer
        );
    }
}
