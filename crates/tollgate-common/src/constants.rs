//! Shared constants for Tollgate components.

/// Default Tollgate HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8888";

/// Default token validity window (3 minutes)
pub const DEFAULT_EXPIRY_SECS: u64 = 180;

/// Default locale rotation period (1 minute)
pub const DEFAULT_LOCALE_ROTATION_SECS: u64 = 60;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Secret key length in bytes (secretbox key size)
pub const KEY_BYTES: usize = 32;

/// Separator between the base64 segments of a sealed token
pub const TOKEN_SEPARATOR: char = '.';

/// Counting puzzle parameters
pub mod puzzle {
    /// Total length of every generated word
    pub const WORD_LEN: usize = 8;

    /// Upper bound (inclusive) for the number of target letters in a word
    pub const MAX_TARGET_LETTERS: usize = 5;

    /// Uppercase target letters (no I or L)
    pub const UPPER_TARGETS: &str = "ABCDEFGHJKMNOPQRSTUVWXYZ";

    /// Lowercase target letters (no i or l)
    pub const LOWER_TARGETS: &str = "abcdefghjkmnopqrstuvwxyz";

    /// Filler for the upper word: nothing here is uppercase
    pub const UPPER_WORD_FILLER: &str = "0123456789abcdefghjkmnopqrstuvwxyz";

    /// Filler for the lower word: nothing here is lowercase, and no `I` or
    /// `L` that reads as `l` or `i`
    pub const LOWER_WORD_FILLER: &str = "0123456789ABCDEFGHJKMNOPQRSTUVWXYZ";
}

/// Form field names submitted by the browser widget
pub mod fields {
    /// Hidden input carrying the sealed token
    pub const TOKEN: &str = "simple-captcha-token";

    /// Hidden input carrying the user's answer
    pub const RESPONSE: &str = "simple-captcha-response";
}

/// Caller-visible result codes
pub mod result_codes {
    pub const OK: &str = "ok";
    pub const VALIDATION_FAILED: &str = "validation-failed";
    pub const WRONG_ANSWER: &str = "wrong-answer";
}
