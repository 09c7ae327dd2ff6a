//! # Tollgate Common
//!
//! Shared types, constants, and errors used across Tollgate components.
//!
//! ## Modules
//! - `types` - Core data structures (Locale, TokenPayload, ResultCode, etc.)
//! - `error` - Configuration errors and the validation failure taxonomy
//! - `constants` - Shared configuration constants

pub mod constants;
pub mod error;
pub mod types;

pub use error::{TollgateError, ValidationFailure};
pub use types::*;
