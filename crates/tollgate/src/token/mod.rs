//! Stateless sealed tokens.
//!
//! Everything needed to check an answer later travels inside the token:
//! the expected solution, the client it was issued to, and its validity
//! window. The server keeps nothing between issuing and validating.

mod codec;
mod issuer;
mod key;
mod validator;

pub use codec::TokenCodec;
pub use issuer::TokenIssuer;
pub use key::SecretKey;
pub use validator::TokenValidator;
