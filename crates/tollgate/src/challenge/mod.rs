//! Challenge generation.
//!
//! A challenge is a question plus its exact answer. Only the answer leaves
//! this module in sealed form; the question goes to the client in clear.

mod bank;
mod puzzle;
mod rotation;

pub use bank::QuestionBank;
pub use rotation::LocaleRotation;

use rand::Rng;
use tollgate_common::Locale;

/// Question text paired with the answer the validator will compare against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub text: String,
    pub solution: String,
}

/// Pick one challenge uniformly from the locale's fixed and generated
/// questions
pub fn generate<R: Rng + ?Sized>(locale: Locale, rng: &mut R) -> Challenge {
    let mut candidates = QuestionBank::for_locale(locale).candidates(rng);
    let idx = rng.random_range(0..candidates.len());
    candidates.swap_remove(idx)
}
