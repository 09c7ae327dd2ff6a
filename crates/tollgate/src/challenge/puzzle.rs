//! Letter-counting puzzles.
//!
//! Each puzzle yields two words of fixed length: one seeded with a random
//! number of uppercase letters, one with a random number of lowercase
//! letters. The filler for each word is drawn from a pool that contains no
//! letter of the counted case, so the count is exactly the number seeded.

use rand::Rng;
use rand::seq::SliceRandom;

use tollgate_common::constants::puzzle::{
    LOWER_TARGETS, LOWER_WORD_FILLER, MAX_TARGET_LETTERS, UPPER_TARGETS, UPPER_WORD_FILLER,
    WORD_LEN,
};

/// A generated pair of counting words with their answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingPuzzle {
    /// Word whose uppercase letters are counted
    pub upper_word: String,
    pub upper_count: usize,

    /// Word whose lowercase letters are counted
    pub lower_word: String,
    pub lower_count: usize,
}

impl CountingPuzzle {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let upper_count = rng.random_range(0..=MAX_TARGET_LETTERS);
        let lower_count = rng.random_range(0..=MAX_TARGET_LETTERS);
        Self::with_counts(rng, upper_count, lower_count)
    }

    /// Build a puzzle with the given target counts, capped at
    /// `MAX_TARGET_LETTERS`
    pub fn with_counts<R: Rng + ?Sized>(rng: &mut R, upper_count: usize, lower_count: usize) -> Self {
        let upper_count = upper_count.min(MAX_TARGET_LETTERS);
        let lower_count = lower_count.min(MAX_TARGET_LETTERS);
        Self {
            upper_word: build_word(rng, UPPER_TARGETS, upper_count, UPPER_WORD_FILLER),
            upper_count,
            lower_word: build_word(rng, LOWER_TARGETS, lower_count, LOWER_WORD_FILLER),
            lower_count,
        }
    }

    /// Canonical answer for the uppercase question
    pub fn upper_solution(&self) -> String {
        self.upper_count.to_string()
    }

    /// Canonical answer for the lowercase question
    pub fn lower_solution(&self) -> String {
        self.lower_count.to_string()
    }
}

/// `count` distinct letters from `targets` plus distinct filler up to
/// `WORD_LEN`, shuffled together
fn build_word<R: Rng + ?Sized>(rng: &mut R, targets: &str, count: usize, filler: &str) -> String {
    let mut chars = take_distinct(rng, targets, count);
    chars.extend(take_distinct(rng, filler, WORD_LEN - count));
    chars.shuffle(rng);
    chars.into_iter().collect()
}

fn take_distinct<R: Rng + ?Sized>(rng: &mut R, pool: &str, n: usize) -> Vec<char> {
    let mut pool: Vec<char> = pool.chars().collect();
    pool.shuffle(rng);
    pool.truncate(n);
    pool
}
