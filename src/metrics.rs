//! Pure scoring metrics over messages.
//!
//! The attack pipeline selects keys with [`cosine_similarity`] against the
//! English reference frequencies and [`ratio_tokens_in_dict`];
//! [`positional_similarity`] and [`distributional_similarity`] are
//! diagnostics for reporting how close a recovered message came to a known
//! original.

use crate::dict::Dictionary;
use crate::{letter_index, Error, ALPHABET_LEN};

/// Relative frequencies of the letters A through Z in English text,
/// from standard published tables. Read-only reference data, not derived
/// at runtime.
pub const ENGLISH_LETTER_FREQUENCIES: [f64; ALPHABET_LEN] = [
    0.08167, 0.01492, 0.02782, 0.04253, 0.12702, 0.02228, 0.02015, 0.06094, 0.06966, 0.00153,
    0.00772, 0.04025, 0.02406, 0.06749, 0.07507, 0.01929, 0.00095, 0.05987, 0.06327, 0.09056,
    0.02758, 0.00978, 0.02360, 0.00150, 0.01974, 0.00074,
];

/// Counts the occurrences of each letter A-Z in a message, ignoring
/// whitespace, as a 26-element frequency vector.
#[must_use]
pub fn letter_distribution(m: &str) -> [f64; ALPHABET_LEN] {
    let mut dist = [0.0; ALPHABET_LEN];
    for c in m.chars().filter(|c| c.is_ascii_uppercase()) {
        dist[letter_index(c)] += 1.0;
    }
    dist
}

/// Cosine similarity between two vectors: `dot(a, b) / (‖a‖·‖b‖)`, in the
/// range `[0, 1]` for non-negative vectors. Defined as `0.0` when either
/// vector has zero magnitude, so empty messages never produce a NaN score.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// The fraction of whitespace-delimited tokens in a message that the
/// dictionary recognizes, in the range `[0, 1]`. A message with no tokens
/// scores `0.0`.
///
/// # Errors
///
/// Dictionary lookup failures propagate as [`Error::Scoring`]; the ratio is
/// never substituted with a default on failure.
pub fn ratio_tokens_in_dict(m: &str, dict: &impl Dictionary) -> Result<f64, Error> {
    let mut total = 0usize;
    let mut hits = 0usize;
    for token in m.split_whitespace() {
        total += 1;
        if dict.check(token)? {
            hits += 1;
        }
    }
    if total == 0 {
        return Ok(0.0);
    }
    Ok(hits as f64 / total as f64)
}

/// The fraction of character positions at which two messages agree,
/// comparing up to the shorter message's length. `0.0` when either message
/// is empty. Diagnostic only; not used for key selection.
#[must_use]
pub fn positional_similarity(m1: &str, m2: &str) -> f64 {
    let len = m1.chars().count().min(m2.chars().count());
    if len == 0 {
        return 0.0;
    }
    let matching = m1.chars().zip(m2.chars()).filter(|(a, b)| a == b).count();
    matching as f64 / len as f64
}

/// Cosine similarity of the letter frequency distributions of two messages.
/// Diagnostic only; not used for key selection.
#[must_use]
pub fn distributional_similarity(m1: &str, m2: &str) -> f64 {
    cosine_similarity(&letter_distribution(m1), &letter_distribution(m2))
}
