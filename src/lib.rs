//! Library for breaking classical substitution-style ciphers by searching
//! their key spaces and scoring candidate decryptions.
//!
//! The building blocks are a [`Key`](key::Key) contract over heterogeneous
//! key representations, lazy [sampling strategies](sampling) over their key
//! spaces, pure [scoring metrics](metrics), and three [attack](attack)
//! variants that combine them.

// Forbid unsafe code (https://doc.rust-lang.org/book/ch19-01-unsafe-rust.html)
#![forbid(unsafe_code)]
// Disallow all missing docs and rustdoc lints
#![deny(missing_docs)]
#![deny(rustdoc::all)]
// Error from most clippy warnings (https://github.com/rust-lang/rust-clippy)
#![deny(clippy::all)]
// Warnings from pedantic clippy lints
#![warn(clippy::pedantic)]
// Warnings about missing Cargo.toml fields
#![warn(clippy::cargo)]
// More about lint levels https://doc.rust-lang.org/rustc/lints/levels.html

pub mod attack;
pub mod cipher;
pub mod dict;
pub mod key;
pub mod metrics;
pub mod sampling;

/// Number of letters in the message alphabet (A-Z).
pub const ALPHABET_LEN: usize = 26;

/// Errors which library operations can return.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A message or ciphertext contains a character outside the restricted
    /// alphabet of uppercase letters and whitespace.
    #[error(
        "invalid character {0:?}: messages must contain only uppercase letters and whitespace"
    )]
    InvalidFormat(char),
    /// A raw value failed a key type's key-space membership check.
    #[error("value is not in the key space")]
    InvalidKey,
    /// A sampling strategy produced no candidate keys.
    #[error("sampling produced no candidate keys")]
    EmptyKeySpace,
    /// An unbounded key space was enumerated without a bound.
    #[error("key space has no finite size, a bound is required")]
    UnboundedKeySpace,
    /// A bound so large that the key space cardinality overflows.
    #[error("key space size for bound {0} does not fit in 128 bits")]
    SpaceTooLarge(usize),
    /// A scoring dependency (such as a dictionary lookup) failed.
    #[error("scoring failed")]
    Scoring(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Checks that a message or ciphertext is in a valid format:
/// uppercase ASCII letters (A-Z) and whitespace only.
#[must_use]
pub fn is_valid(x: &str) -> bool {
    x.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_whitespace())
}

/// Checks a message or ciphertext against [`is_valid`], reporting the first
/// offending character. Ciphers call this before doing any transformation.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] if any character is outside the alphabet.
pub fn validate(x: &str) -> Result<(), Error> {
    match x
        .chars()
        .find(|c| !(c.is_ascii_uppercase() || c.is_whitespace()))
    {
        Some(c) => Err(Error::InvalidFormat(c)),
        None => Ok(()),
    }
}

/// Index of an uppercase letter in the alphabet, `'A'` being zero.
pub(crate) fn letter_index(c: char) -> usize {
    (c as u8 - b'A') as usize
}

/// The uppercase letter at an alphabet index in `0..26`.
pub(crate) fn index_letter(i: u8) -> char {
    (b'A' + i) as char
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn is_valid_accepts_uppercase_and_whitespace() {
        assert!(is_valid("HELLO WORLD"));
        assert!(is_valid(""));
        assert!(is_valid("A B\tC"));
    }

    #[test]
    fn is_valid_rejects_lowercase_digits_and_punctuation() {
        assert!(!is_valid("Hello World"));
        assert!(!is_valid("HELLO1"));
        assert!(!is_valid("HELLO, WORLD!"));
    }

    #[test]
    fn validate_reports_first_offending_character() {
        assert!(matches!(validate("HEL?LO"), Err(Error::InvalidFormat('?'))));
        assert!(validate("HELLO WORLD").is_ok());
    }
}
