//! Cipher implementations and the contract the attacks consume.
//!
//! Ciphers operate on messages of uppercase letters and whitespace only, and
//! all of them satisfy three guarantees for every key in their key space:
//! round-trip symmetry (`decrypt(encrypt(m, k), k) == m`), identity
//! transparency (`encrypt(m, identity) == m`) and validity preservation
//! (ciphertexts stay inside the restricted alphabet).

use crate::key::{Key, PadKey, ShiftKey, SubstitutionKey, VigenereKey};
use crate::{index_letter, letter_index, validate, Error, ALPHABET_LEN};

/// Contract for a cipher, generic over its key type.
///
/// The attack pipeline only uses this trait: it instantiates the cipher with
/// [`Default`] (configured with the identity key) and decrypts with
/// explicitly sampled candidate keys via [`Cipher::decrypt_with`].
pub trait Cipher: Default {
    /// The key type this cipher is keyed by.
    type Key: Key;

    /// The currently configured key.
    fn key(&self) -> &Self::Key;

    /// Encrypts a message with an explicit key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] before any transformation work if
    /// the message contains characters outside the restricted alphabet.
    fn encrypt_with(&self, m: &str, key: &Self::Key) -> Result<String, Error>;

    /// Decrypts a ciphertext with an explicit key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] before any transformation work if
    /// the ciphertext contains characters outside the restricted alphabet.
    fn decrypt_with(&self, c: &str, key: &Self::Key) -> Result<String, Error>;

    /// Encrypts a message with the configured key.
    ///
    /// # Errors
    ///
    /// See [`Cipher::encrypt_with`].
    fn encrypt(&self, m: &str) -> Result<String, Error> {
        self.encrypt_with(m, self.key())
    }

    /// Decrypts a ciphertext with the configured key.
    ///
    /// # Errors
    ///
    /// See [`Cipher::decrypt_with`].
    fn decrypt(&self, c: &str) -> Result<String, Error> {
        self.decrypt_with(c, self.key())
    }

    /// Checks that a message or ciphertext is in a valid format.
    #[must_use]
    fn is_valid(x: &str) -> bool {
        crate::is_valid(x)
    }
}

/// Shifts a single letter forward by `shift` positions, wrapping at 'Z'.
fn shift_letter(c: char, shift: usize) -> char {
    index_letter(((letter_index(c) + shift) % ALPHABET_LEN) as u8)
}

/// Shifts a single letter backward by `shift` positions, wrapping at 'A'.
fn unshift_letter(c: char, shift: usize) -> char {
    index_letter(((letter_index(c) + ALPHABET_LEN - shift % ALPHABET_LEN) % ALPHABET_LEN) as u8)
}

/// The Caesar cipher: every letter is rotated by the key's shift amount.
/// Whitespace passes through untouched.
#[derive(Debug, Default)]
pub struct CaesarCipher {
    key: ShiftKey,
}

impl CaesarCipher {
    /// Creates a Caesar cipher configured with `key`.
    #[must_use]
    pub fn new(key: ShiftKey) -> Self {
        Self { key }
    }
}

impl Cipher for CaesarCipher {
    type Key = ShiftKey;

    fn key(&self) -> &ShiftKey {
        &self.key
    }

    fn encrypt_with(&self, m: &str, key: &ShiftKey) -> Result<String, Error> {
        validate(m)?;
        let shift = usize::from(key.value());
        Ok(m.chars()
            .map(|c| {
                if c.is_whitespace() {
                    c
                } else {
                    shift_letter(c, shift)
                }
            })
            .collect())
    }

    fn decrypt_with(&self, c: &str, key: &ShiftKey) -> Result<String, Error> {
        validate(c)?;
        let shift = usize::from(key.value());
        Ok(c.chars()
            .map(|c| {
                if c.is_whitespace() {
                    c
                } else {
                    unshift_letter(c, shift)
                }
            })
            .collect())
    }
}

/// The simple substitution cipher: every letter is replaced through the
/// key's permutation table. Whitespace passes through untouched.
#[derive(Debug, Default)]
pub struct SubstitutionCipher {
    key: SubstitutionKey,
}

impl SubstitutionCipher {
    /// Creates a substitution cipher configured with `key`.
    #[must_use]
    pub fn new(key: SubstitutionKey) -> Self {
        Self { key }
    }
}

impl Cipher for SubstitutionCipher {
    type Key = SubstitutionKey;

    fn key(&self) -> &SubstitutionKey {
        &self.key
    }

    fn encrypt_with(&self, m: &str, key: &SubstitutionKey) -> Result<String, Error> {
        validate(m)?;
        Ok(m.chars()
            .map(|c| if c.is_whitespace() { c } else { key.forward(c) })
            .collect())
    }

    fn decrypt_with(&self, c: &str, key: &SubstitutionKey) -> Result<String, Error> {
        validate(c)?;
        let inverse = key.inverse();
        Ok(c.chars()
            .map(|c| {
                if c.is_whitespace() {
                    c
                } else {
                    inverse[letter_index(c)] as char
                }
            })
            .collect())
    }
}

/// The Vigenere cipher: letters are shifted by the key string's letters in
/// turn, cycling. Whitespace passes through and does not advance the key.
#[derive(Debug, Default)]
pub struct VigenereCipher {
    key: VigenereKey,
}

impl VigenereCipher {
    /// Creates a Vigenere cipher configured with `key`.
    #[must_use]
    pub fn new(key: VigenereKey) -> Self {
        Self { key }
    }

    fn transform(text: &str, key: &VigenereKey, decrypt: bool) -> Result<String, Error> {
        validate(text)?;
        let mut shifts = key.shifts().cycle();
        Ok(text
            .chars()
            .map(|c| {
                if c.is_whitespace() {
                    return c;
                }
                // Cycling a non-empty iterator never runs out.
                let shift = shifts.next().unwrap_or(0);
                if decrypt {
                    unshift_letter(c, shift)
                } else {
                    shift_letter(c, shift)
                }
            })
            .collect())
    }
}

impl Cipher for VigenereCipher {
    type Key = VigenereKey;

    fn key(&self) -> &VigenereKey {
        &self.key
    }

    fn encrypt_with(&self, m: &str, key: &VigenereKey) -> Result<String, Error> {
        Self::transform(m, key, false)
    }

    fn decrypt_with(&self, c: &str, key: &VigenereKey) -> Result<String, Error> {
        Self::transform(c, key, true)
    }
}

/// A pad cipher keyed by a bit string: the key's bytes form a cycling
/// keystream and each letter is shifted by the next byte reduced mod 26.
/// Whitespace passes through and does not consume keystream.
///
/// Used with a single random key of at least the message's length in bits
/// this is a one-time-pad construction over the restricted alphabet; used
/// with shorter keys it degrades to a running-key cipher.
#[derive(Debug, Default)]
pub struct OneTimePadCipher {
    key: PadKey,
}

impl OneTimePadCipher {
    /// Creates a pad cipher configured with `key`.
    #[must_use]
    pub fn new(key: PadKey) -> Self {
        Self { key }
    }

    fn transform(text: &str, key: &PadKey, decrypt: bool) -> Result<String, Error> {
        validate(text)?;
        let bytes = key.bytes();
        let mut stream = bytes.iter().cycle();
        Ok(text
            .chars()
            .map(|c| {
                if c.is_whitespace() {
                    return c;
                }
                // A valid pad key always has at least one byte.
                let shift = usize::from(*stream.next().unwrap_or(&0)) % ALPHABET_LEN;
                if decrypt {
                    unshift_letter(c, shift)
                } else {
                    shift_letter(c, shift)
                }
            })
            .collect())
    }
}

impl Cipher for OneTimePadCipher {
    type Key = PadKey;

    fn key(&self) -> &PadKey {
        &self.key
    }

    fn encrypt_with(&self, m: &str, key: &PadKey) -> Result<String, Error> {
        Self::transform(m, key, false)
    }

    fn decrypt_with(&self, c: &str, key: &PadKey) -> Result<String, Error> {
        Self::transform(c, key, true)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MESSAGE: &str = "HELLO WORLD";

    fn assert_round_trip<C: Cipher>(cipher: &C, key: &C::Key) {
        let c = cipher.encrypt_with(MESSAGE, key).unwrap();
        assert!(C::is_valid(&c), "ciphertext {c:?} left the alphabet");
        assert_eq!(cipher.decrypt_with(&c, key).unwrap(), MESSAGE);
    }

    #[test]
    fn caesar_round_trips_over_its_whole_key_space() {
        let cipher = CaesarCipher::default();
        for key in ShiftKey::space(None).unwrap() {
            assert_round_trip(&cipher, &key);
        }
    }

    #[test]
    fn caesar_shift_five_matches_known_ciphertext() {
        let cipher = CaesarCipher::default();
        let key = ShiftKey::new(5).unwrap();
        assert_eq!(cipher.encrypt_with(MESSAGE, &key).unwrap(), "MJQQT BTWQI");
    }

    #[test]
    fn substitution_round_trips_with_sampled_keys() {
        let cipher = SubstitutionCipher::default();
        for _ in 0..5 {
            assert_round_trip(&cipher, &SubstitutionKey::random(None));
        }
        assert_round_trip(
            &cipher,
            &SubstitutionKey::from_alphabet("QWERTYUIOPASDFGHJKLZXCVBNM").unwrap(),
        );
    }

    #[test]
    fn vigenere_round_trips_with_sampled_keys() {
        let cipher = VigenereCipher::default();
        for _ in 0..5 {
            assert_round_trip(&cipher, &VigenereKey::random(Some(8)));
        }
        assert_round_trip(&cipher, &VigenereKey::new("LEMON".into()).unwrap());
    }

    #[test]
    fn vigenere_whitespace_does_not_advance_the_key() {
        let cipher = VigenereCipher::default();
        let key = VigenereKey::new("AB".into()).unwrap();
        // A=0, B=1: letters alternate shift 0 and 1 across the space.
        assert_eq!(cipher.encrypt_with("AA AA", &key).unwrap(), "AB AB");
    }

    #[test]
    fn pad_round_trips_with_sampled_keys() {
        let cipher = OneTimePadCipher::default();
        for _ in 0..5 {
            assert_round_trip(&cipher, &PadKey::random(Some(64)));
        }
        assert_round_trip(&cipher, &PadKey::new(0b1011_0001, 8).unwrap());
    }

    #[test]
    fn identity_keys_are_transparent() {
        assert_eq!(
            CaesarCipher::default().encrypt(MESSAGE).unwrap(),
            MESSAGE
        );
        assert_eq!(
            SubstitutionCipher::default().encrypt(MESSAGE).unwrap(),
            MESSAGE
        );
        assert_eq!(
            VigenereCipher::default().encrypt(MESSAGE).unwrap(),
            MESSAGE
        );
        assert_eq!(
            OneTimePadCipher::default().encrypt(MESSAGE).unwrap(),
            MESSAGE
        );
    }

    #[test]
    fn invalid_input_is_rejected_before_any_work() {
        let cipher = CaesarCipher::default();
        assert!(matches!(
            cipher.encrypt("hello"),
            Err(Error::InvalidFormat('h'))
        ));
        assert!(matches!(
            cipher.decrypt("HELLO!"),
            Err(Error::InvalidFormat('!'))
        ));
    }

    #[test]
    fn configured_key_is_used_when_no_key_is_given() {
        let key = ShiftKey::new(3).unwrap();
        let cipher = CaesarCipher::new(key);
        assert_eq!(cipher.key(), &key);
        assert_eq!(cipher.encrypt("ABC").unwrap(), "DEF");
        assert_eq!(cipher.decrypt("DEF").unwrap(), "ABC");
    }
}
