//! Key types and the key-space contract.
//!
//! Every cipher key implements [`Key`]: a checked constructor wraps a raw
//! value, the type can produce its identity key, draw uniformly random keys,
//! and lazily enumerate its key space in a fixed canonical order. Key spaces
//! are never materialized; the substitution space alone has 26! elements and
//! the bit-string space is unbounded.

use crate::{index_letter, letter_index, Error, ALPHABET_LEN};
use rand::prelude::*;
use rand::rngs::OsRng;
use std::fmt;
use std::str::FromStr;

/// A lazy enumeration of keys. Consumers may stop pulling at any point.
pub type KeySpace<K> = Box<dyn Iterator<Item = K>>;

/// Default maximum string-key length used when no bound is given to
/// [`VigenereKey::random`].
pub const DEFAULT_STRING_KEY_LEN: usize = 20;

/// Default bit length used when no bound is given to [`PadKey::random`].
pub const DEFAULT_PAD_BITS: usize = 64;

/// Contract for one cipher key type.
///
/// Equality and hashing are value-based so keys can be used as map keys and
/// set members. Randomness comes from the operating system ([`OsRng`]);
/// callers must not assume determinism from [`Key::random`].
pub trait Key: Clone + Eq + std::hash::Hash + fmt::Debug + fmt::Display + Sized + 'static {
    /// The underlying raw representation of the key.
    type Value;

    /// The underlying value of this key.
    fn value(&self) -> Self::Value;

    /// Whether a raw value is a member of this type's key space.
    /// Fails closed: anything of the wrong shape, alphabet or cardinality
    /// is rejected.
    fn contains(value: &Self::Value) -> bool;

    /// Self-check against the key-space membership predicate.
    fn is_valid(&self) -> bool {
        Self::contains(&self.value())
    }

    /// The no-op key: encrypting with it leaves any message unchanged.
    fn identity() -> Self;

    /// Draws one key uniformly from the key space.
    ///
    /// For key types without a natural finite space, `bound` caps the key
    /// length (string length or bit length) and a documented default is used
    /// when `None`. Finite spaces ignore `bound`.
    fn random(bound: Option<usize>) -> Self;

    /// Enumerates every valid key exactly once, lazily, in a fixed canonical
    /// order. Each call starts a fresh sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnboundedKeySpace`] when the key space has no natural
    /// finite size and no `bound` was given.
    fn space(bound: Option<usize>) -> Result<KeySpace<Self>, Error>;

    /// Cardinality of the (bounded) key space. Matches the number of keys an
    /// exhaustive [`Key::space`] enumeration yields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnboundedKeySpace`] when a required `bound` is
    /// missing, or [`Error::SpaceTooLarge`] when the cardinality does not
    /// fit in 128 bits.
    fn space_size(bound: Option<usize>) -> Result<u128, Error>;
}

/// Caesar cipher key: a rotation amount in `[0, 26)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ShiftKey(u8);

impl ShiftKey {
    /// Wraps a rotation amount as a key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if `value` is not below 26.
    pub fn new(value: u8) -> Result<Self, Error> {
        Self::contains(&value)
            .then_some(Self(value))
            .ok_or(Error::InvalidKey)
    }
}

impl Key for ShiftKey {
    type Value = u8;

    fn value(&self) -> u8 {
        self.0
    }

    fn contains(value: &u8) -> bool {
        usize::from(*value) < ALPHABET_LEN
    }

    fn identity() -> Self {
        Self(0)
    }

    fn random(_bound: Option<usize>) -> Self {
        Self(OsRng.gen_range(0..26))
    }

    fn space(_bound: Option<usize>) -> Result<KeySpace<Self>, Error> {
        Ok(Box::new((0..26).map(Self)))
    }

    fn space_size(_bound: Option<usize>) -> Result<u128, Error> {
        Ok(ALPHABET_LEN as u128)
    }
}

impl Default for ShiftKey {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ShiftKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let value: u8 = s.parse().map_err(|_| Error::InvalidKey)?;
        Self::new(value)
    }
}

/// Substitution cipher key: a permutation of the alphabet, mapping the
/// plaintext letter at each index to a ciphertext letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubstitutionKey([u8; ALPHABET_LEN]);

impl SubstitutionKey {
    /// Wraps a permutation table as a key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] unless `table` contains every uppercase
    /// letter exactly once.
    pub fn new(table: [u8; ALPHABET_LEN]) -> Result<Self, Error> {
        Self::contains(&table)
            .then_some(Self(table))
            .ok_or(Error::InvalidKey)
    }

    /// Builds a key from a 26-letter string listing the images of A through Z
    /// in order, e.g. `"QWERTYUIOPASDFGHJKLZXCVBNM"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if `alphabet` is not a permutation of
    /// the uppercase alphabet.
    pub fn from_alphabet(alphabet: &str) -> Result<Self, Error> {
        let table: [u8; ALPHABET_LEN] = alphabet
            .as_bytes()
            .try_into()
            .map_err(|_| Error::InvalidKey)?;
        Self::new(table)
    }

    /// The ciphertext letter this key maps a plaintext letter to.
    pub(crate) fn forward(&self, c: char) -> char {
        self.0[letter_index(c)] as char
    }

    /// The inverse mapping, for decryption.
    pub(crate) fn inverse(&self) -> [u8; ALPHABET_LEN] {
        let mut inv = [0; ALPHABET_LEN];
        for (i, &c) in self.0.iter().enumerate() {
            inv[(c - b'A') as usize] = b'A' + i as u8;
        }
        inv
    }
}

impl Key for SubstitutionKey {
    type Value = [u8; ALPHABET_LEN];

    fn value(&self) -> [u8; ALPHABET_LEN] {
        self.0
    }

    fn contains(value: &[u8; ALPHABET_LEN]) -> bool {
        let mut seen = [false; ALPHABET_LEN];
        for &c in value {
            if !c.is_ascii_uppercase() {
                return false;
            }
            let i = (c - b'A') as usize;
            if seen[i] {
                return false;
            }
            seen[i] = true;
        }
        // 26 distinct uppercase letters cover the whole alphabet.
        true
    }

    fn identity() -> Self {
        let mut table = [0; ALPHABET_LEN];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = b'A' + i as u8;
        }
        Self(table)
    }

    fn random(_bound: Option<usize>) -> Self {
        let mut table = Self::identity().0;
        table.shuffle(&mut OsRng);
        Self(table)
    }

    fn space(_bound: Option<usize>) -> Result<KeySpace<Self>, Error> {
        Ok(Box::new(Permutations {
            next: Some(Self::identity().0),
        }))
    }

    fn space_size(_bound: Option<usize>) -> Result<u128, Error> {
        Ok((1..=ALPHABET_LEN as u128).product())
    }
}

impl Default for SubstitutionKey {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for SubstitutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &c in &self.0 {
            write!(f, "{}", c as char)?;
        }
        Ok(())
    }
}

impl FromStr for SubstitutionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_alphabet(s)
    }
}

/// Lexicographic enumeration of alphabet permutations, starting from the
/// identity table.
struct Permutations {
    next: Option<[u8; ALPHABET_LEN]>,
}

impl Iterator for Permutations {
    type Item = SubstitutionKey;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = next_permutation(current);
        Some(SubstitutionKey(current))
    }
}

/// Standard next-permutation step; `None` once `table` is the last
/// (descending) permutation.
fn next_permutation(mut table: [u8; ALPHABET_LEN]) -> Option<[u8; ALPHABET_LEN]> {
    let i = (0..ALPHABET_LEN - 1).rfind(|&i| table[i] < table[i + 1])?;
    // A larger element always exists to the right of the pivot.
    let j = (i + 1..ALPHABET_LEN)
        .rfind(|&j| table[j] > table[i])
        .unwrap_or(i + 1);
    table.swap(i, j);
    table[i + 1..].reverse();
    Some(table)
}

/// Vigenere cipher key: a non-empty string of uppercase letters.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct VigenereKey(String);

impl VigenereKey {
    /// Wraps a key string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if `value` is empty or contains
    /// anything but uppercase letters.
    pub fn new(value: String) -> Result<Self, Error> {
        Self::contains(&value)
            .then_some(Self(value))
            .ok_or(Error::InvalidKey)
    }

    /// The key string's letters as alphabet indices.
    pub(crate) fn shifts(&self) -> impl Iterator<Item = usize> + Clone + '_ {
        self.0.chars().map(letter_index)
    }
}

impl Key for VigenereKey {
    type Value = String;

    fn value(&self) -> String {
        self.0.clone()
    }

    fn contains(value: &String) -> bool {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_uppercase())
    }

    fn identity() -> Self {
        Self("A".into())
    }

    fn random(bound: Option<usize>) -> Self {
        let max_len = bound.unwrap_or(DEFAULT_STRING_KEY_LEN).max(1);
        let len = OsRng.gen_range(1..=max_len);
        let key = (0..len)
            .map(|_| index_letter(OsRng.gen_range(0..26)))
            .collect();
        Self(key)
    }

    fn space(bound: Option<usize>) -> Result<KeySpace<Self>, Error> {
        let max_len = bound.ok_or(Error::UnboundedKeySpace)?;
        Ok(Box::new(StringKeys {
            max_len,
            digits: Vec::new(),
            done: max_len == 0,
        }))
    }

    fn space_size(bound: Option<usize>) -> Result<u128, Error> {
        let max_len = bound.ok_or(Error::UnboundedKeySpace)?;
        let mut total: u128 = 0;
        let mut count: u128 = 1;
        for _ in 0..max_len {
            count = count
                .checked_mul(ALPHABET_LEN as u128)
                .ok_or(Error::SpaceTooLarge(max_len))?;
            total = total
                .checked_add(count)
                .ok_or(Error::SpaceTooLarge(max_len))?;
        }
        Ok(total)
    }
}

impl Default for VigenereKey {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for VigenereKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for VigenereKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::new(s.into())
    }
}

/// Shortest-first, then lexicographic, enumeration of uppercase strings up
/// to a maximum length. The digit vector is the next key as alphabet indices.
struct StringKeys {
    max_len: usize,
    digits: Vec<u8>,
    done: bool,
}

impl Iterator for StringKeys {
    type Item = VigenereKey;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.digits.is_empty() {
            self.digits.push(0);
        } else {
            // Increment base-26 from the least significant digit, growing
            // the length when every digit carries over.
            let mut i = self.digits.len();
            while i > 0 {
                i -= 1;
                if self.digits[i] < 25 {
                    self.digits[i] += 1;
                    break;
                }
                self.digits[i] = 0;
                if i == 0 {
                    if self.digits.len() == self.max_len {
                        self.done = true;
                        return None;
                    }
                    self.digits.push(0);
                }
            }
        }
        Some(VigenereKey(
            self.digits.iter().map(|&d| index_letter(d)).collect(),
        ))
    }
}

/// Pad cipher key: a bit string, stored as its value and bit length.
///
/// The space of all bit strings is unbounded, so enumeration requires an
/// explicit bit-length bound.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PadKey {
    bits: u128,
    len: u32,
}

/// Maximum bit length a [`PadKey`] can hold.
pub const MAX_PAD_BITS: u32 = u128::BITS;

impl PadKey {
    /// Wraps a bit string given as its value and bit length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if `len` is zero, exceeds 128, or
    /// `bits` has bits set beyond `len`.
    pub fn new(bits: u128, len: u32) -> Result<Self, Error> {
        Self::contains(&(bits, len))
            .then_some(Self { bits, len })
            .ok_or(Error::InvalidKey)
    }

    /// The key's bit length.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the bit string is all zeroes (an identity keystream).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// The key's bytes, least significant first, as a cycling keystream
    /// source. A key of `len` bits has `ceil(len / 8)` bytes.
    pub(crate) fn bytes(&self) -> Vec<u8> {
        let n = (self.len as usize).div_ceil(8);
        (0..n).map(|i| (self.bits >> (8 * i)) as u8).collect()
    }
}

impl Key for PadKey {
    type Value = (u128, u32);

    fn value(&self) -> (u128, u32) {
        (self.bits, self.len)
    }

    fn contains(value: &(u128, u32)) -> bool {
        let (bits, len) = *value;
        if len == 0 || len > MAX_PAD_BITS {
            return false;
        }
        len == MAX_PAD_BITS || bits < (1 << len)
    }

    fn identity() -> Self {
        Self { bits: 0, len: 1 }
    }

    fn random(bound: Option<usize>) -> Self {
        let len = u32::try_from(bound.unwrap_or(DEFAULT_PAD_BITS))
            .unwrap_or(MAX_PAD_BITS)
            .clamp(1, MAX_PAD_BITS);
        let mask = if len == MAX_PAD_BITS {
            u128::MAX
        } else {
            (1 << len) - 1
        };
        Self {
            bits: OsRng.gen::<u128>() & mask,
            len,
        }
    }

    fn space(bound: Option<usize>) -> Result<KeySpace<Self>, Error> {
        let bits = bound.ok_or(Error::UnboundedKeySpace)?;
        let count = Self::space_size(Some(bits))?;
        let len = u32::try_from(bits).map_err(|_| Error::SpaceTooLarge(bits))?;
        Ok(Box::new((0..count).map(move |bits| Self { bits, len })))
    }

    fn space_size(bound: Option<usize>) -> Result<u128, Error> {
        let len = bound.ok_or(Error::UnboundedKeySpace)?;
        if len == 0 {
            return Ok(0);
        }
        if len >= MAX_PAD_BITS as usize {
            return Err(Error::SpaceTooLarge(len));
        }
        Ok(1 << len)
    }
}

impl Default for PadKey {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for PadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            write!(f, "{}", (self.bits >> i) & 1)?;
        }
        Ok(())
    }
}

impl FromStr for PadKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let len = u32::try_from(s.len()).map_err(|_| Error::InvalidKey)?;
        let mut bits: u128 = 0;
        for c in s.chars() {
            let bit = match c {
                '0' => 0,
                '1' => 1,
                _ => return Err(Error::InvalidKey),
            };
            bits = bits.checked_shl(1).ok_or(Error::InvalidKey)? | bit;
        }
        Self::new(bits, len)
    }
}
