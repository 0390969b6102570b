//! The dictionary-lookup capability injected into dictionary-based scoring.
//!
//! The attacks only depend on the [`Dictionary`] trait; [`WordSet`] is the
//! bundled implementation, a trie over the 26-letter uppercase alphabet
//! which can be filled from any word list.

use crate::{letter_index, Error, ALPHABET_LEN};
use std::io::BufRead;

/// An injected natural-language dictionary: answers whether a token is a
/// recognized word.
pub trait Dictionary {
    /// Whether the dictionary recognizes `token`.
    ///
    /// # Errors
    ///
    /// Implementations backed by external services may fail; failures are
    /// surfaced as [`Error::Scoring`] and must never be converted into a
    /// "not a word" answer.
    fn check(&self, token: &str) -> Result<bool, Error>;
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn check(&self, token: &str) -> Result<bool, Error> {
        (**self).check(token)
    }
}

/// Index into the node arena; the root is always node zero.
type NodeIndex = usize;

/// A trie node holding links to child nodes, one per letter.
#[derive(Clone)]
struct Node {
    children: [Option<NodeIndex>; ALPHABET_LEN],
    terminal: bool,
}

impl Node {
    fn new() -> Self {
        Self {
            children: [None; ALPHABET_LEN],
            terminal: false,
        }
    }
}

/// A set of uppercase words stored as a trie.
///
/// Lookups never allocate; words sharing prefixes share nodes.
pub struct WordSet {
    nodes: Vec<Node>,
}

impl WordSet {
    /// Initializes an empty word set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
        }
    }

    /// Reads a word list, one or more words per line, inserting every token.
    /// Letters are uppercased and characters outside A-Z are dropped, so a
    /// plain `/usr/share/dict/words` style file works as-is.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying reader.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, std::io::Error> {
        let mut set = Self::new();
        for line in reader.lines() {
            for token in line?.split_whitespace() {
                let word: String = token
                    .chars()
                    .filter(char::is_ascii_alphabetic)
                    .map(|c| c.to_ascii_uppercase())
                    .collect();
                if !word.is_empty() {
                    set.insert_letters(word.chars().map(letter_index));
                }
            }
        }
        Ok(set)
    }

    /// Creates a new node and returns its index.
    fn create(&mut self) -> NodeIndex {
        self.nodes.push(Node::new());
        self.nodes.len() - 1
    }

    /// Inserts a word into the set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the word contains characters
    /// outside A-Z.
    pub fn insert(&mut self, word: &str) -> Result<(), Error> {
        if let Some(c) = word.chars().find(|c| !c.is_ascii_uppercase()) {
            return Err(Error::InvalidFormat(c));
        }
        self.insert_letters(word.chars().map(letter_index));
        Ok(())
    }

    /// Inserts a word given as alphabet indices. Callers must have validated
    /// the indices; this path cannot fail.
    fn insert_letters(&mut self, letters: impl Iterator<Item = usize>) {
        let mut node = 0; // Root node index
        for i in letters {
            node = match self.nodes[node].children[i] {
                Some(next) => next,
                None => {
                    let next = self.create();
                    self.nodes[node].children[i] = Some(next);
                    next
                }
            };
        }
        self.nodes[node].terminal = true;
    }

    /// Whether the set contains a word. Words with characters outside A-Z
    /// are never contained.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        let mut node = 0; // Root node index
        for c in word.chars() {
            if !c.is_ascii_uppercase() {
                return false;
            }
            match self.nodes[node].children[letter_index(c)] {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.nodes[node].terminal
    }
}

impl Default for WordSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for WordSet {
    fn check(&self, token: &str) -> Result<bool, Error> {
        Ok(self.contains(token))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_insertion_not_contained() {
        let set = WordSet::new();
        assert!(!set.contains("HELLO"));
        assert!(!set.contains(""));
    }

    #[test]
    fn insertion_contained() {
        let mut set = WordSet::new();
        set.insert("HELLO").unwrap();
        assert!(set.contains("HELLO"));
        assert!(!set.contains("HELL"));
        assert!(!set.contains("HELLOS"));
    }

    #[test]
    fn prefix_words_are_tracked_separately() {
        let mut set = WordSet::new();
        set.insert("HELLO").unwrap();
        set.insert("HELL").unwrap();
        assert!(set.contains("HELL"));
        assert!(set.contains("HELLO"));
        assert!(!set.contains("HEL"));
    }

    #[test]
    fn insert_rejects_words_outside_the_alphabet() {
        let mut set = WordSet::new();
        assert!(matches!(
            set.insert("hello"),
            Err(Error::InvalidFormat('h'))
        ));
        assert!(matches!(set.insert("A-B"), Err(Error::InvalidFormat('-'))));
    }

    #[test]
    fn from_reader_uppercases_and_strips_punctuation() {
        let words = b"hello\nWorld, again!\n".as_slice();
        let set = WordSet::from_reader(words).unwrap();
        assert!(set.contains("HELLO"));
        assert!(set.contains("WORLD"));
        assert!(set.contains("AGAIN"));
        assert!(!set.contains("COFFEE"));
    }

    #[test]
    fn from_reader_skips_tokens_with_no_letters() {
        let words = b"--- 42\nhello\n".as_slice();
        let set = WordSet::from_reader(words).unwrap();
        assert!(set.contains("HELLO"));
        assert!(!set.contains(""));
    }

    #[test]
    fn check_never_fails_for_word_sets() {
        let mut set = WordSet::new();
        set.insert("WORD").unwrap();
        assert!(set.check("WORD").unwrap());
        assert!(!set.check("word").unwrap());
    }
}
