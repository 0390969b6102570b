//! Ciphertext-only attacks: sample candidate keys, decrypt, score, keep the
//! best.
//!
//! The three variants share one control flow and differ only in how a
//! candidate decryption is scored. Scores are in `[0, 1]`; iteration stops
//! early once a candidate scores above [`EARLY_EXIT_THRESHOLD`].

use crate::cipher::Cipher;
use crate::dict::Dictionary;
use crate::metrics::{
    cosine_similarity, letter_distribution, ratio_tokens_in_dict, ENGLISH_LETTER_FREQUENCIES,
};
use crate::sampling::SamplingStrategy;
use crate::{Error, ALPHABET_LEN};

/// Score above which an attack stops sampling further keys. Fixed rather
/// than configurable so different call sites behave identically.
pub const EARLY_EXIT_THRESHOLD: f64 = 0.99;

/// Core search loop shared by all attack variants.
///
/// Keys are pulled one at a time, each candidate decryption is scored, and
/// only strict improvements replace the current best, so under exhaustive
/// sampling ties deterministically keep the earliest key. A scoring failure
/// aborts the whole attack; substituting a default score would silently
/// bias key selection.
fn search<C, S, F>(
    strategy: &S,
    ciphertext: &str,
    bound: Option<usize>,
    mut score: F,
) -> Result<(String, C::Key), Error>
where
    C: Cipher,
    S: SamplingStrategy,
    F: FnMut(&str) -> Result<f64, Error>,
{
    let cipher = C::default();
    let mut best: Option<(f64, String, C::Key)> = None;

    for key in strategy.sample::<C::Key>(bound)? {
        let message = cipher.decrypt_with(ciphertext, &key)?;
        let score = score(&message)?;

        let improved = match &best {
            Some((b, ..)) => score > *b,
            None => true,
        };
        if improved {
            best = Some((score, message, key));
        }
        if matches!(&best, Some((b, ..)) if *b > EARLY_EXIT_THRESHOLD) {
            break;
        }
    }

    best.map(|(_, message, key)| (message, key))
        .ok_or(Error::EmptyKeySpace)
}

/// Guesses the key by comparing each candidate decryption's letter
/// distribution against the English reference frequencies.
#[derive(Debug)]
pub struct LetterFrequencyAttack<S> {
    strategy: S,
    reference: [f64; ALPHABET_LEN],
}

impl<S: SamplingStrategy> LetterFrequencyAttack<S> {
    /// Creates the attack with a sampling strategy.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            reference: ENGLISH_LETTER_FREQUENCIES,
        }
    }

    /// Recovers the most plausible (message, key) pair from a ciphertext.
    ///
    /// `bound` is forwarded to the key space for key types that need one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKeySpace`] if the strategy yields no keys, or
    /// any error surfaced by sampling or decryption.
    pub fn from_cipher<C: Cipher>(
        &self,
        ciphertext: &str,
        bound: Option<usize>,
    ) -> Result<(String, C::Key), Error> {
        search::<C, _, _>(&self.strategy, ciphertext, bound, |m| {
            Ok(cosine_similarity(&self.reference, &letter_distribution(m)))
        })
    }
}

/// Guesses the key by the fraction of candidate tokens an injected
/// dictionary recognizes.
#[derive(Debug)]
pub struct DictionaryAttack<S, D> {
    strategy: S,
    dict: D,
}

impl<S: SamplingStrategy, D: Dictionary> DictionaryAttack<S, D> {
    /// Creates the attack with a sampling strategy and a dictionary.
    pub fn new(strategy: S, dict: D) -> Self {
        Self { strategy, dict }
    }

    /// Recovers the most plausible (message, key) pair from a ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKeySpace`] if the strategy yields no keys;
    /// dictionary failures propagate as [`Error::Scoring`] and abort the
    /// attack.
    pub fn from_cipher<C: Cipher>(
        &self,
        ciphertext: &str,
        bound: Option<usize>,
    ) -> Result<(String, C::Key), Error> {
        search::<C, _, _>(&self.strategy, ciphertext, bound, |m| {
            ratio_tokens_in_dict(m, &self.dict)
        })
    }
}

/// Combines [`LetterFrequencyAttack`] and [`DictionaryAttack`] scoring into
/// a weighted sum.
///
/// The default equal weights are inherited configuration, not a derived
/// optimum; tune them with [`LanguageAnalysisAttack::with_weights`] if one
/// signal should dominate.
#[derive(Debug)]
pub struct LanguageAnalysisAttack<S, D> {
    strategy: S,
    dict: D,
    frequency_weight: f64,
    dictionary_weight: f64,
}

/// Default weight of the letter-frequency score in [`LanguageAnalysisAttack`].
pub const DEFAULT_FREQUENCY_WEIGHT: f64 = 0.5;

/// Default weight of the dictionary score in [`LanguageAnalysisAttack`].
pub const DEFAULT_DICTIONARY_WEIGHT: f64 = 0.5;

impl<S: SamplingStrategy, D: Dictionary> LanguageAnalysisAttack<S, D> {
    /// Creates the attack with a sampling strategy and a dictionary, using
    /// the default equal weights.
    pub fn new(strategy: S, dict: D) -> Self {
        Self {
            strategy,
            dict,
            frequency_weight: DEFAULT_FREQUENCY_WEIGHT,
            dictionary_weight: DEFAULT_DICTIONARY_WEIGHT,
        }
    }

    /// Overrides the scoring weights. For scores to stay in `[0, 1]` the
    /// weights should sum to one.
    #[must_use]
    pub fn with_weights(mut self, frequency: f64, dictionary: f64) -> Self {
        self.frequency_weight = frequency;
        self.dictionary_weight = dictionary;
        self
    }

    /// Recovers the most plausible (message, key) pair from a ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKeySpace`] if the strategy yields no keys;
    /// dictionary failures propagate as [`Error::Scoring`] and abort the
    /// attack.
    pub fn from_cipher<C: Cipher>(
        &self,
        ciphertext: &str,
        bound: Option<usize>,
    ) -> Result<(String, C::Key), Error> {
        search::<C, _, _>(&self.strategy, ciphertext, bound, |m| {
            let frequency = cosine_similarity(&ENGLISH_LETTER_FREQUENCIES, &letter_distribution(m));
            let dictionary = ratio_tokens_in_dict(m, &self.dict)?;
            Ok(self.frequency_weight * frequency + self.dictionary_weight * dictionary)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cipher::CaesarCipher;
    use crate::dict::WordSet;
    use crate::key::{Key, KeySpace, ShiftKey};
    use crate::metrics::positional_similarity;
    use crate::sampling::ExhaustiveSampling;
    use std::cell::Cell;
    use std::rc::Rc;

    const MESSAGE: &str = "HELLO WORLD";

    /// Long enough that English letter statistics dominate; short texts
    /// like "HELLO WORLD" can rank a wrong shift above the true one.
    const LONG_MESSAGE: &str = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG \
        AND THEN RESTS IN THE SHADE OF A TALL GREEN TREE NEAR THE RIVER";

    fn shift_five(message: &str) -> String {
        let cipher = CaesarCipher::default();
        cipher
            .encrypt_with(message, &ShiftKey::new(5).unwrap())
            .unwrap()
    }

    fn shift_five_ciphertext() -> String {
        shift_five(MESSAGE)
    }

    fn hello_world_dict() -> WordSet {
        let mut dict = WordSet::new();
        dict.insert("HELLO").unwrap();
        dict.insert("WORLD").unwrap();
        dict
    }

    /// Wraps a strategy and counts how many keys consumers actually pull.
    struct CountingStrategy<S> {
        inner: S,
        pulled: Rc<Cell<usize>>,
    }

    impl<S: SamplingStrategy> SamplingStrategy for CountingStrategy<S> {
        fn sample<K: Key>(&self, bound: Option<usize>) -> Result<KeySpace<K>, Error> {
            let pulled = Rc::clone(&self.pulled);
            Ok(Box::new(self.inner.sample::<K>(bound)?.map(move |key| {
                pulled.set(pulled.get() + 1);
                key
            })))
        }
    }

    /// A strategy which yields nothing at all.
    struct EmptySampling;

    impl SamplingStrategy for EmptySampling {
        fn sample<K: Key>(&self, _bound: Option<usize>) -> Result<KeySpace<K>, Error> {
            Ok(Box::new(std::iter::empty()))
        }
    }

    /// A dictionary whose backing service is down.
    struct BrokenDictionary;

    impl Dictionary for BrokenDictionary {
        fn check(&self, _token: &str) -> Result<bool, Error> {
            Err(Error::Scoring(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "dictionary service unavailable",
            ))))
        }
    }

    #[test]
    fn letter_frequency_attack_recovers_a_caesar_shift() {
        let attack = LetterFrequencyAttack::new(ExhaustiveSampling);
        let (message, key) = attack
            .from_cipher::<CaesarCipher>(&shift_five(LONG_MESSAGE), None)
            .unwrap();

        // Frequency scoring is statistical, so assert a near match rather
        // than exact equality.
        assert!(
            positional_similarity(&message, LONG_MESSAGE) >= 0.8,
            "recovered {message:?} with key {key}"
        );
        assert!(key.is_valid());
    }

    #[test]
    fn dictionary_attack_recovers_a_caesar_shift_exactly() {
        let attack = DictionaryAttack::new(ExhaustiveSampling, hello_world_dict());
        let (message, key) = attack
            .from_cipher::<CaesarCipher>(&shift_five_ciphertext(), None)
            .unwrap();

        assert_eq!(message, MESSAGE);
        assert_eq!(key, ShiftKey::new(5).unwrap());
    }

    #[test]
    fn language_analysis_attack_recovers_a_caesar_shift() {
        let attack = LanguageAnalysisAttack::new(ExhaustiveSampling, hello_world_dict());
        let (message, key) = attack
            .from_cipher::<CaesarCipher>(&shift_five_ciphertext(), None)
            .unwrap();

        assert_eq!(message, MESSAGE);
        assert_eq!(key, ShiftKey::new(5).unwrap());
    }

    #[test]
    fn early_exit_stops_pulling_keys_after_a_confident_match() {
        let pulled = Rc::new(Cell::new(0));
        let strategy = CountingStrategy {
            inner: ExhaustiveSampling,
            pulled: Rc::clone(&pulled),
        };
        let attack = DictionaryAttack::new(strategy, hello_world_dict());
        attack
            .from_cipher::<CaesarCipher>(&shift_five_ciphertext(), None)
            .unwrap();

        // Shifts 0 through 4 score 0.0; shift 5 scores 1.0 and trips the
        // early exit, so exactly six keys are drawn out of 26.
        assert_eq!(pulled.get(), 6);
    }

    #[test]
    fn empty_key_space_is_an_error_not_a_null_pair() {
        let attack = DictionaryAttack::new(EmptySampling, hello_world_dict());
        let result = attack.from_cipher::<CaesarCipher>("ABC", None);
        assert!(matches!(result, Err(Error::EmptyKeySpace)));
    }

    #[test]
    fn scoring_failures_abort_the_attack() {
        let attack = DictionaryAttack::new(ExhaustiveSampling, BrokenDictionary);
        let result = attack.from_cipher::<CaesarCipher>("ABC", None);
        assert!(matches!(result, Err(Error::Scoring(_))));
    }

    #[test]
    fn ties_keep_the_earliest_candidate() {
        // An empty dictionary scores every decryption 0.0, so the first
        // sampled key (shift 0) must win.
        let attack = DictionaryAttack::new(ExhaustiveSampling, WordSet::new());
        let (message, key) = attack
            .from_cipher::<CaesarCipher>("QQQ", None)
            .unwrap();
        assert_eq!(key, ShiftKey::identity());
        assert_eq!(message, "QQQ");
    }

    #[test]
    fn weights_are_tunable() {
        // All weight on the dictionary signal reduces to the dictionary
        // attack's choice.
        let attack = LanguageAnalysisAttack::new(ExhaustiveSampling, hello_world_dict())
            .with_weights(0.0, 1.0);
        let (message, _) = attack
            .from_cipher::<CaesarCipher>(&shift_five_ciphertext(), None)
            .unwrap();
        assert_eq!(message, MESSAGE);
    }
}
