//! CLI program to encrypt, decrypt and attack classical ciphers.
//!
//! Run with --help for usage and options.

#![deny(rustdoc::all)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

use cipherbreak::attack::{DictionaryAttack, LanguageAnalysisAttack, LetterFrequencyAttack};
use cipherbreak::cipher::{
    CaesarCipher, Cipher, OneTimePadCipher, SubstitutionCipher, VigenereCipher,
};
use cipherbreak::dict::WordSet;
use cipherbreak::metrics;
use cipherbreak::sampling::{ExhaustiveSampling, RandomSampling, SamplingStrategy, DEFAULT_SAMPLES};
use clap::{ArgEnum, Parser};
use color_eyre::eyre::Context;
use color_eyre::Result;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

mod io;

/// Uppercases ASCII alphabetic characters and leaves out everything except
/// letters and whitespace, so free-form CLI input fits the cipher alphabet.
fn normalize_input(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphabetic() || c.is_whitespace() {
                Some(c.to_ascii_uppercase())
            } else {
                None
            }
        })
        .collect()
}

#[derive(Clone, Copy, ArgEnum)]
enum CipherKind {
    Caesar,
    Substitution,
    Vigenere,
    Pad,
}

#[derive(Clone, Copy, ArgEnum)]
enum AttackMethod {
    Frequency,
    Dictionary,
    Language,
}

#[derive(Clone, Copy, ArgEnum)]
enum Strategy {
    Exhaustive,
    Random,
}

/// Parses a key and runs one cipher in either direction.
fn transform<C: Cipher>(key: &str, input: &str, decrypt: bool) -> Result<String>
where
    C::Key: FromStr<Err = cipherbreak::Error>,
{
    let key: C::Key = key
        .parse()
        .wrap_err(format!("Cannot parse {key:?} as a key"))?;
    let cipher = C::default();
    let out = if decrypt {
        cipher.decrypt_with(input, &key)?
    } else {
        cipher.encrypt_with(input, &key)?
    };
    Ok(out)
}

fn run_cipher(cipher: CipherKind, key: &str, input: &str, decrypt: bool) -> Result<String> {
    match cipher {
        CipherKind::Caesar => transform::<CaesarCipher>(key, input, decrypt),
        CipherKind::Substitution => transform::<SubstitutionCipher>(key, input, decrypt),
        CipherKind::Vigenere => transform::<VigenereCipher>(key, input, decrypt),
        CipherKind::Pad => transform::<OneTimePadCipher>(key, input, decrypt),
    }
}

#[derive(Parser)]
struct Encrypt {
    /// Cipher to encrypt with
    #[clap(arg_enum)]
    cipher: CipherKind,
    /// Key: a shift amount, a 26-letter alphabet, a key word, or a bit
    /// string, depending on the cipher
    key: String,
    /// Message; lowercased letters are accepted, punctuation is dropped
    input: String,
}

impl Encrypt {
    fn run(self) -> Result<()> {
        let input = normalize_input(&self.input);
        println!("{}", run_cipher(self.cipher, &self.key, &input, false)?);
        Ok(())
    }
}

#[derive(Parser)]
struct Decrypt {
    /// Cipher to decrypt with
    #[clap(arg_enum)]
    cipher: CipherKind,
    /// Key: a shift amount, a 26-letter alphabet, a key word, or a bit
    /// string, depending on the cipher
    key: String,
    /// Ciphertext
    input: String,
}

impl Decrypt {
    fn run(self) -> Result<()> {
        let input = normalize_input(&self.input);
        println!("{}", run_cipher(self.cipher, &self.key, &input, true)?);
        Ok(())
    }
}

#[derive(Parser)]
struct Attack {
    /// Cipher the ciphertext was produced with
    #[clap(arg_enum)]
    cipher: CipherKind,
    /// How to score candidate decryptions
    #[clap(arg_enum)]
    method: AttackMethod,
    /// Ciphertext
    input: String,
    /// How to traverse the key space
    #[clap(long, arg_enum, default_value = "exhaustive")]
    strategy: Strategy,
    /// Number of keys to try under the random strategy
    #[clap(long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,
    /// Bound for key spaces without a natural finite size (maximum key
    /// word length, or pad bit length)
    #[clap(long)]
    max_key_len: Option<usize>,
    /// Word list file for the dictionary and language methods; read from
    /// stdin when omitted
    #[clap(long)]
    dict: Option<PathBuf>,
    /// The original message, if known; prints recovery diagnostics
    #[clap(long)]
    expected: Option<String>,
}

impl Attack {
    fn run(self) -> Result<()> {
        match self.cipher {
            CipherKind::Caesar => self.crack_with::<CaesarCipher>(),
            CipherKind::Substitution => self.crack_with::<SubstitutionCipher>(),
            CipherKind::Vigenere => self.crack_with::<VigenereCipher>(),
            CipherKind::Pad => self.crack_with::<OneTimePadCipher>(),
        }
    }

    fn crack_with<C: Cipher>(&self) -> Result<()> {
        match self.strategy {
            Strategy::Exhaustive => self.crack::<C, _>(ExhaustiveSampling),
            Strategy::Random => self.crack::<C, _>(RandomSampling::new(self.samples)),
        }
    }

    fn load_dict(&self) -> Result<WordSet> {
        let mut input = io::Input::open(self.dict.clone())?;
        Ok(WordSet::from_reader(input.reader())?)
    }

    fn crack<C: Cipher, S: SamplingStrategy>(&self, strategy: S) -> Result<()> {
        let input = normalize_input(&self.input);
        let bound = self.max_key_len;
        let start = Instant::now();

        let mut sensibility = None;
        let (message, key) = match self.method {
            AttackMethod::Frequency => {
                let (message, key) =
                    LetterFrequencyAttack::new(strategy).from_cipher::<C>(&input, bound)?;
                (message, key.to_string())
            }
            AttackMethod::Dictionary => {
                let dict = self.load_dict()?;
                let (message, key) =
                    DictionaryAttack::new(strategy, &dict).from_cipher::<C>(&input, bound)?;
                sensibility = Some(metrics::ratio_tokens_in_dict(&message, &dict)?);
                (message, key.to_string())
            }
            AttackMethod::Language => {
                let dict = self.load_dict()?;
                let (message, key) =
                    LanguageAnalysisAttack::new(strategy, &dict).from_cipher::<C>(&input, bound)?;
                sensibility = Some(metrics::ratio_tokens_in_dict(&message, &dict)?);
                (message, key.to_string())
            }
        };

        println!("Elapsed time: {:?}", start.elapsed());
        println!("Message: {message}");
        println!("Key: {key}");
        if let Some(ratio) = sensibility {
            println!("Ratio of tokens in dictionary: {ratio:.2}");
        }
        if let Some(expected) = self.expected.as_deref().map(normalize_input) {
            println!("Exact match: {}", expected == message);
            println!(
                "Letter position similarity: {:.2}",
                metrics::positional_similarity(&expected, &message)
            );
            println!(
                "Letter distribution similarity: {:.2}",
                metrics::distributional_similarity(&expected, &message)
            );
        }
        Ok(())
    }
}

#[derive(Parser)]
#[clap(author, version, about)]
enum Opts {
    Encrypt(Encrypt),
    Decrypt(Decrypt),
    Attack(Attack),
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = Opts::parse();
    match opts {
        Opts::Encrypt(e) => e.run()?,
        Opts::Decrypt(d) => d.run()?,
        Opts::Attack(a) => a.run()?,
    };
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalize_input_keeps_letters_and_whitespace() {
        assert_eq!(normalize_input("hello, world! 😊"), "HELLO WORLD ");
    }

    #[test]
    fn normalize_input_transforms_to_uppercase() {
        assert_eq!(normalize_input("Hello WORLD"), "HELLO WORLD");
    }

    #[test]
    fn run_cipher_round_trips_through_key_parsing() {
        let c = run_cipher(CipherKind::Caesar, "5", "HELLO WORLD", false).unwrap();
        assert_eq!(c, "MJQQT BTWQI");
        let m = run_cipher(CipherKind::Caesar, "5", &c, true).unwrap();
        assert_eq!(m, "HELLO WORLD");
    }

    #[test]
    fn run_cipher_rejects_malformed_keys() {
        assert!(run_cipher(CipherKind::Caesar, "99", "ABC", false).is_err());
        assert!(run_cipher(CipherKind::Substitution, "ABC", "ABC", false).is_err());
        assert!(run_cipher(CipherKind::Pad, "012", "ABC", false).is_err());
    }
}
