//! Strategies for drawing candidate keys from a key space.
//!
//! A strategy owns no key-space data, only a policy (and at most a sample
//! budget). The sequences it produces are lazy: abandoning one early does no
//! work beyond the keys already pulled, which is what lets the attack
//! pipeline exit as soon as it finds a high-confidence candidate.

use crate::key::{Key, KeySpace};
use crate::Error;

/// Policy for producing a sequence of candidate keys from a key type.
pub trait SamplingStrategy {
    /// Produces a lazy sequence of candidate keys.
    ///
    /// `bound` is forwarded to the key type for spaces without a natural
    /// finite size; finite spaces ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnboundedKeySpace`] when exhaustive enumeration of
    /// an unbounded space is requested without a bound.
    fn sample<K: Key>(&self, bound: Option<usize>) -> Result<KeySpace<K>, Error>;
}

/// Yields every key in the space once, in the key type's canonical order.
///
/// Conceptually usable with any enumerable space; pairing it with a space
/// like the 26! substitution permutations is the caller accepting that cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveSampling;

impl SamplingStrategy for ExhaustiveSampling {
    fn sample<K: Key>(&self, bound: Option<usize>) -> Result<KeySpace<K>, Error> {
        K::space(bound)
    }
}

/// Default sample count for [`RandomSampling`].
pub const DEFAULT_SAMPLES: usize = 1000;

/// Yields a fixed number of independent uniform draws from the key space.
///
/// Duplicates are possible and deliberately not filtered out: rejecting them
/// would bias the draws, and the statistical scoring downstream does not
/// need distinct keys.
#[derive(Debug, Clone, Copy)]
pub struct RandomSampling {
    n: usize,
}

impl RandomSampling {
    /// Creates a random sampler which yields `n` keys per [`sample`] call.
    ///
    /// [`sample`]: SamplingStrategy::sample
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Produces exactly `n` random keys, overriding the configured count.
    pub fn sample_n<K: Key>(n: usize, bound: Option<usize>) -> KeySpace<K> {
        Box::new((0..n).map(move |_| K::random(bound)))
    }
}

impl Default for RandomSampling {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLES)
    }
}

impl SamplingStrategy for RandomSampling {
    fn sample<K: Key>(&self, bound: Option<usize>) -> Result<KeySpace<K>, Error> {
        Ok(Self::sample_n(self.n, bound))
    }
}
