//! Seeded, resettable random source for choosing among rule alternatives.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic generator that can rewind to its seed.
///
/// Every call to [`RandomSource::choose`] consumes exactly one 64-bit draw, whatever the
/// number of alternatives, so that a reset source replays the same sequence of choices.
#[derive(Clone, Debug)]
pub struct RandomSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Source that starts at, and rewinds to, `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeds from system entropy. The chosen seed is kept, so [`reset`](Self::reset)
    /// still replays.
    pub fn from_entropy() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// The seed [`reset`](Self::reset) rewinds to.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewinds the generator to the stored seed.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    /// Replaces the stored seed and rewinds to it.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    ///
    /// Maps one `u64` onto the range by a widening multiply; the bias is below `n / 2^64`.
    pub fn choose(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "choose from an empty range");
        let draw = self.rng.next_u64();
        ((u128::from(draw) * n as u128) >> 64) as usize
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
