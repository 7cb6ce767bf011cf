//! Seedable random source for the round engine.
//!
//! Visibility assignment, spread noise, deck shuffles and market-event rolls
//! are the only nondeterministic inputs of a round. All of them draw from a
//! `GameRng` handed in by the caller, so any round can be replayed from a seed.
//!
//! ```
//! use card_market::core::GameRng;
//!
//! let mut session = GameRng::new(7);
//! let mut round_one = session.fork();
//! let mut round_two = session.fork();
//!
//! // Each round gets its own deterministic stream
//! let a: Vec<_> = (0..8).map(|_| round_one.gen_range_inclusive(0..=100)).collect();
//! let b: Vec<_> = (0..8).map(|_| round_two.gen_range_inclusive(0..=100)).collect();
//! assert_ne!(a, b);
//! ```

use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG backed by ChaCha8.
///
/// Forks give each round an independent stream; contexts separate
/// concerns (shuffling vs. quoting) drawn from the same seed.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent, deterministic child stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Derive a stream dedicated to one purpose.
    ///
    /// The same context always yields the same stream for the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Uniform integer in an inclusive range.
    pub fn gen_range_inclusive(&mut self, range: RangeInclusive<i64>) -> i64 {
        self.inner.gen_range(range)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// `true` with the given probability, clamped to `[0, 1]`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Capture the stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Resume a stream from a captured position.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG position, for replaying a session from the middle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(
                rng1.gen_range_inclusive(-10..=10),
                rng2.gen_range_inclusive(-10..=10)
            );
        }
    }

    #[test]
    fn test_inclusive_bounds() {
        let mut rng = GameRng::new(3);
        let mut seen_low = false;
        let mut seen_high = false;
        for _ in 0..500 {
            let v = rng.gen_range_inclusive(2..=6);
            assert!((2..=6).contains(&v));
            seen_low |= v == 2;
            seen_high |= v == 6;
        }
        assert!(seen_low && seen_high);
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = GameRng::new(3);
        assert_eq!(rng.gen_range_inclusive(0..=0), 0);
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        let mut fa = a.fork();
        let mut fb = b.fork();
        assert_eq!(fa.seed(), fb.seed());
        assert_eq!(fa.gen_index(1000), fb.gen_index(1000));
    }

    #[test]
    fn test_contexts_differ() {
        let rng = GameRng::new(42);
        let mut shuffle = rng.for_context("shuffle");
        let mut spread = rng.for_context("spread");

        let seq1: Vec<_> = (0..10).map(|_| shuffle.gen_index(1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| spread.gen_index(1000)).collect();
        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_gen_bool_clamps() {
        let mut rng = GameRng::new(1);
        assert!(rng.gen_bool(1.5));
        assert!(!rng.gen_bool(-0.5));
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut data);
        assert_ne!(data, (0..20).collect::<Vec<_>>());
        data.sort_unstable();
        assert_eq!(data, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_state_roundtrip_resumes_stream() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.gen_index(10);
        }
        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_index(1000)).collect();

        let json = serde_json::to_string(&state).unwrap();
        let restored_state: GameRngState = serde_json::from_str(&json).unwrap();
        let mut restored = GameRng::from_state(&restored_state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_index(1000)).collect();

        assert_eq!(expected, actual);
    }
}
