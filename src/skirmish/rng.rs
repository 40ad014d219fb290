//! Seeded randomness for a match.
//!
//! A match replays from its seed: shuffle the same deck with the same
//! `MatchRng` and the draw order comes out identical. `MatchRngState`
//! captures the stream mid-match in O(1) for checkpoints.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic match RNG over ChaCha8.
#[derive(Clone, Debug)]
pub struct MatchRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl MatchRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random index in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
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

    /// Capture the stream position for checkpointing.
    #[must_use]
    pub fn state(&self) -> MatchRngState {
        MatchRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore a stream from a checkpoint.
    #[must_use]
    pub fn from_state(state: &MatchRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG checkpoint.
///
/// The ChaCha8 word position makes the capture constant-size no matter
/// how far the stream has advanced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRngState {
    pub seed: u64,
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut a = MatchRng::new(7);
        let mut b = MatchRng::new(7);

        let mut deck_a: Vec<u32> = (0..20).collect();
        let mut deck_b = deck_a.clone();
        a.shuffle(&mut deck_a);
        b.shuffle(&mut deck_b);

        assert_eq!(deck_a, deck_b);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = MatchRng::new(1);
        let mut b = MatchRng::new(2);

        let seq_a: Vec<_> = (0..10).map(|_| a.gen_range_usize(0..1000)).collect();
        let seq_b: Vec<_> = (0..10).map(|_| b.gen_range_usize(0..1000)).collect();

        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_checkpoint_resume() {
        let mut rng = MatchRng::new(42);
        for _ in 0..50 {
            rng.gen_range_usize(0..100);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_range_usize(0..100)).collect();

        let mut restored = MatchRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_range_usize(0..100)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_state_serde() {
        let mut rng = MatchRng::new(9);
        rng.gen_range_usize(0..10);

        let json = serde_json::to_string(&rng.state()).unwrap();
        let back: MatchRngState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rng.state());
    }

    #[test]
    fn test_choose() {
        let mut rng = MatchRng::new(3);
        let items = [10, 20, 30];
        assert!(items.contains(rng.choose(&items).unwrap()));

        let empty: [i32; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}
