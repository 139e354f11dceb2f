//! Deterministic random number generation for battle resolution.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Snapshot-friendly**: The RNG lives inside `BattleState` and
//!   serializes as its word position, so a restored snapshot continues
//!   the exact same sequence
//! - **Speculative**: Cloning a snapshot clones the RNG, so a preview pass
//!   rolls exactly what the real pass will roll
//!
//! ```
//! use ether_battle::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut preview = rng.clone();
//!
//! assert_eq!(rng.roll_inclusive(0, 100), preview.roll_inclusive(0, 100));
//! ```

use im::Vector;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG threaded through battle snapshots.
///
/// Uses ChaCha8 for speed; the position in the stream is part of the
/// snapshot, never global state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "GameRngState", into = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
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

    /// Roll an integer in `[low, high]`.
    ///
    /// Returns `low` when the range is empty or inverted.
    pub fn roll_inclusive(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..=high)
    }

    /// Succeeds with `percent` probability (clamped to 0..=100).
    ///
    /// 0 and 100 never consume randomness.
    pub fn roll_percent(&mut self, percent: u32) -> bool {
        match percent {
            0 => false,
            p if p >= 100 => true,
            p => self.inner.gen_range(0..100) < p,
        }
    }

    /// Shuffle a persistent vector, returning the shuffled copy.
    #[must_use]
    pub fn shuffled<T: Clone>(&mut self, items: &Vector<T>) -> Vector<T> {
        use rand::seq::SliceRandom;

        let mut buffer: Vec<T> = items.iter().cloned().collect();
        buffer.shuffle(&mut self.inner);
        buffer.into_iter().collect()
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl PartialEq for GameRng {
    fn eq(&self, other: &Self) -> bool {
        self.state() == other.state()
    }
}

/// Serializable RNG state.
///
/// ChaCha8 word position gives O(1) restore regardless of how many
/// numbers were generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        GameRng::from_state(&state)
    }
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.roll_inclusive(0, 1000), rng2.roll_inclusive(0, 1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.roll_inclusive(0, 1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.roll_inclusive(0, 1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_roll_inclusive_degenerate_range() {
        let mut rng = GameRng::new(7);
        assert_eq!(rng.roll_inclusive(5, 5), 5);
        assert_eq!(rng.roll_inclusive(5, 2), 5);
    }

    #[test]
    fn test_roll_percent_extremes_do_not_advance() {
        let mut rng = GameRng::new(7);
        let before = rng.state();

        assert!(!rng.roll_percent(0));
        assert!(rng.roll_percent(100));
        assert!(rng.roll_percent(250));

        assert_eq!(rng.state(), before);
    }

    #[test]
    fn test_shuffled_keeps_elements() {
        let mut rng = GameRng::new(42);
        let data: Vector<i32> = (1..=10).collect();

        let shuffled = rng.shuffled(&data);

        assert_eq!(shuffled.len(), data.len());
        assert_ne!(shuffled, data);
        let mut sorted: Vec<_> = shuffled.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_state_restore_continues_sequence() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.roll_inclusive(0, 1000);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.roll_inclusive(0, 1000)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.roll_inclusive(0, 1000)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_rng_serde_through_state() {
        let mut rng = GameRng::new(9);
        rng.roll_inclusive(0, 10);

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: GameRng = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, rng);
        assert_eq!(restored.roll_inclusive(0, 1000), rng.roll_inclusive(0, 1000));
    }
}
