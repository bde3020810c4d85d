//! Seeded randomness for generation and monster movement
//!
//! One seed drives hardness, rooms, stairs, placement and erratic moves, so
//! a seed plus a config reproduces a whole run.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// ChaCha8 stream that remembers the seed it started from
///
/// Serializes as the bare seed; a deserialized value replays from the start.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(GameRng::new)
    }
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Fresh seed from the OS, for runs without `--seed`
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed to print so the run can be repeated
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in `0..n`; 0 when `n` is 0
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform in `lo..=hi`, e.g. a room width between its bounds.
    /// Collapses to `lo` when `hi <= lo`.
    pub fn range(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    pub fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    /// `num` in `den` odds
    pub fn chance(&mut self, num: u32, den: u32) -> bool {
        self.rn2(den) < num
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.range(0, items.len() - 1))
    }

    /// Fisher-Yates, drawing from this stream
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range(0, i);
            items.swap(i, j);
        }
    }
}
