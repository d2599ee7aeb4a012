//! Injectable randomness for mock-state updates.
//!
//! Every perturbation takes a `&mut dyn RandomSource` instead of reaching for a
//! global generator, so tests can pin the exact sequence of draws and seeded
//! runs reproduce bit-for-bit.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

/// A source of uniform values in `[0, 1)`.
pub trait RandomSource: Send {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform value in `[lo, hi)`.
    ///
    /// Scaling a unit draw close to 1 can round up to `hi`; such results are
    /// pulled back to the largest float below `hi`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let x = lo + (hi - lo) * self.next_unit();
        if hi > lo && x >= hi {
            next_below(hi)
        } else {
            x
        }
    }

    /// Uniform value in `[-delta, delta)`.
    fn symmetric(&mut self, delta: f64) -> f64 {
        let x = (self.next_unit() - 0.5) * 2.0 * delta;
        if delta > 0.0 && x >= delta {
            next_below(delta)
        } else {
            x
        }
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

/// Deterministic simulation RNG.
///
/// Wraps `ChaCha8Rng` for cross-platform deterministic randomness. Each mounted
/// panel gets its own stream so adding a panel never shifts another panel's draws.
#[derive(Debug, Clone)]
pub struct SimRng(ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self::from_seed_u64(DEFAULT_SEED)
    }
}

impl SimRng {
    /// Create a new `SimRng` seeded from the given `u64` value.
    #[must_use]
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Create a generator seeded from the thread-local entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_seed_u64(rand::random())
    }

    /// Create a generator on a stream derived from `label`.
    ///
    /// The stream id is a stable `blake3` hash of the label, so the same
    /// `(seed, label)` pair always yields the same sequence.
    #[must_use]
    pub fn for_stream(seed: u64, label: &str) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream_id(label));
        Self(rng)
    }
}

impl RandomSource for SimRng {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Largest finite `f64` strictly below `x`.
#[allow(clippy::float_cmp)]
fn next_below(x: f64) -> f64 {
    if x == 0.0 {
        -f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else {
        f64::from_bits(x.to_bits() + 1)
    }
}

fn stream_id(label: &str) -> u64 {
    let digest = blake3::hash(label.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Replays a fixed list of unit values, wrapping around at the end.
///
/// Values are clamped into `[0, 1)` on construction so callers cannot feed the
/// perturbation rules anything a real generator would never produce.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Largest value strictly below 1.0.
    pub const MAX_UNIT: f64 = 1.0 - f64::EPSILON;

    /// Script the given values. An empty script always yields `0.5`.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, Self::MAX_UNIT) })
            .collect();
        Self { values, cursor: 0 }
    }

    /// A script that always yields `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }

    /// Number of values drawn so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.5;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
