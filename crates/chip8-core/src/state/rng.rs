/// Seed used when the configured seed is zero (xorshift has no zero state).
pub const DEFAULT_RNG_SEED: u32 = 0x2545_F491;

/// Deterministic xorshift32 source for `RND`.
///
/// Lives in machine state so save states replay the same random sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Rng {
    state: u32,
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(DEFAULT_RNG_SEED)
    }
}

impl Rng {
    /// Creates a generator; a zero seed is replaced by [`DEFAULT_RNG_SEED`].
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_RNG_SEED } else { seed },
        }
    }

    /// Raw generator state, for snapshots.
    #[must_use]
    pub const fn state(self) -> u32 {
        self.state
    }

    /// Advances the generator and returns the next 32-bit value.
    pub const fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next byte, taken from the high bits.
    pub const fn next_u8(&mut self) -> u8 {
        (self.next_u32() >> 24) as u8
    }
}
