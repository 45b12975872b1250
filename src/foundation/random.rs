/// Source of uniform random numbers used for cosmetic jitter and per-frame chaos.
///
/// Pairing correctness and completion timing never depend on the values drawn here.
pub trait RandomSource: Send {
    /// Next value uniformly distributed in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Next value uniformly distributed in `[-0.5, 0.5)`.
    fn next_centered(&mut self) -> f64 {
        self.next_f64() - 0.5
    }
}

/// SplitMix64 generator, seedable for reproducible runs.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Derive an independent stream from `seed` and a `stream` discriminator.
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        Self::new(seed ^ stream.wrapping_mul(0xD6E8_FEB8_6659_FD93))
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl RandomSource for Rng64 {
    fn next_f64(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/random.rs"]
mod tests;
