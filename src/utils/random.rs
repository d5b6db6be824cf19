//! Per-instance pseudo random number generator.
//!
//! A 32-bit linear congruential generator. Every owner of randomized
//! behavior (synth façade, resonator bank) keeps its own instance, so
//! render output is deterministic for a given seed and call sequence.

#[allow(unused_imports)]
use num_traits::float::Float;

const TWO_PI: f32 = 2.0 * core::f32::consts::PI;

#[derive(Debug, Clone)]
pub struct Random {
    state: u32,
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0x21)
    }
}

impl Random {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn seed(&mut self, seed: u32) {
        self.state = seed;
    }

    #[inline]
    pub fn next_word(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform draw in `[0.0, 1.0)`.
    #[inline]
    pub fn next_float(&mut self) -> f32 {
        self.next_word() as f32 / 4294967296.0
    }

    /// "Human" randomness: a Box-Muller gaussian scaled by 0.3 and clamped
    /// to `[-1.0, 1.0]`, so most draws are small and outliers are bounded.
    #[inline]
    pub fn next_gaussian(&mut self) -> f32 {
        let u1 = self.next_float().max(1e-7);
        let u2 = self.next_float();
        let gaussian = (-2.0 * u1.ln()).sqrt() * (TWO_PI * u2).cos();

        (gaussian * 0.3).clamp(-1.0, 1.0)
    }
}
