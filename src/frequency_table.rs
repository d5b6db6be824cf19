//! Fixed index/frequency mapping for the resonator bank.
//!
//! Slots are spaced exponentially (equal-tempered) at a configurable
//! number of steps per semitone. The table is the quantization anchor for
//! all overtone and spread targeting: candidate frequencies computed as
//! pitch multiples snap to the nearest available slot through
//! [`FrequencyTable::index_of`].

use alloc::boxed::Box;
use alloc::vec::Vec;

#[allow(unused_imports)]
use num_traits::float::Float;

#[derive(Debug, Clone)]
pub struct FrequencyTable {
    frequencies: Box<[f32]>,
    base_frequency: f32,
    steps_per_octave: f32,
}

impl FrequencyTable {
    /// Build the table starting at `base_midi_note`, covering
    /// `num_semitones` semitones at `steps_per_semitone` slots each,
    /// plus one closing slot.
    pub fn new(base_midi_note: i32, steps_per_semitone: usize, num_semitones: usize) -> Self {
        let base_frequency = 440.0 * 2.0f32.powf((base_midi_note - 69) as f32 / 12.0);
        let steps_per_octave = (steps_per_semitone * 12) as f32;
        let len = num_semitones * steps_per_semitone + 1;

        let frequencies: Vec<f32> = (0..len)
            .map(|i| base_frequency * (i as f32 / steps_per_octave).exp2())
            .collect();

        Self {
            frequencies: frequencies.into_boxed_slice(),
            base_frequency,
            steps_per_octave,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency of a slot; out-of-range indices clamp to the last slot.
    #[inline]
    pub fn frequency(&self, index: usize) -> f32 {
        self.frequencies[index.min(self.frequencies.len() - 1)]
    }

    /// Highest frequency in the table. Overtone loops use this as their
    /// early-exit bound.
    #[inline]
    pub fn max_frequency(&self) -> f32 {
        self.frequencies[self.frequencies.len() - 1]
    }

    /// Nearest slot for a target frequency, clamped to `[0, len - 1]`.
    #[inline]
    pub fn index_of(&self, target: f32) -> usize {
        if target <= 0.0 {
            return 0;
        }
        let exact = (target / self.base_frequency).log2() * self.steps_per_octave;
        let max_index = (self.frequencies.len() - 1) as f32;

        exact.round().clamp(0.0, max_index) as usize
    }
}
