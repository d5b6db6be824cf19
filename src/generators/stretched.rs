//! Stretched (inharmonic) overtone generator.
//!
//! Piano-like inharmonicity: `f_n = f_0 * n * sqrt(1 + B * n^2)`, with
//! the stiffness coefficient B derived from the stretch amount. The
//! series starts at the second partial; the fundamental is the primary
//! strike itself.

#[allow(unused_imports)]
use num_traits::float::Float;

use super::{
    apply_power_randomness, overtone_power, push_overtone, HarmonicGenerator, OvertoneRange,
    TriggerList,
};
use crate::frequency_table::FrequencyTable;
use crate::utils::random::Random;

#[derive(Debug, Clone)]
pub struct StretchedHarmonics {
    amount: f32,
    random_power: f32,
    overtones: OvertoneRange,
}

impl Default for StretchedHarmonics {
    fn default() -> Self {
        Self {
            amount: 0.0,
            random_power: 0.0,
            overtones: OvertoneRange::default(),
        }
    }
}

impl StretchedHarmonics {
    pub fn set_amount(&mut self, value: f32) {
        self.amount = value;
    }

    pub fn set_random_power(&mut self, value: f32) {
        self.random_power = value;
    }

    pub fn set_overtone_range(&mut self, range: OvertoneRange) {
        self.overtones = range;
    }
}

impl HarmonicGenerator for StretchedHarmonics {
    fn generate(
        &self,
        table: &FrequencyTable,
        rng: &mut Random,
        index: usize,
        power: f32,
        velocity: f32,
        out: &mut TriggerList,
    ) {
        if self.amount <= 0.0 {
            return;
        }

        let current = table.frequency(index);
        let max_frequency = table.max_frequency();
        let max_overtone = self.overtones.max_for(velocity);
        let b = self.amount * 0.01;

        for overtone in 2..=max_overtone {
            let stretch_factor = (1.0 + b * (overtone * overtone) as f32).sqrt();
            let overtone_frequency = current * overtone as f32 * stretch_factor;
            if overtone_frequency >= max_frequency {
                break;
            }

            let target = table.index_of(overtone_frequency);
            let position = if max_overtone > 2 {
                (overtone - 2) as f32 / (max_overtone - 2) as f32
            } else {
                0.0
            };
            let mut overtone_power = overtone_power(power, self.amount, position);
            overtone_power = apply_power_randomness(overtone_power, self.random_power, rng);

            push_overtone(out, target, overtone_power, overtone - 1, max_overtone);
        }
    }
}
