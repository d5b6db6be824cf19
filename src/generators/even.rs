//! Even harmonic series generator: overtones at base × 2, 4, 6, ...

#[allow(unused_imports)]
use num_traits::float::Float;

use super::{
    apply_power_randomness, overtone_power, push_overtone, HarmonicGenerator, OvertoneRange,
    TriggerList,
};
use crate::frequency_table::FrequencyTable;
use crate::utils::random::Random;

#[derive(Debug, Clone)]
pub struct EvenHarmonics {
    amount: f32,
    skew: f32,
    random_power: f32,
    overtones: OvertoneRange,
}

impl Default for EvenHarmonics {
    fn default() -> Self {
        Self {
            amount: 0.0,
            skew: 1.0,
            random_power: 0.0,
            overtones: OvertoneRange::default(),
        }
    }
}

impl EvenHarmonics {
    pub fn set_amount(&mut self, value: f32) {
        self.amount = value;
    }

    /// Skew is given in octaves; the stored multiplier is `2^value`.
    pub fn set_skew(&mut self, value: f32) {
        self.skew = value.exp2();
    }

    pub fn set_random_power(&mut self, value: f32) {
        self.random_power = value;
    }

    pub fn set_overtone_range(&mut self, range: OvertoneRange) {
        self.overtones = range;
    }
}

impl HarmonicGenerator for EvenHarmonics {
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

        for overtone in 1..=max_overtone {
            let multiplier = (2 * overtone) as f32 * self.skew;
            let overtone_frequency = current * multiplier;
            if overtone_frequency >= max_frequency {
                break;
            }

            let target = table.index_of(overtone_frequency);
            let position = if max_overtone > 1 {
                (overtone - 1) as f32 / (max_overtone - 1) as f32
            } else {
                0.0
            };
            let mut overtone_power = overtone_power(power, self.amount, position);
            overtone_power = apply_power_randomness(overtone_power, self.random_power, rng);

            push_overtone(out, target, overtone_power, overtone, max_overtone);
        }
    }
}
