//! Spatial spread: detuned companion strikes that beat against the base.
//!
//! The companion distance is derived from the frequency table itself: the
//! slot delta corresponding to a fixed Hz offset from the struck
//! frequency, so the beating rate stays roughly constant across the
//! pitch range. Offsets are jittered with a squared-uniform draw, biased
//! toward zero, which detunes companions organically instead of placing
//! them on an exact lattice.

use super::{Trigger, TriggerList};
use crate::frequency_table::FrequencyTable;
use crate::utils::random::Random;

/// Companion placement aims for this many Hz of beating.
const BEAT_OFFSET_HZ: f32 = 4.0;

#[derive(Debug, Clone, Default)]
pub struct SpreadGenerator {
    spread: f32,
    random_spread: f32,
    random_power: f32,
}

impl SpreadGenerator {
    pub fn set_spread(&mut self, value: f32) {
        self.spread = value;
    }

    pub fn set_random_spread(&mut self, value: f32) {
        self.random_spread = value;
    }

    pub fn set_random_power(&mut self, value: f32) {
        self.random_power = value;
    }

    /// Slot distance between `index` and a companion a fixed Hz offset
    /// above it.
    fn beat_distance(&self, table: &FrequencyTable, index: usize) -> f32 {
        let above = table.index_of(table.frequency(index) + BEAT_OFFSET_HZ);

        (1 + above.saturating_sub(index)) as f32
    }

    fn random_offset(&self, rng: &mut Random) -> f32 {
        let v = rng.next_float();

        v * v * self.random_spread * 3.0
    }

    fn power_variation(&self, rng: &mut Random) -> f32 {
        if self.random_power > 0.0 {
            1.0 + rng.next_gaussian() * self.random_power * 0.5
        } else {
            1.0
        }
    }

    /// Compute companion triggers for a struck slot and append them to
    /// `out`. Below spread 0.5 a single companion strikes above the base;
    /// past 0.5 a second companion mirrors it below, with the extra power
    /// split across the remaining half-range.
    pub fn generate(
        &self,
        table: &FrequencyTable,
        rng: &mut Random,
        index: usize,
        power: f32,
        out: &mut TriggerList,
    ) {
        if self.spread <= 0.0 {
            return;
        }

        let beat_delta = self.beat_distance(table, index);
        let max_index = table.len() - 1;

        if self.spread < 0.5 {
            let offset = self.random_offset(rng) * beat_delta * 0.5;
            let adjusted_power = self.spread * 2.0 * power * self.power_variation(rng);
            let target = ((index as f32 + beat_delta + offset) as usize).min(max_index);
            out.push(Trigger {
                index: target,
                power: adjusted_power,
                order: 1.0,
                couple_spread: false,
            });
        } else {
            let offset = self.random_offset(rng) * beat_delta * 0.5;
            let target = ((index as f32 + beat_delta + offset) as usize).min(max_index);
            out.push(Trigger {
                index: target,
                power,
                order: 1.0,
                couple_spread: false,
            });

            let offset = self.random_offset(rng) * beat_delta * 0.5;
            let adjusted_power = (self.spread - 0.5) * 2.0 * power * self.power_variation(rng);
            let target = (index as f32 - beat_delta - offset).max(0.0) as usize;
            out.push(Trigger {
                index: target,
                power: adjusted_power,
                order: 1.0,
                couple_spread: false,
            });
        }
    }
}
