//! Bank of tuned bandpass resonators, one per frequency-table slot.
//!
//! Every slot owns a filter and a strike record. A trigger schedules a
//! strike with a gain, an optional delay in blocks and a kernel phase;
//! while the strike plays, the excitation kernel is fed into the filter
//! sample by sample, after which the filter keeps ringing on its own
//! state until it decays below audibility. Slots are never allocated or
//! freed after construction.

use alloc::boxed::Box;
use alloc::vec;

use log::debug;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::excitation::{ExcitationKernel, KERNEL_LENGTH};
use crate::filter::BiquadBandPass;
use crate::frequency_table::FrequencyTable;
use crate::utils::random::Random;

/// Effective decay multiplier while the dampers are engaged.
const DAMP_FACTOR: f32 = 0.125;

/// Octave swing of the decay-skew control across the table.
const DECAY_SKEW_RANGE: f32 = 4.0;

#[derive(Debug, Clone, Copy)]
struct Strike {
    wait_blocks: u32,
    // Kernel read position; negative once the burst is exhausted.
    phase: f32,
    advance: f32,
    gain: f32,
    active: bool,
}

impl Default for Strike {
    fn default() -> Self {
        Self {
            wait_blocks: 0,
            phase: -1.0,
            advance: 0.0,
            gain: 0.0,
            active: false,
        }
    }
}

#[derive(Debug)]
pub struct ResonatorBank {
    sample_rate: f32,
    decay: f32,
    decay_skew: f32,
    damped: bool,
    excitation_noise: f32,
    table: FrequencyTable,
    filters: Box<[BiquadBandPass]>,
    strikes: Box<[Strike]>,
    rng: Random,
}

impl ResonatorBank {
    pub fn new(sample_rate: f32, table: FrequencyTable) -> Self {
        let len = table.len();
        let mut bank = Self {
            sample_rate,
            decay: 0.0,
            decay_skew: 0.0,
            damped: false,
            excitation_noise: 0.0,
            table,
            filters: vec![BiquadBandPass::new(sample_rate); len].into_boxed_slice(),
            strikes: vec![Strike::default(); len].into_boxed_slice(),
            rng: Random::new(0xACE1),
        };
        bank.refresh_filters();

        bank
    }

    #[inline]
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay;
        self.refresh_filters();
    }

    pub fn set_decay_skew(&mut self, skew: f32) {
        self.decay_skew = skew;
        self.refresh_filters();
    }

    pub fn set_damp_mode(&mut self, damped: bool) {
        if self.damped != damped {
            self.damped = damped;
            self.refresh_filters();
        }
    }

    pub fn set_excitation_noise(&mut self, amount: f32) {
        self.excitation_noise = amount;
    }

    /// Schedule a strike. `delay_blocks` holds the strike back for that
    /// many calls to [`process_block`](Self::process_block). A strike on
    /// a busy slot restarts the burst; the filter state is left alone so
    /// repeated strikes add energy to a ringing resonator.
    pub fn trigger_new(&mut self, index: usize, power: f32, delay_blocks: u32) {
        let index = index.min(self.strikes.len() - 1);
        let frequency = self.table.frequency(index);

        self.strikes[index] = Strike {
            wait_blocks: delay_blocks,
            phase: (KERNEL_LENGTH - 1) as f32,
            advance: ExcitationKernel::phase_advance(frequency, self.sample_rate),
            gain: power,
            active: true,
        };
    }

    /// Number of slots with a scheduled or currently playing strike.
    pub fn pending_strikes(&self) -> usize {
        self.strikes
            .iter()
            .filter(|strike| strike.wait_blocks > 0 || strike.phase >= 0.0)
            .count()
    }

    pub fn reset(&mut self) {
        for filter in self.filters.iter_mut() {
            filter.reset();
        }
        for strike in self.strikes.iter_mut() {
            *strike = Strike::default();
        }
    }

    /// Render one block: every live slot's output is summed into `out`.
    pub fn process_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = 0.0;
        }

        let kernel = ExcitationKernel::shared();
        let noise = self.excitation_noise;

        for (filter, strike) in self.filters.iter_mut().zip(self.strikes.iter_mut()) {
            if !strike.active {
                continue;
            }

            if strike.wait_blocks > 0 {
                strike.wait_blocks -= 1;
                // The slot may still ring from an earlier strike while the
                // next one is held back.
                for sample in out.iter_mut() {
                    *sample += filter.step(0.0);
                }
                continue;
            }

            for sample in out.iter_mut() {
                let mut in_ = 0.0;
                if strike.phase >= 0.0 {
                    in_ = strike.gain * kernel.value_at(strike.phase);
                    if noise > 0.0 {
                        in_ *= 1.0 + noise * (2.0 * self.rng.next_float() - 1.0);
                    }
                    strike.phase -= strike.advance;
                }
                *sample += filter.step(in_);
            }

            if strike.phase < 0.0 && filter.is_quiet() {
                strike.active = false;
                filter.reset();
            }
        }
    }

    fn refresh_filters(&mut self) {
        let decay = if self.damped {
            self.decay * DAMP_FACTOR
        } else {
            self.decay
        };
        let max_index = (self.filters.len() - 1) as f32;

        for (i, filter) in self.filters.iter_mut().enumerate() {
            let position = i as f32 / max_index;
            let t = decay * (-self.decay_skew * (position - 0.5) * DECAY_SKEW_RANGE).exp2();
            filter.set_by_decay(self.table.frequency(i), t);
        }

        debug!(
            "filter sweep: decay={} skew={} damped={}",
            self.decay, self.decay_skew, self.damped
        );
    }
}
