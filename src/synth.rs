//! Synth façade: wires the frequency table, resonator bank, harmonic and
//! spread generators together behind one trigger path.
//!
//! A note-on computes the base slot and strike power, then fires the
//! primary strike, the spread companions and every overtone generator in
//! turn. All of those decisions funnel through a single dispatch that
//! applies the sparkle scheduling policy before the bank is struck, so
//! primary and secondary strikes share one code path.

use log::trace;

use crate::bank::ResonatorBank;
use crate::frequency_table::FrequencyTable;
use crate::generators::even::EvenHarmonics;
use crate::generators::odd::OddHarmonics;
use crate::generators::spread::SpreadGenerator;
use crate::generators::stretched::StretchedHarmonics;
use crate::generators::{HarmonicGenerator, OvertoneRange, Trigger, TriggerList};
use crate::utils::crossfade;
use crate::utils::random::Random;

pub const MIN_MIDI_NOTE: i32 = 17;
pub const MAX_MIDI_NOTE: i32 = 132;
pub const STEPS_PER_SEMITONE: usize = 66;

const NOTE_RANGE: usize = (MAX_MIDI_NOTE - MIN_MIDI_NOTE) as usize;

/// Velocity-to-power scale for the primary strike.
const POWER_SCALE: f32 = 20.0;

/// Upper bound on the trigger fan-out of a single note event.
const TRIGGER_CAPACITY: usize = 512;

#[derive(Debug)]
pub struct PingSynth {
    sample_rate: f32,
    block_size: usize,
    decay: f32,
    voice_count: usize,
    sparkle_time_blocks: i32,
    sparkle_random: f32,
    overtone_range: OvertoneRange,
    rng: Random,
    bank: ResonatorBank,
    spread: SpreadGenerator,
    odd: OddHarmonics,
    even: EvenHarmonics,
    stretched: StretchedHarmonics,
    harmonic_triggers: TriggerList,
    spread_triggers: TriggerList,
}

impl PingSynth {
    pub fn new(sample_rate: f32, block_size: usize) -> Self {
        let table = FrequencyTable::new(MIN_MIDI_NOTE, STEPS_PER_SEMITONE, NOTE_RANGE);

        Self {
            sample_rate,
            block_size,
            decay: 0.0,
            voice_count: 0,
            sparkle_time_blocks: 0,
            sparkle_random: 0.0,
            overtone_range: OvertoneRange::default(),
            rng: Random::default(),
            bank: ResonatorBank::new(sample_rate, table),
            spread: SpreadGenerator::default(),
            odd: OddHarmonics::default(),
            even: EvenHarmonics::default(),
            stretched: StretchedHarmonics::default(),
            harmonic_triggers: TriggerList::new(TRIGGER_CAPACITY),
            spread_triggers: TriggerList::new(TRIGGER_CAPACITY),
        }
    }

    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay;
        self.bank.set_decay(decay);
    }

    pub fn set_decay_skew(&mut self, value: f32) {
        self.bank.set_decay_skew(value);
    }

    pub fn set_spread(&mut self, value: f32) {
        self.spread.set_spread(value);
    }

    pub fn set_odd_overtones(&mut self, value: f32) {
        self.odd.set_amount(value);
    }

    pub fn set_even_overtones(&mut self, value: f32) {
        self.even.set_amount(value);
    }

    pub fn set_stretched_overtones(&mut self, value: f32) {
        self.stretched.set_amount(value);
    }

    pub fn set_skew_odd_overtones(&mut self, value: f32) {
        self.odd.set_skew(value);
    }

    pub fn set_skew_even_overtones(&mut self, value: f32) {
        self.even.set_skew(value);
    }

    pub fn set_random_spread(&mut self, value: f32) {
        self.spread.set_random_spread(value);
    }

    pub fn set_random_power(&mut self, value: f32) {
        self.spread.set_random_power(value);
        self.odd.set_random_power(value);
        self.even.set_random_power(value);
        self.stretched.set_random_power(value);
    }

    pub fn set_excitation_noise(&mut self, value: f32) {
        self.bank.set_excitation_noise(value);
    }

    /// Sparkle window in milliseconds; the sign selects whether
    /// higher-order overtones strike later (positive) or earlier
    /// (negative).
    pub fn set_sparkle_time(&mut self, ms: f32) {
        self.sparkle_time_blocks = (ms * 0.001 * self.sample_rate / self.block_size as f32) as i32;
    }

    pub fn set_sparkle_random(&mut self, value: f32) {
        self.sparkle_random = value;
    }

    pub fn set_min_overtones(&mut self, overtones: i32) {
        self.overtone_range.min = overtones;
        self.push_overtone_range();
    }

    pub fn set_max_overtones(&mut self, overtones: i32) {
        self.overtone_range.max = overtones;
        self.push_overtone_range();
    }

    /// Sustain-pedal polarity: controller values above 63 lift the
    /// dampers, anything else engages them.
    pub fn set_damper(&mut self, value: i32) {
        self.bank.set_damp_mode(value <= 63);
    }

    pub fn trigger_voice(&mut self, note: i32, velocity: f32) {
        if !(MIN_MIDI_NOTE..=MAX_MIDI_NOTE).contains(&note) {
            return;
        }
        self.voice_count += 1;

        let base_index = (note - MIN_MIDI_NOTE) as usize * STEPS_PER_SEMITONE;
        let power = velocity * POWER_SCALE * (self.decay + 0.01);
        trace!(
            "note on: note={} index={} frequency={} velocity={}",
            note,
            base_index,
            self.bank.frequencies().frequency(base_index),
            velocity
        );

        self.trigger_slots(base_index, power, velocity);
    }

    /// Note-off is bookkeeping only: resonators release through their own
    /// decay, never through a gate.
    pub fn stop_voice(&mut self, note: i32, _velocity: f32) {
        if !(MIN_MIDI_NOTE..=MAX_MIDI_NOTE).contains(&note) {
            return;
        }
        self.voice_count = self.voice_count.saturating_sub(1);
    }

    /// Strike a single slot directly, bypassing the generators.
    pub fn trigger_slot(&mut self, index: usize, power: f32) {
        self.dispatch(Trigger {
            index,
            power,
            order: 0.0,
            couple_spread: false,
        });
    }

    pub fn process_block(&mut self, out: &mut [f32]) {
        self.bank.process_block(out);
    }

    #[inline]
    pub fn frequencies(&self) -> &FrequencyTable {
        self.bank.frequencies()
    }

    pub fn pending_strikes(&self) -> usize {
        self.bank.pending_strikes()
    }

    pub fn active_voices(&self) -> usize {
        self.voice_count
    }

    fn push_overtone_range(&mut self) {
        self.odd.set_overtone_range(self.overtone_range);
        self.even.set_overtone_range(self.overtone_range);
        self.stretched.set_overtone_range(self.overtone_range);
    }

    fn trigger_slots(&mut self, index: usize, power: f32, velocity: f32) {
        self.trigger_slot(index, power);

        self.spread_triggers.clear();
        self.spread.generate(
            self.bank.frequencies(),
            &mut self.rng,
            index,
            power,
            &mut self.spread_triggers,
        );
        self.flush_spreads();

        self.harmonic_triggers.clear();
        self.odd.generate(
            self.bank.frequencies(),
            &mut self.rng,
            index,
            power,
            velocity,
            &mut self.harmonic_triggers,
        );
        self.flush_harmonics();

        self.harmonic_triggers.clear();
        self.even.generate(
            self.bank.frequencies(),
            &mut self.rng,
            index,
            power,
            velocity,
            &mut self.harmonic_triggers,
        );
        self.flush_harmonics();

        self.harmonic_triggers.clear();
        self.stretched.generate(
            self.bank.frequencies(),
            &mut self.rng,
            index,
            power,
            velocity,
            &mut self.harmonic_triggers,
        );
        self.flush_harmonics();
    }

    fn flush_harmonics(&mut self) {
        let mut i = 0;
        while i < self.harmonic_triggers.len() {
            let trigger = self.harmonic_triggers.get(i);
            self.dispatch(trigger);

            if trigger.couple_spread {
                self.spread_triggers.clear();
                self.spread.generate(
                    self.bank.frequencies(),
                    &mut self.rng,
                    trigger.index,
                    trigger.power,
                    &mut self.spread_triggers,
                );
                self.flush_spreads();
            }
            i += 1;
        }
    }

    fn flush_spreads(&mut self) {
        let mut i = 0;
        while i < self.spread_triggers.len() {
            let trigger = self.spread_triggers.get(i);
            self.dispatch(trigger);
            i += 1;
        }
    }

    fn dispatch(&mut self, trigger: Trigger) {
        let wait = self.sparkle_delay(trigger.order);
        trace!(
            "strike: index={} power={} order={} wait={}",
            trigger.index,
            trigger.power,
            trigger.order,
            wait
        );
        self.bank.trigger_new(trigger.index, trigger.power, wait);
    }

    /// Map a normalized harmonic rank to a scheduling delay in blocks.
    /// Primary strikes (order 0) are never randomized.
    fn sparkle_delay(&mut self, order: f32) -> u32 {
        let window = self.sparkle_time_blocks;

        if self.sparkle_random == 0.0 || order == 0.0 {
            if window < 0 {
                ((1.0 - order) * -(window as f32)) as u32
            } else {
                (order * window as f32) as u32
            }
        } else {
            let u = self.rng.next_float();
            if window >= 0 {
                (crossfade(order, u, self.sparkle_random) * window as f32) as u32
            } else {
                (crossfade(1.0 - order, u, self.sparkle_random) * -(window as f32)) as u32
            }
        }
    }
}
