//! Excitation kernel used to strike a resonator.
//!
//! The kernel holds two cycles of a sine under a squared-sine (Hann)
//! window. A strike reads it backwards with linear interpolation, with a
//! phase decrement proportional to the struck slot's frequency, so every
//! burst spans exactly two periods of the resonator it excites.

use spin::Once;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::interpolate;

pub const KERNEL_LENGTH: usize = 1024;

const M_PI_F: f32 = core::f32::consts::PI;

static KERNEL: Once<ExcitationKernel> = Once::new();

#[derive(Debug)]
pub struct ExcitationKernel {
    // One guard entry past the end keeps the interpolated read in bounds.
    samples: [f32; KERNEL_LENGTH + 1],
}

impl ExcitationKernel {
    fn build() -> Self {
        let mut samples = [0.0; KERNEL_LENGTH + 1];
        let last = (KERNEL_LENGTH - 1) as f32;

        for (i, sample) in samples.iter_mut().take(KERNEL_LENGTH).enumerate() {
            let u = i as f32 / last;
            let window = (M_PI_F * u).sin();
            *sample = (4.0 * M_PI_F * u).sin() * window * window;
        }

        Self { samples }
    }

    /// Shared kernel table, built on first use.
    pub fn shared() -> &'static Self {
        KERNEL.call_once(Self::build)
    }

    /// Interpolated read at a fractional phase in `[0, KERNEL_LENGTH - 1]`.
    #[inline]
    pub fn value_at(&self, phase: f32) -> f32 {
        let last = (KERNEL_LENGTH - 1) as f32;

        interpolate(&self.samples, phase / last, last)
    }

    /// Per-sample phase decrement for a strike spanning two periods of
    /// `frequency` at `sample_rate`.
    #[inline]
    pub fn phase_advance(frequency: f32, sample_rate: f32) -> f32 {
        KERNEL_LENGTH as f32 * frequency / (2.0 * sample_rate)
    }
}
