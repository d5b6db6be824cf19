//! Second-order bandpass resonator.
//!
//! Bilinear-transform design with a tan-prewarped corner frequency,
//! evaluated as a direct-form-II-transposed recursion over two state
//! variables. Coefficients are only recomputed on parameter changes,
//! never per sample.

#[allow(unused_imports)]
use num_traits::float::Float;

const M_PI_F: f32 = core::f32::consts::PI;

/// Reciprocal of ln(1000): maps a -60 dB decay time to a quality factor.
const DECAY_Q_FACTOR: f32 = 0.1447648273;

/// Quality factors below this floor would degenerate the design.
const MIN_Q: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct BiquadBandPass {
    sample_rate: f32,
    b0: f32,
    a1: f32,
    a2: f32,
    z: [f32; 2],
}

impl Default for BiquadBandPass {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl BiquadBandPass {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            b0: 0.0,
            a1: 0.0,
            a2: 0.0,
            z: [0.0; 2],
        };
        filter.compute_coefficients(1000.0, core::f32::consts::FRAC_1_SQRT_2);

        filter
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Tune the resonator so that a unit excitation at `frequency` rings
    /// for roughly `t` seconds before falling 60 dB.
    pub fn set_by_decay(&mut self, frequency: f32, t: f32) {
        let q = M_PI_F * frequency * t * DECAY_Q_FACTOR;
        self.compute_coefficients(frequency, q);
    }

    pub fn compute_coefficients(&mut self, frequency: f32, q: f32) {
        let fc = frequency / self.sample_rate;
        let k = (M_PI_F * fc).tan();
        let kq = k / q.max(MIN_Q);
        let k_square = k * k;
        let norm = 1.0 / (1.0 + kq + k_square);
        self.b0 = kq * norm;
        self.a1 = 2.0 * (k_square - 1.0) * norm;
        self.a2 = (1.0 - kq + k_square) * norm;
    }

    #[inline]
    pub fn step(&mut self, in_: f32) -> f32 {
        let b0s = in_ * self.b0;
        let out = b0s + self.z[0];
        self.z[0] = self.z[1] - self.a1 * out;
        self.z[1] = -b0s - self.a2 * out;

        out
    }

    #[inline]
    pub fn process(&mut self, in_: &[f32], out: &mut [f32]) {
        for (out_sample, in_sample) in out.iter_mut().zip(in_.iter()) {
            *out_sample = self.step(*in_sample);
        }
    }

    pub fn reset(&mut self) {
        self.z = [0.0; 2];
    }

    /// True once the internal state has decayed to inaudibility.
    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.z[0].abs() < 1e-9 && self.z[1].abs() < 1e-9
    }
}
