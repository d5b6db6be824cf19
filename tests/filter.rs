//! Tests for the bandpass resonator filter

use ping_reso_dsp::filter::BiquadBandPass;

const SAMPLE_RATE: f32 = 48000.0;

/// Ring the filter with a unit impulse and collect the response.
fn impulse_response(filter: &mut BiquadBandPass, length: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(length);
    out.push(filter.step(1.0));
    for _ in 1..length {
        out.push(filter.step(0.0));
    }

    out
}

#[test]
fn rings_at_the_configured_frequency() {
    for period_length in [25usize, 50, 100, 200, 400, 800, 1600] {
        let frequency = SAMPLE_RATE / period_length as f32;

        let mut filter = BiquadBandPass::new(SAMPLE_RATE);
        filter.set_by_decay(frequency, 0.1);

        let out = impulse_response(&mut filter, period_length * 20);

        // Measure the ringing period from positive-going zero crossings,
        // skipping the build-up at the start.
        let mut first = None;
        let mut last = 0;
        let mut crossings = 0;
        for i in period_length..out.len() {
            if out[i - 1] < 0.0 && out[i] >= 0.0 {
                if first.is_none() {
                    first = Some(i);
                } else {
                    last = i;
                }
                crossings += 1;
            }
        }
        assert!(crossings > 2, "no ringing at {frequency} Hz");

        let measured_period = (last - first.unwrap()) as f32 / (crossings - 1) as f32;
        let measured_frequency = SAMPLE_RATE / measured_period;
        let ratio = measured_frequency / frequency;
        assert!(
            (0.8..1.2).contains(&ratio),
            "measured {measured_frequency} Hz for {frequency} Hz"
        );
    }
}

#[test]
fn decays_to_silence_after_a_transient() {
    for frequency in [30.0, 110.0, 440.0, 1760.0, 7040.0] {
        let decay_time = 0.05;
        let mut filter = BiquadBandPass::new(SAMPLE_RATE);
        filter.set_by_decay(frequency, decay_time);

        let out = impulse_response(&mut filter, (SAMPLE_RATE * decay_time * 8.0) as usize);

        let early_peak = out[..out.len() / 8]
            .iter()
            .fold(0.0f32, |acc, v| acc.max(v.abs()));
        let tail_peak = out[out.len() / 2..]
            .iter()
            .fold(0.0f32, |acc, v| acc.max(v.abs()));

        assert!(early_peak > 0.0, "no response at {frequency} Hz");
        assert!(
            tail_peak < early_peak * 0.01,
            "tail did not decay at {frequency} Hz: {tail_peak} vs {early_peak}"
        );
    }
}

#[test]
fn output_is_linear_in_excitation_gain() {
    let mut reference = BiquadBandPass::new(SAMPLE_RATE);
    reference.set_by_decay(440.0, 0.2);
    let mut scaled = reference.clone();

    for n in 0..4096 {
        let in_ = if n < 16 { 1.0 } else { 0.0 };
        let a = reference.step(in_);
        let b = scaled.step(in_ * 3.0);
        assert!(
            (b - 3.0 * a).abs() < 1e-4,
            "nonlinear response at sample {n}"
        );
    }
}

#[test]
fn quality_factor_floor_keeps_the_filter_finite() {
    let mut filter = BiquadBandPass::new(SAMPLE_RATE);
    filter.compute_coefficients(440.0, 0.0);

    let mut peak = 0.0f32;
    for n in 0..10000 {
        let in_ = if n == 0 { 1.0 } else { 0.0 };
        let out = filter.step(in_);
        assert!(out.is_finite());
        peak = peak.max(out.abs());
    }
    assert!(peak < 10.0);
}

#[test]
fn reset_clears_state() {
    let mut filter = BiquadBandPass::new(SAMPLE_RATE);
    filter.set_by_decay(440.0, 1.0);

    filter.step(1.0);
    filter.step(0.0);
    assert!(!filter.is_quiet());

    filter.reset();
    assert!(filter.is_quiet());
    assert_eq!(filter.step(0.0), 0.0);
}

#[test]
fn block_process_matches_per_sample_steps() {
    let mut block_filter = BiquadBandPass::new(SAMPLE_RATE);
    block_filter.set_by_decay(880.0, 0.1);
    let mut sample_filter = block_filter.clone();

    let mut in_ = [0.0f32; 256];
    in_[0] = 1.0;
    in_[17] = -0.5;

    let mut out = [0.0f32; 256];
    block_filter.process(&in_, &mut out);

    for (n, sample) in in_.iter().enumerate() {
        assert_eq!(out[n], sample_filter.step(*sample));
    }
}
