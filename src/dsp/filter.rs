use std::f64::consts::PI;

/// First-order (RC) low-pass filter, applied in place.
///
/// Returns `false` and leaves the signal untouched when the sample rate is
/// zero or the cutoff is not a positive finite frequency.
pub fn apply_low_pass_filter(signal: &mut [f64], sample_rate: u32, cutoff_hz: f64) -> bool {
    if sample_rate == 0 || !cutoff_hz.is_finite() || cutoff_hz <= 0.0 {
        log::warn!(
            "Skipping low-pass filter: sample_rate={}Hz, cutoff={}Hz",
            sample_rate,
            cutoff_hz
        );
        return false;
    }

    let rc = 1.0 / (2.0 * PI * cutoff_hz);
    let dt = 1.0 / f64::from(sample_rate);
    let alpha = dt / (rc + dt);

    // No previous output before the first sample, so it is only scaled.
    let mut prev_output = 0.0;
    for sample in signal.iter_mut() {
        *sample = alpha * *sample + (1.0 - alpha) * prev_output;
        prev_output = *sample;
    }

    log::debug!(
        "Low-pass filtered {} samples (cutoff={:.1}Hz, alpha={:.4})",
        signal.len(),
        cutoff_hz,
        alpha
    );
    true
}

/// Block-average decimation by the integer ratio `sample_rate / target_rate`.
///
/// Each run of `ratio` consecutive samples becomes its mean; the last run
/// may be shorter. Returns `false` (signal untouched) when either rate is
/// zero or the ratio is 1 or less.
pub fn downsample(signal: &mut Vec<f64>, sample_rate: u32, target_rate: u32) -> bool {
    if sample_rate == target_rate {
        return false;
    }
    if sample_rate == 0 || target_rate == 0 || sample_rate < target_rate {
        log::warn!(
            "Skipping downsample: {}Hz -> {}Hz is not a reduction",
            sample_rate,
            target_rate
        );
        return false;
    }

    let ratio = (sample_rate / target_rate) as usize;
    if ratio <= 1 {
        log::debug!("Skipping downsample: integer ratio is {}", ratio);
        return false;
    }

    let before = signal.len();
    *signal = signal
        .chunks(ratio)
        .map(|block| block.iter().sum::<f64>() / block.len() as f64)
        .collect();

    log::debug!("Downsampled {} -> {} samples (ratio {})", before, signal.len(), ratio);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downsample_by_four_takes_block_means() {
        let mut signal = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        assert!(downsample(&mut signal, 44_100, 11_025));
        assert_eq!(signal, vec![2.5, 6.5]);
    }

    #[test]
    fn downsample_short_final_block() {
        let mut signal = vec![1.0, 3.0, 5.0, 7.0, 10.0];
        assert!(downsample(&mut signal, 8000, 4000));
        assert_eq!(signal, vec![2.0, 6.0, 10.0]);
    }

    #[test]
    fn downsample_noop_cases() {
        let original = vec![1.0, 2.0, 3.0, 4.0];
        for (rate, target) in [(8000, 8000), (8000, 16_000), (0, 4000), (8000, 0), (8000, 5000)] {
            let mut signal = original.clone();
            assert!(!downsample(&mut signal, rate, target), "{rate} -> {target}");
            assert_eq!(signal, original);
        }
    }

    #[test]
    fn low_pass_first_sample_scaled_by_alpha() {
        let sample_rate = 8000;
        let cutoff = 1000.0;
        let rc = 1.0 / (2.0 * PI * cutoff);
        let dt = 1.0 / sample_rate as f64;
        let alpha = dt / (rc + dt);

        let mut signal = vec![1.0, 1.0, 0.0];
        assert!(apply_low_pass_filter(&mut signal, sample_rate, cutoff));
        assert!((signal[0] - alpha).abs() < 1e-12);
        let second = alpha + (1.0 - alpha) * alpha;
        assert!((signal[1] - second).abs() < 1e-12);
        assert!((signal[2] - (1.0 - alpha) * second).abs() < 1e-12);
    }

    #[test]
    fn low_pass_settles_on_dc() {
        let mut signal = vec![0.5; 4000];
        apply_low_pass_filter(&mut signal, 8000, 200.0);
        assert!((signal[3999] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn low_pass_attenuates_nyquist() {
        let mut signal: Vec<f64> = (0..2000).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        apply_low_pass_filter(&mut signal, 8000, 100.0);
        let peak = signal[1000..].iter().fold(0.0f64, |m, s| m.max(s.abs()));
        assert!(peak < 0.1, "peak {peak}");
    }

    #[test]
    fn low_pass_rejects_bad_parameters() {
        let original = vec![0.25, -0.5, 1.0];
        for (rate, cutoff) in [(8000, 0.0), (8000, -10.0), (0, 100.0), (8000, f64::NAN)] {
            let mut signal = original.clone();
            assert!(!apply_low_pass_filter(&mut signal, rate, cutoff));
            assert_eq!(signal, original);
        }
    }
}
