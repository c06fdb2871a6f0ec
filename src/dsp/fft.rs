//! Recursive radix-2 Cooley-Tukey transform.
//!
//! Sign convention: the forward transform uses the twiddle factor
//! `e^(-2πi·j/n)`, i.e. `X[k] = Σ x[t]·e^(-2πi·kt/n)`, matching `rustfft`'s
//! forward plan. The inverse uses the positive angle and scales by `1/n`.
//!
//! Inputs whose length is not a power of two are zero-padded to the next
//! power of two, so the output may be longer than the input.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

const FORWARD: f64 = -1.0;
const INVERSE: f64 = 1.0;

pub fn forward_transform(input: &[Complex64]) -> Vec<Complex64> {
    transform(padded(input), FORWARD)
}

/// Forward transform of a real-valued sequence (imaginary parts zero).
pub fn forward_transform_real(input: &[f64]) -> Vec<Complex64> {
    let complex: Vec<Complex64> = input.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    forward_transform(&complex)
}

pub fn inverse_transform(input: &[Complex64]) -> Vec<Complex64> {
    let mut output = transform(padded(input), INVERSE);
    let scale = 1.0 / output.len().max(1) as f64;
    for value in output.iter_mut() {
        *value *= scale;
    }
    output
}

fn padded(input: &[Complex64]) -> Vec<Complex64> {
    let mut buffer = input.to_vec();
    if !buffer.is_empty() {
        buffer.resize(buffer.len().next_power_of_two(), Complex64::default());
    }
    buffer
}

fn transform(p: Vec<Complex64>, sign: f64) -> Vec<Complex64> {
    let n = p.len();
    if n <= 1 {
        return p;
    }

    let even: Vec<Complex64> = p.iter().step_by(2).copied().collect();
    let odd: Vec<Complex64> = p.iter().skip(1).step_by(2).copied().collect();
    let y_even = transform(even, sign);
    let y_odd = transform(odd, sign);

    let half = n / 2;
    let mut y = vec![Complex64::default(); n];
    for j in 0..half {
        let w = Complex64::from_polar(1.0, sign * 2.0 * PI * j as f64 / n as f64);
        let t = w * y_odd[j];
        y[j] = y_even[j] + t;
        y[j + half] = y_even[j] - t;
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    fn assert_close(actual: &[Complex64], expected: &[Complex64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (*a - *e).norm() < 1e-9,
                "bin {i}: expected {e}, got {a}"
            );
        }
    }

    fn test_signal(n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                Complex64::new((0.3 * t).sin() + 0.5 * (1.7 * t).cos(), (0.11 * t).cos())
            })
            .collect()
    }

    #[test]
    fn output_length_matches_power_of_two_input() {
        for exp in 0..=10 {
            let n = 1 << exp;
            assert_eq!(forward_transform(&test_signal(n)).len(), n);
        }
    }

    #[test]
    fn unit_impulse_gives_flat_spectrum() {
        let spectrum = forward_transform_real(&[1.0, 0.0, 0.0, 0.0]);
        assert_close(&spectrum, &[Complex64::new(1.0, 0.0); 4]);
    }

    #[test]
    fn empty_and_single_inputs_pass_through() {
        assert!(forward_transform(&[]).is_empty());
        let one = [Complex64::new(3.0, -1.0)];
        assert_close(&forward_transform(&one), &one);
    }

    #[test]
    fn matches_rustfft_forward_plan() {
        let input = test_signal(64);
        let mut expected = input.clone();
        FftPlanner::<f64>::new()
            .plan_fft_forward(64)
            .process(&mut expected);
        assert_close(&forward_transform(&input), &expected);
    }

    #[test]
    fn linearity() {
        let x = test_signal(32);
        let y: Vec<Complex64> = test_signal(32).iter().rev().map(|c| *c * 0.7).collect();
        let (a, b) = (2.5, -1.25);

        let combined: Vec<Complex64> = x.iter().zip(&y).map(|(x, y)| *x * a + *y * b).collect();
        let fx = forward_transform(&x);
        let fy = forward_transform(&y);
        let expected: Vec<Complex64> = fx.iter().zip(&fy).map(|(x, y)| *x * a + *y * b).collect();

        assert_close(&forward_transform(&combined), &expected);
    }

    #[test]
    fn cosine_lands_in_its_bin() {
        let n = 16;
        let input: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 3.0 * i as f64 / n as f64).cos())
            .collect();
        let spectrum = forward_transform_real(&input);
        for (k, value) in spectrum.iter().enumerate() {
            let expected = if k == 3 || k == n - 3 { n as f64 / 2.0 } else { 0.0 };
            assert!((value.norm() - expected).abs() < 1e-9, "bin {k}: {value}");
        }
    }

    #[test]
    fn inverse_restores_input() {
        let input = test_signal(128);
        let restored = inverse_transform(&forward_transform(&input));
        assert_close(&restored, &input);
    }

    #[test]
    fn non_power_of_two_is_zero_padded() {
        let spectrum = forward_transform_real(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(spectrum.len(), 8);
        let mut explicit = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        explicit.resize(8, 0.0);
        assert_close(&spectrum, &forward_transform_real(&explicit));
    }
}
