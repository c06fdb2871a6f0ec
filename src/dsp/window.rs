use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Window applied to each STFT frame before the transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Reserved, currently identity.
    Rectangle,
    /// Reserved, currently identity.
    Triangle,
    /// Reserved, currently identity.
    Hanning,
    #[default]
    Hamming,
}

/// Weight of sample `i` in a frame of `n` samples (`n >= 2`).
type WeightFn = fn(usize, usize) -> f64;

impl WindowKind {
    /// `None` for kinds that leave frames untouched.
    fn weight_fn(self) -> Option<WeightFn> {
        match self {
            WindowKind::Hamming => Some(hamming),
            WindowKind::Rectangle | WindowKind::Triangle | WindowKind::Hanning => None,
        }
    }

    /// Window coefficients for an `n`-sample frame.
    pub fn coefficients(self, n: usize) -> Vec<f64> {
        match self.weight_fn() {
            Some(weight) if n >= 2 => (0..n).map(|i| weight(i, n)).collect(),
            _ => vec![1.0; n],
        }
    }
}

fn hamming(i: usize, n: usize) -> f64 {
    0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos()
}

/// Multiply `frame` by the window in place. Frames shorter than two
/// samples are left as they are.
pub fn apply_window(frame: &mut [f64], kind: WindowKind) {
    let n = frame.len();
    let Some(weight) = kind.weight_fn() else {
        return;
    };
    if n < 2 {
        return;
    }
    for (i, sample) in frame.iter_mut().enumerate() {
        *sample *= weight(i, n);
    }
}
