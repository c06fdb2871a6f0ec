use serde::Serialize;

use crate::dsp::spectrogram::{transpose, Orientation, Spectrogram};

/// Added to magnitudes so silent bins map to -200 dB instead of -inf.
const MAGNITUDE_EPSILON: f64 = 1e-10;

/// dB magnitudes laid out `[frequency][time]`, ready for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecibelMap {
    pub values: Vec<Vec<f64>>,
    pub frequency_bins: usize,
    pub time_frames: usize,
    /// Sample rate of the analysed signal, for axis labels.
    pub sample_rate: f64,
    pub hop_size: usize,
}

impl DecibelMap {
    pub fn from_spectrogram(spectrogram: &Spectrogram) -> Self {
        let mut values = spectrogram.magnitudes();
        for magnitude in values.iter_mut().flatten() {
            *magnitude = to_decibels(*magnitude);
        }
        if spectrogram.orientation == Orientation::TimeFrequency {
            transpose(&mut values);
        }

        Self {
            values,
            frequency_bins: spectrogram.bin_count(),
            time_frames: spectrogram.frame_count(),
            sample_rate: spectrogram.sample_rate,
            hop_size: spectrogram.hop_size,
        }
    }

    /// Loudest cell, or `None` for an empty map.
    pub fn peak(&self) -> Option<f64> {
        self.values
            .iter()
            .flatten()
            .copied()
            .reduce(f64::max)
    }

    pub fn bin_frequency(&self, bin: usize) -> f64 {
        bin as f64 * self.sample_rate / self.frequency_bins.max(1) as f64
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate <= 0.0 {
            return 0.0;
        }
        (self.time_frames * self.hop_size) as f64 / self.sample_rate
    }
}

pub fn to_decibels(magnitude: f64) -> f64 {
    20.0 * (magnitude + MAGNITUDE_EPSILON).log10()
}
