//! Short-time Fourier transform assembly.
//!
//! The builder low-pass filters and decimates the signal, slices it into
//! overlapping frames, windows each frame and transforms it. Rows of the
//! resulting matrix are time frames, columns are frequency bins; call
//! [`Spectrogram::transpose`] to get the `[frequency][time]` layout used for
//! plotting.

use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::fft::forward_transform_real;
use super::filter::{apply_low_pass_filter, downsample};
use super::window::{apply_window, WindowKind};
use crate::error::{Result, SonogramError};

pub const DEFAULT_FRAME_SIZE: usize = 1024;
pub const DEFAULT_HOP_SIZE: usize = DEFAULT_FRAME_SIZE / 32;
pub const DEFAULT_DOWNSAMPLE_RATIO: u32 = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    /// Samples per frame; also the number of frequency bins. Power of two.
    pub frame_size: usize,
    /// Stride between frame starts.
    pub hop_size: usize,
    /// The signal is decimated to `sample_rate / downsample_ratio`.
    pub downsample_ratio: u32,
    /// Low-pass cutoff. Defaults to the decimated sample rate.
    pub cutoff_hz: Option<f64>,
    pub window: WindowKind,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            downsample_ratio: DEFAULT_DOWNSAMPLE_RATIO,
            cutoff_hz: None,
            window: WindowKind::default(),
        }
    }
}

impl SpectrogramConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frame_size == 0 || !self.frame_size.is_power_of_two() {
            return Err(SonogramError::InvalidParameter(format!(
                "frame size must be a power of two, got {}",
                self.frame_size
            )));
        }
        if self.hop_size == 0 || self.hop_size >= self.frame_size {
            return Err(SonogramError::InvalidParameter(format!(
                "hop size must be in 1..{}, got {}",
                self.frame_size, self.hop_size
            )));
        }
        if self.downsample_ratio == 0 {
            return Err(SonogramError::InvalidParameter(
                "downsample ratio must be at least 1".into(),
            ));
        }
        if let Some(cutoff) = self.cutoff_hz {
            if !cutoff.is_finite() || cutoff <= 0.0 {
                return Err(SonogramError::InvalidParameter(format!(
                    "cutoff must be a positive frequency, got {cutoff}"
                )));
            }
        }
        Ok(())
    }

    pub fn target_rate(&self, sample_rate: u32) -> u32 {
        sample_rate / self.downsample_ratio.max(1)
    }

    pub fn cutoff_for(&self, sample_rate: u32) -> f64 {
        self.cutoff_hz
            .unwrap_or(f64::from(sample_rate) / f64::from(self.downsample_ratio.max(1)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// `data[frame][bin]`, the build order.
    TimeFrequency,
    /// `data[bin][frame]`, the plotting order.
    FrequencyTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spectrogram {
    pub data: Vec<Vec<Complex64>>,
    pub orientation: Orientation,
    /// Sample rate of the analysed (decimated) signal.
    pub sample_rate: f64,
    pub frame_size: usize,
    pub hop_size: usize,
}

impl Spectrogram {
    pub fn frame_count(&self) -> usize {
        match self.orientation {
            Orientation::TimeFrequency => self.data.len(),
            Orientation::FrequencyTime => self.data.first().map_or(0, Vec::len),
        }
    }

    /// Bins per frame, equal to the frame size.
    pub fn bin_count(&self) -> usize {
        self.frame_size
    }

    pub fn bin_frequency(&self, bin: usize) -> f64 {
        bin as f64 * self.sample_rate / self.frame_size as f64
    }

    /// Start time of a frame in seconds.
    pub fn frame_time(&self, frame: usize) -> f64 {
        (frame * self.hop_size) as f64 / self.sample_rate
    }

    /// Swap the time and frequency axes.
    pub fn transpose(&mut self) {
        transpose(&mut self.data);
        self.orientation = match self.orientation {
            Orientation::TimeFrequency => Orientation::FrequencyTime,
            Orientation::FrequencyTime => Orientation::TimeFrequency,
        };
    }

    /// Transpose if needed so the matrix is laid out as `orientation`.
    pub fn orient(&mut self, orientation: Orientation) {
        if self.orientation != orientation {
            self.transpose();
        }
    }

    /// `|z|` for every cell, keeping the current orientation.
    pub fn magnitudes(&self) -> Vec<Vec<f64>> {
        self.data
            .iter()
            .map(|row| row.iter().map(|z| z.norm()).collect())
            .collect()
    }
}

/// Swap the axes of a matrix: `result[y][x] = input[x][y]`.
///
/// The first row sets the column count; rows of any other length are
/// dropped (with a warning) so the result stays rectangular. Empty
/// matrices (no rows or no columns) are left unchanged.
pub fn transpose<T: Clone>(matrix: &mut Vec<Vec<T>>) {
    let cols = match matrix.first() {
        Some(row) if !row.is_empty() => row.len(),
        _ => return,
    };

    let mut result: Vec<Vec<T>> = (0..cols).map(|_| Vec::with_capacity(matrix.len())).collect();
    for (x, row) in matrix.iter().enumerate() {
        if row.len() != cols {
            log::warn!("transpose: skipping row {} with {} columns, expected {}", x, row.len(), cols);
            continue;
        }
        for (y, value) in row.iter().enumerate() {
            result[y].push(value.clone());
        }
    }
    *matrix = result;
}

pub fn build_spectrogram(
    signal: Vec<f64>,
    sample_rate: u32,
    config: &SpectrogramConfig,
) -> Result<Spectrogram> {
    build_spectrogram_with_progress(signal, sample_rate, config, |_, _| {})
}

/// Like [`build_spectrogram`], calling `on_frame(done, total)` after each frame.
pub fn build_spectrogram_with_progress<F>(
    mut signal: Vec<f64>,
    sample_rate: u32,
    config: &SpectrogramConfig,
    mut on_frame: F,
) -> Result<Spectrogram>
where
    F: FnMut(usize, usize),
{
    config.validate()?;
    if sample_rate == 0 {
        return Err(SonogramError::InvalidParameter("sample rate must be positive".into()));
    }

    // Filter first, then decimate: block averaging alone aliases.
    let target_rate = config.target_rate(sample_rate);
    apply_low_pass_filter(&mut signal, sample_rate, config.cutoff_for(sample_rate));
    let effective_rate = if downsample(&mut signal, sample_rate, target_rate) {
        f64::from(sample_rate) / f64::from(sample_rate / target_rate)
    } else {
        f64::from(sample_rate)
    };

    let frame_size = config.frame_size;
    let hop_size = config.hop_size;
    let n = signal.len();
    let frame_count = n / (frame_size - hop_size);

    log::info!(
        "STFT: {} samples @ {:.0}Hz, {} frames of {} (hop {}, {:?} window)",
        n,
        effective_rate,
        frame_count,
        frame_size,
        hop_size,
        config.window
    );

    let mut frames = Vec::with_capacity(frame_count);
    let mut buffer = vec![0.0; frame_size];
    for i in 0..frame_count {
        let start = (i * hop_size).min(n);
        let end = n.min(start + frame_size);

        // Anything past the end of the signal stays zero.
        buffer.fill(0.0);
        buffer[..end - start].copy_from_slice(&signal[start..end]);

        apply_window(&mut buffer, config.window);
        frames.push(forward_transform_real(&buffer));
        on_frame(i + 1, frame_count);
    }

    Ok(Spectrogram {
        data: frames,
        orientation: Orientation::TimeFrequency,
        sample_rate: effective_rate,
        frame_size,
        hop_size,
    })
}
