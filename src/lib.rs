//! WAV decoding and short-time Fourier analysis.
//!
//! The pipeline is `WavFile::load` -> `extract_signal` ->
//! `build_spectrogram` (low-pass, decimate, frame, window, transform) ->
//! `Spectrogram::transpose` -> `DecibelMap` for display.

pub mod audio;
pub mod dsp;
pub mod error;
pub mod render;

pub use error::{Result, SonogramError};
