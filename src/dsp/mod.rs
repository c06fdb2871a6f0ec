pub mod fft;
pub mod filter;
pub mod spectrogram;
pub mod window;
