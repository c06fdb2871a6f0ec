use clap::Parser;
use std::path::PathBuf;

use sonogram::dsp::spectrogram::{DEFAULT_DOWNSAMPLE_RATIO, DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE};
use sonogram::dsp::window::WindowKind;
use sonogram::render::terminal::{DEFAULT_COLUMNS, DEFAULT_FLOOR_DB, DEFAULT_ROWS};

#[derive(Parser, Debug)]
#[command(name = "sonogram", about = "Spectrogram of a WAV file, drawn in the terminal")]
pub struct Cli {
    /// Input audio file (.wav)
    pub input: PathBuf,

    /// Config file (defaults to ./sonogram.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Samples per STFT frame (power of two)
    #[arg(long, default_value_t = DEFAULT_FRAME_SIZE)]
    pub frame_size: usize,

    /// Stride between STFT frames
    #[arg(long, default_value_t = DEFAULT_HOP_SIZE)]
    pub hop_size: usize,

    /// Integer decimation factor applied before analysis
    #[arg(long, default_value_t = DEFAULT_DOWNSAMPLE_RATIO)]
    pub downsample_ratio: u32,

    /// Low-pass cutoff in Hz (defaults to the decimated sample rate)
    #[arg(long)]
    pub cutoff: Option<f64>,

    /// Window function applied to each frame
    #[arg(long, value_enum, default_value_t = WindowKind::Hamming)]
    pub window: WindowKind,

    /// Analyse a single channel instead of the mono mix
    #[arg(long)]
    pub channel: Option<usize>,

    /// Dynamic range of the display in dB (negative)
    #[arg(long, default_value_t = DEFAULT_FLOOR_DB, allow_hyphen_values = true)]
    pub floor_db: f64,

    /// Frequency rows in the heat map
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Time columns in the heat map
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    pub columns: usize,

    /// Print the dB matrix as JSON instead of drawing it
    #[arg(long)]
    pub json: bool,

    /// Analyse only; skip drawing
    #[arg(long)]
    pub no_display: bool,
}
