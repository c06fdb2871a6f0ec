mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;

use cli::Cli;
use sonogram::audio::wav::WavFile;
use sonogram::dsp::spectrogram::{
    build_spectrogram_with_progress, Orientation, SpectrogramConfig, DEFAULT_DOWNSAMPLE_RATIO,
    DEFAULT_FRAME_SIZE, DEFAULT_HOP_SIZE,
};
use sonogram::dsp::window::WindowKind;
use sonogram::render::decibel::DecibelMap;
use sonogram::render::terminal::{self, DisplayOptions, DEFAULT_COLUMNS, DEFAULT_FLOOR_DB, DEFAULT_ROWS};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Explicit --config path, or auto-detect sonogram.toml / user config
    let config_path = cli.config.clone().or_else(config::discover);
    if let Some(ref path) = config_path {
        match config::load_config(path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                // Merge: config values apply only when CLI is at its default
                if cli.frame_size == DEFAULT_FRAME_SIZE { cli.frame_size = cfg.analysis.frame_size; }
                if cli.hop_size == DEFAULT_HOP_SIZE { cli.hop_size = cfg.analysis.hop_size; }
                if cli.downsample_ratio == DEFAULT_DOWNSAMPLE_RATIO {
                    cli.downsample_ratio = cfg.analysis.downsample_ratio;
                }
                if cli.cutoff.is_none() { cli.cutoff = cfg.analysis.cutoff_hz; }
                if cli.window == WindowKind::default() { cli.window = cfg.analysis.window; }
                if cli.rows == DEFAULT_ROWS { cli.rows = cfg.display.rows; }
                if cli.columns == DEFAULT_COLUMNS { cli.columns = cfg.display.columns; }
                if cli.floor_db == DEFAULT_FLOOR_DB { cli.floor_db = cfg.display.floor_db; }
            }
            Err(err) => log::warn!("Ignoring config {}: {:#}", path.display(), err),
        }
    }

    let analysis = SpectrogramConfig {
        frame_size: cli.frame_size,
        hop_size: cli.hop_size,
        downsample_ratio: cli.downsample_ratio,
        cutoff_hz: cli.cutoff,
        window: cli.window,
    };
    analysis.validate()?;
    if cli.floor_db.is_nan() || cli.floor_db >= 0.0 {
        anyhow::bail!("--floor-db must be negative, got {}", cli.floor_db);
    }
    let display = DisplayOptions {
        rows: cli.rows,
        columns: cli.columns,
        floor_db: cli.floor_db,
    };

    log::info!("sonogram - STFT spectrogram");
    log::info!("Input: {}", cli.input.display());

    // 1. Decode
    let wav = WavFile::load(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    let signal = match cli.channel {
        None => wav.extract_signal(true)?,
        Some(channel) => {
            let channels = usize::from(wav.header.num_channels);
            if channel >= channels {
                anyhow::bail!("--channel {} out of range: file has {} channel(s)", channel, channels);
            }
            wav.extract_signal(false)?
                .into_iter()
                .skip(channel)
                .step_by(channels)
                .collect()
        }
    };

    // 2. Preprocess + STFT
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")?
            .progress_chars("=>-"),
    );
    let mut spectrogram = build_spectrogram_with_progress(
        signal,
        wav.header.sample_rate,
        &analysis,
        |done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        },
    )?;
    pb.finish_and_clear();

    // 3. Hand off [frequency][time] dB values for display
    spectrogram.orient(Orientation::FrequencyTime);
    let map = DecibelMap::from_spectrogram(&spectrogram);
    log::info!(
        "Spectrogram: {} bins x {} frames @ {:.0}Hz",
        map.frequency_bins,
        map.time_frames,
        map.sample_rate
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer(&mut out, &map).context("Failed to write JSON")?;
        writeln!(out)?;
    } else if !cli.no_display {
        terminal::render(&map, &display, &mut out).context("Failed to draw spectrogram")?;
    }

    log::info!("Done");
    Ok(())
}
