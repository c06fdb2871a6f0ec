use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use sonogram::dsp::spectrogram::SpectrogramConfig;
use sonogram::render::terminal::DisplayOptions;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: SpectrogramConfig,
    #[serde(default)]
    pub display: DisplayOptions,
}

/// First existing config: ./sonogram.toml, ~/.config/sonogram, then the platform config dir.
pub fn discover() -> Option<PathBuf> {
    let local = PathBuf::from("sonogram.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("sonogram").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("sonogram").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}
