use std::path::PathBuf;

/// Errors raised while decoding a container or configuring the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SonogramError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Signature mismatch, truncated header, or no data chunk.
    #[error("invalid wav container: {0}")]
    Format(String),
    /// Bit depth (or format code) the decoder has no sample conversion for.
    #[error("unsupported encoding: {bits_per_sample}-bit samples (format code {audio_format})")]
    UnsupportedEncoding {
        bits_per_sample: u16,
        audio_format: u16,
    },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, SonogramError>;
