use std::path::Path;

use crate::error::{Result, SonogramError};

pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 3;
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

const RIFF: &[u8; 4] = b"RIFF";
const WAVE: &[u8; 4] = b"WAVE";
const FMT: &[u8; 4] = b"fmt ";
const DATA: &[u8; 4] = b"data";

/// Size of the canonical header: RIFF chunk, 16-byte fmt chunk, data chunk header.
const HEADER_LEN: usize = 44;
/// Offset of the fmt chunk payload (after "RIFF", size, "WAVE", "fmt ", size).
const FMT_PAYLOAD_OFFSET: usize = 20;
const MIN_FMT_LEN: u32 = 16;

/// RIFF/WAVE header fields, decoded field by field from little-endian bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_id: [u8; 4],
    pub chunk_size: u32,
    pub format: [u8; 4],
    pub subchunk1_id: [u8; 4],
    pub subchunk1_size: u32,
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Sub-format code from a WAVE_FORMAT_EXTENSIBLE fmt chunk.
    pub sub_format: Option<u16>,
    pub subchunk2_id: [u8; 4],
    pub subchunk2_size: u32,
}

impl WavHeader {
    fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(SonogramError::Format(format!(
                "file is {} bytes, shorter than the {}-byte header",
                bytes.len(),
                HEADER_LEN
            )));
        }

        let header = Self {
            chunk_id: tag_at(bytes, 0),
            chunk_size: u32_at(bytes, 4),
            format: tag_at(bytes, 8),
            subchunk1_id: tag_at(bytes, 12),
            subchunk1_size: u32_at(bytes, 16),
            audio_format: u16_at(bytes, 20),
            num_channels: u16_at(bytes, 22),
            sample_rate: u32_at(bytes, 24),
            byte_rate: u32_at(bytes, 28),
            block_align: u16_at(bytes, 32),
            bits_per_sample: u16_at(bytes, 34),
            sub_format: None,
            subchunk2_id: tag_at(bytes, 36),
            subchunk2_size: u32_at(bytes, 40),
        };

        if &header.chunk_id != RIFF || &header.format != WAVE {
            return Err(SonogramError::Format("missing RIFF/WAVE signature".into()));
        }
        if &header.subchunk1_id != FMT {
            return Err(SonogramError::Format(format!(
                "expected 'fmt ' chunk after WAVE tag, found '{}'",
                tag_name(&header.subchunk1_id)
            )));
        }
        if header.subchunk1_size < MIN_FMT_LEN {
            return Err(SonogramError::Format(format!(
                "fmt chunk is {} bytes, expected at least {}",
                header.subchunk1_size, MIN_FMT_LEN
            )));
        }

        Ok(header)
    }

    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8)
    }

    /// Format code that actually governs sample decoding.
    pub fn effective_format(&self) -> u16 {
        match (self.audio_format, self.sub_format) {
            (WAVE_FORMAT_EXTENSIBLE, Some(sub)) => sub,
            (code, _) => code,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        let frame_bytes = self.bytes_per_sample() * usize::from(self.num_channels);
        if frame_bytes == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        (self.subchunk2_size as usize / frame_bytes) as f64 / self.sample_rate as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SampleEncoding {
    Unsigned8,
    Signed16,
    Signed24,
    Signed32,
    Float32,
}

impl SampleEncoding {
    fn for_header(header: &WavHeader) -> Result<Self> {
        match header.bits_per_sample {
            8 => Ok(Self::Unsigned8),
            16 => Ok(Self::Signed16),
            24 => Ok(Self::Signed24),
            32 if header.effective_format() == WAVE_FORMAT_IEEE_FLOAT => Ok(Self::Float32),
            32 => Ok(Self::Signed32),
            bits => Err(SonogramError::UnsupportedEncoding {
                bits_per_sample: bits,
                audio_format: header.audio_format,
            }),
        }
    }

    fn decode(self, raw: &[u8]) -> f64 {
        match self {
            Self::Unsigned8 => (f64::from(raw[0]) - 128.0) / 128.0,
            Self::Signed16 => f64::from(i16::from_le_bytes([raw[0], raw[1]])) / 32_768.0,
            Self::Signed24 => {
                // Place the 3 bytes in the high end of an i32, then shift back to sign-extend.
                let value = i32::from_le_bytes([0, raw[0], raw[1], raw[2]]) >> 8;
                f64::from(value) / 8_388_608.0
            }
            Self::Signed32 => {
                f64::from(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])) / 2_147_483_648.0
            }
            Self::Float32 => f64::from(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
        }
    }
}

/// A decoded WAV container: header plus the raw payload of its data chunk.
#[derive(Clone, Debug)]
pub struct WavFile {
    pub header: WavHeader,
    data: Vec<u8>,
}

impl WavFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| SonogramError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let wav = Self::from_bytes(&bytes)?;

        log::info!(
            "Loaded {}: {}Hz, {} channel(s), {}-bit, {:.2}s",
            path.display(),
            wav.header.sample_rate,
            wav.header.num_channels,
            wav.header.bits_per_sample,
            wav.header.duration_secs()
        );
        Ok(wav)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut header = WavHeader::parse(bytes)?;
        let fmt_len = header.subchunk1_size as usize;

        if header.audio_format == WAVE_FORMAT_EXTENSIBLE && fmt_len >= 40 {
            // Sub-format GUID starts 24 bytes into the fmt payload; its first two bytes hold the code.
            let guid_offset = FMT_PAYLOAD_OFFSET + 24;
            if bytes.len() >= guid_offset + 2 {
                header.sub_format = Some(u16_at(bytes, guid_offset));
            }
        }

        // Chunks are word aligned: an odd-sized chunk is followed by a pad byte.
        let after_fmt = FMT_PAYLOAD_OFFSET + fmt_len + (fmt_len & 1);
        let (data_offset, data_len) = locate_data_chunk(bytes, after_fmt)?;

        header.subchunk2_id = *DATA;
        header.subchunk2_size = data_len as u32;

        Ok(Self {
            header,
            data: bytes[data_offset..data_offset + data_len].to_vec(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decode the payload into samples normalized to [-1.0, 1.0].
    ///
    /// With `convert_to_mono` multi-channel frames are averaged into one
    /// sample each; otherwise samples stay interleaved in channel order.
    pub fn extract_signal(&self, convert_to_mono: bool) -> Result<Vec<f64>> {
        let encoding = SampleEncoding::for_header(&self.header)?;
        let channels = usize::from(self.header.num_channels);
        if channels == 0 {
            return Err(SonogramError::Format("fmt chunk declares zero channels".into()));
        }

        let bytes_per_sample = self.header.bytes_per_sample();
        let frame_bytes = channels * bytes_per_sample;
        let sample_count = self.data.len() / frame_bytes;
        let mix = convert_to_mono && channels > 1;

        let mut signal = Vec::with_capacity(if mix { sample_count } else { sample_count * channels });
        for frame in self.data.chunks_exact(frame_bytes) {
            let samples = frame
                .chunks_exact(bytes_per_sample)
                .map(|raw| encoding.decode(raw));
            if mix {
                signal.push(samples.sum::<f64>() / channels as f64);
            } else {
                signal.extend(samples);
            }
        }

        log::debug!(
            "Extracted {} samples ({:?}, {} channel(s), mono={})",
            signal.len(),
            encoding,
            channels,
            mix
        );
        Ok(signal)
    }
}

/// Walk (tag, size) chunk headers from `offset` until the data chunk.
/// Returns the payload offset and length.
fn locate_data_chunk(bytes: &[u8], mut offset: usize) -> Result<(usize, usize)> {
    loop {
        if offset.saturating_add(8) > bytes.len() {
            return Err(SonogramError::Format("no data chunk found".into()));
        }

        let id = tag_at(bytes, offset);
        let size = u32_at(bytes, offset + 4) as usize;
        let body = offset + 8;

        if &id == DATA {
            let available = bytes.len() - body;
            if size > available {
                log::warn!(
                    "data chunk declares {} bytes but only {} remain; truncating",
                    size,
                    available
                );
                return Ok((body, available));
            }
            return Ok((body, size));
        }

        log::debug!("Skipping '{}' chunk ({} bytes)", tag_name(&id), size);
        offset = body.saturating_add(size).saturating_add(size & 1);
    }
}

fn tag_at(bytes: &[u8], offset: usize) -> [u8; 4] {
    [bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]]
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(tag_at(bytes, offset))
}

fn tag_name(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}
