//! Heat-map display of a [`DecibelMap`] using 24-bit ANSI colours.
//!
//! Each text line carries two grid rows: the upper half-block glyph is
//! painted with the foreground colour and the lower half with the
//! background colour. Only bins up to Nyquist are shown, highest frequency
//! at the top.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::colormap::heat_color;
use super::decibel::DecibelMap;

pub const DEFAULT_ROWS: usize = 48;
pub const DEFAULT_COLUMNS: usize = 120;
pub const DEFAULT_FLOOR_DB: f64 = -80.0;

const UPPER_HALF_BLOCK: char = '▀';
const RESET: &str = "\x1b[0m";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Grid rows (frequency cells); two per text line.
    pub rows: usize,
    /// Grid columns (time cells).
    pub columns: usize,
    /// Dynamic range below the peak; quieter cells are drawn black.
    pub floor_db: f64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            floor_db: DEFAULT_FLOOR_DB,
        }
    }
}

/// Max-pool the displayable part of `map` into at most `rows x columns`
/// cells. Row 0 is the highest frequency band.
pub fn pool(map: &DecibelMap, rows: usize, columns: usize) -> Vec<Vec<f64>> {
    let bins = displayed_bins(map);
    let frames = map.values.first().map_or(0, Vec::len);
    if bins == 0 || frames == 0 {
        return Vec::new();
    }

    let rows = rows.clamp(1, bins);
    let columns = columns.clamp(1, frames);

    (0..rows)
        .map(|r| {
            let band = rows - 1 - r;
            let (bin_lo, bin_hi) = span(band, rows, bins);
            (0..columns)
                .map(|c| {
                    let (frame_lo, frame_hi) = span(c, columns, frames);
                    map.values[bin_lo..bin_hi]
                        .iter()
                        .flat_map(|row| row[frame_lo..frame_hi].iter().copied())
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .collect()
        })
        .collect()
}

/// Draw `map` to `out` with axis labels.
pub fn render<W: Write>(map: &DecibelMap, options: &DisplayOptions, out: &mut W) -> io::Result<()> {
    let grid = pool(map, options.rows, options.columns);
    let Some(peak) = grid.iter().flatten().copied().reduce(f64::max) else {
        writeln!(out, "(empty spectrogram)")?;
        return Ok(());
    };

    let range = (-options.floor_db).max(f64::EPSILON);
    let level = |db: f64| (db - peak + range) / range;

    let top_hz = map.bin_frequency(displayed_bins(map));
    writeln!(out, "{:.0} Hz", top_hz)?;

    for pair in grid.chunks(2) {
        let mut line = String::new();
        for (c, &upper) in pair[0].iter().enumerate() {
            let [r, g, b] = heat_color(level(upper));
            line.push_str(&format!("\x1b[38;2;{};{};{}m", r, g, b));
            if let Some(lower) = pair.get(1) {
                let [r, g, b] = heat_color(level(lower[c]));
                line.push_str(&format!("\x1b[48;2;{};{};{}m", r, g, b));
            }
            line.push(UPPER_HALF_BLOCK);
        }
        line.push_str(RESET);
        writeln!(out, "{}", line)?;
    }

    writeln!(out, "0 Hz")?;
    writeln!(
        out,
        "0.00s .. {:.2}s | {} frames x {} bins | peak {:.1} dB, floor {:.0} dB",
        map.duration_secs(),
        map.time_frames,
        map.frequency_bins,
        peak,
        options.floor_db
    )?;
    out.flush()
}

/// Bins from DC up to (excluding) Nyquist; the upper half mirrors them.
fn displayed_bins(map: &DecibelMap) -> usize {
    (map.frequency_bins / 2).max(1).min(map.values.len())
}

/// Half-open index range of cell `index` when `len` items are split into `cells`.
fn span(index: usize, cells: usize, len: usize) -> (usize, usize) {
    let lo = index * len / cells;
    let hi = ((index + 1) * len / cells).max(lo + 1);
    (lo, hi.min(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(values: Vec<Vec<f64>>) -> DecibelMap {
        DecibelMap {
            frequency_bins: values.len(),
            time_frames: values.first().map_or(0, Vec::len),
            values,
            sample_rate: 8000.0,
            hop_size: 4,
        }
    }

    /// 8 bins x 6 frames, cell value = bin * 10 + frame.
    fn ramp() -> DecibelMap {
        map((0..8)
            .map(|bin| (0..6).map(|frame| (bin * 10 + frame) as f64).collect())
            .collect())
    }

    #[test]
    fn pool_keeps_lower_half_with_high_frequencies_on_top() {
        let grid = pool(&ramp(), 2, 3);
        // Bins 0..4 shown; top row pools bins 2..4, bottom row bins 0..2.
        assert_eq!(grid, vec![vec![31.0, 33.0, 35.0], vec![11.0, 13.0, 15.0]]);
    }

    #[test]
    fn pool_clamps_to_available_cells() {
        let grid = pool(&ramp(), 100, 100);
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|row| row.len() == 6));
        assert_eq!(grid[0][0], 30.0);
        assert_eq!(grid[3][5], 5.0);
    }

    #[test]
    fn span_covers_every_index_once() {
        let mut covered = Vec::new();
        for cell in 0..3 {
            let (lo, hi) = span(cell, 3, 10);
            covered.extend(lo..hi);
        }
        assert_eq!(covered, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn render_draws_labelled_grid() {
        let mut out = Vec::new();
        render(&ramp(), &DisplayOptions { rows: 4, columns: 6, floor_db: -40.0 }, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // Label, two glyph lines (4 grid rows), label, summary.
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "4000 Hz");
        assert_eq!(lines[3], "0 Hz");
        assert_eq!(lines[1].matches(UPPER_HALF_BLOCK).count(), 6);
        assert!(lines[1].ends_with(RESET));
        assert!(lines[4].contains("6 frames x 8 bins"));
        assert!(lines[4].contains("peak 35.0 dB"));
    }

    #[test]
    fn peak_cell_is_brightest_colour() {
        let mut out = Vec::new();
        render(&ramp(), &DisplayOptions { rows: 2, columns: 1, floor_db: -80.0 }, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let [r, g, b] = heat_color(1.0);
        assert!(text.contains(&format!("\x1b[38;2;{};{};{}m", r, g, b)));
    }

    #[test]
    fn odd_row_count_leaves_last_line_without_background() {
        let mut out = Vec::new();
        render(&ramp(), &DisplayOptions { rows: 3, columns: 2, floor_db: -80.0 }, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].contains("\x1b[48;2;"));
        assert!(!lines[2].contains("\x1b[48;2;"));
    }

    #[test]
    fn empty_map_prints_placeholder() {
        let mut out = Vec::new();
        render(&map(Vec::new()), &DisplayOptions::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "(empty spectrogram)\n");
    }
}
