//! Sub-character chart rendering
//!
//! Turns numeric series into compact Unicode waveforms. Single-line trends use
//! the 9-level block ramp; multi-line trends pack a 2x4 dot grid into each
//! braille cell for four times the vertical resolution.

/// The 9-level block ramp, lowest to highest.
pub const RAMP: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Glyph used for flat series.
pub const MIDPOINT: char = RAMP[4];

const BRAILLE_BASE: u32 = 0x2800;

/// Dot bit for each `[sub_row][sub_col]` of a braille cell.
const BRAILLE_DOTS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

fn bounds(series: &[f64]) -> (f64, f64) {
    series.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

/// Min-max normalizes into `[0, 1]`. A zero or non-finite range maps everything to 0.5.
fn normalize(series: &[f64]) -> Vec<f64> {
    let (min, max) = bounds(series);
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return vec![0.5; series.len()];
    }
    series
        .iter()
        .map(|v| ((v - min) / range).clamp(0.0, 1.0))
        .collect()
}

/// Nearest-index resampling to exactly `width` points.
fn resample(values: &[f64], width: usize) -> Vec<f64> {
    let len = values.len();
    (0..width).map(|i| values[i * len / width]).collect()
}

fn ramp_glyph(unit: f64) -> char {
    // NaN casts to 0, so the clamp is the only guard needed.
    let idx = (unit * 8.0).floor().clamp(0.0, 8.0) as usize;
    RAMP[idx]
}

/// Renders values already on a unit scale without re-normalizing them.
fn ramp_line(unit_values: &[f64], width: usize) -> String {
    if unit_values.is_empty() || width == 0 {
        return String::new();
    }
    resample(unit_values, width)
        .into_iter()
        .map(ramp_glyph)
        .collect()
}

/// Single-line trend of exactly `width` ramp glyphs.
///
/// A constant series renders as a line of [`MIDPOINT`] glyphs.
pub fn inline_trend(series: &[f64], width: usize) -> String {
    if series.is_empty() || width == 0 {
        return String::new();
    }
    ramp_line(&normalize(series), width)
}

/// Multi-line braille line plot: `height` lines of `width` cells joined by `\n`.
///
/// Each cell packs 2 sub-columns by 4 sub-rows. Series longer than the
/// sub-column count are downsampled by nearest index; shorter series occupy
/// the leftmost sub-columns.
pub fn dense_trend(series: &[f64], width: usize, height: usize) -> String {
    if series.is_empty() || width == 0 || height == 0 {
        return String::new();
    }

    let sub_cols = width * 2;
    let sub_rows = height * 4;
    let normalized = normalize(series);
    let points = if normalized.len() > sub_cols {
        resample(&normalized, sub_cols)
    } else {
        normalized
    };

    let mut grid = vec![vec![false; sub_cols]; sub_rows];
    for (x, v) in points.iter().enumerate() {
        let y = ((1.0 - v) * (sub_rows - 1) as f64).round();
        let y = y.clamp(0.0, (sub_rows - 1) as f64) as usize;
        grid[y][x] = true;
    }

    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let mut line = String::with_capacity(width * 3);
        for col in 0..width {
            let mut mask = 0u32;
            for (dy, dots) in BRAILLE_DOTS.iter().enumerate() {
                for (dx, bit) in dots.iter().enumerate() {
                    if grid[row * 4 + dy][col * 2 + dx] {
                        mask |= u32::from(*bit);
                    }
                }
            }
            line.push(char::from_u32(BRAILLE_BASE + mask).unwrap_or(' '));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// One ramp glyph per value, scaled against the largest value.
pub fn bars(values: &[f64], max_height: usize) -> Vec<String> {
    if values.is_empty() || max_height == 0 {
        return Vec::new();
    }
    let mut peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if peak == 0.0 || !peak.is_finite() {
        peak = 1.0;
    }
    values
        .iter()
        .map(|v| ramp_glyph(v / peak).to_string())
        .collect()
}

/// Bucket counts over `[min, max]` with `bins` equal-width buckets.
///
/// The maximum value lands in the last bucket. A zero range puts every value in the first.
fn bucket_counts(series: &[f64], bins: usize) -> Vec<usize> {
    let (min, max) = bounds(series);
    let bin_width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in series {
        let bin = if bin_width > 0.0 {
            ((v - min) / bin_width).floor().clamp(0.0, (bins - 1) as f64) as usize
        } else {
            0
        };
        counts[bin] += 1;
    }
    counts
}

/// Distribution of `series` over `bins` buckets, drawn on the ramp at `width` glyphs.
///
/// Counts are divided by the peak count and drawn on that scale. A constant
/// series has no distribution to show and renders as a midpoint line.
pub fn histogram(series: &[f64], bins: usize, width: usize, height: usize) -> String {
    if series.is_empty() || bins == 0 || width == 0 || height == 0 {
        return String::new();
    }
    let (min, max) = bounds(series);
    if !(max - min).is_finite() || max - min <= 0.0 {
        return MIDPOINT.to_string().repeat(width);
    }

    let counts = bucket_counts(series, bins);
    let peak = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let unit: Vec<f64> = counts.iter().map(|&c| c as f64 / peak).collect();
    ramp_line(&unit, width)
}

/// Picks the single-line ramp for one-row areas and the braille plot otherwise.
pub fn trend_indicator(series: &[f64], width: usize, height: usize) -> String {
    if height == 1 {
        inline_trend(series, width)
    } else {
        dense_trend(series, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_trend_has_requested_width() {
        let series = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        for width in 1..40 {
            assert_eq!(inline_trend(&series, width).chars().count(), width);
        }
    }

    #[test]
    fn inline_trend_of_constant_series_is_midpoint() {
        let line = inline_trend(&[7.5; 12], 9);
        assert!(line.chars().all(|c| c == MIDPOINT));
        assert_eq!(line.chars().count(), 9);
    }

    #[test]
    fn inline_trend_spans_the_ramp() {
        let line: Vec<char> = inline_trend(&[0.0, 1.0], 2).chars().collect();
        assert_eq!(line, vec![' ', '█']);
    }

    #[test]
    fn empty_inputs_render_nothing() {
        assert_eq!(inline_trend(&[], 10), "");
        assert_eq!(dense_trend(&[], 10, 2), "");
        assert!(bars(&[], 4).is_empty());
        assert_eq!(histogram(&[], 3, 3, 1), "");
        assert_eq!(trend_indicator(&[], 5, 1), "");
    }

    #[test]
    fn zero_dimensions_render_nothing() {
        let series = [1.0, 2.0, 3.0];
        assert_eq!(inline_trend(&series, 0), "");
        assert_eq!(dense_trend(&series, 0, 2), "");
        assert_eq!(dense_trend(&series, 4, 0), "");
        assert!(bars(&series, 0).is_empty());
        assert_eq!(histogram(&series, 0, 3, 1), "");
        assert_eq!(histogram(&series, 3, 0, 1), "");
    }

    #[test]
    fn histogram_uses_count_scale() {
        let out: Vec<char> = histogram(&[1.0, 2.0, 2.0, 3.0, 3.0, 3.0], 3, 3, 1)
            .chars()
            .collect();
        assert_eq!(out, vec![RAMP[2], RAMP[5], RAMP[8]]);
        assert_eq!(out.last(), Some(&'█'));
    }

    #[test]
    fn histogram_puts_maximum_in_last_bin() {
        assert_eq!(bucket_counts(&[0.0, 10.0], 4), vec![1, 0, 0, 1]);
    }

    #[test]
    fn histogram_of_constant_series_is_midpoint() {
        assert_eq!(histogram(&[2.0; 5], 4, 6, 1), "▄▄▄▄▄▄");
    }

    #[test]
    fn bars_scale_against_maximum() {
        assert_eq!(bars(&[0.0, 0.5, 1.0], 1), vec![" ", "▄", "█"]);
        // All zero falls back to a unit scale.
        assert_eq!(bars(&[0.0, 0.0], 1), vec![" ", " "]);
    }

    #[test]
    fn dense_trend_dimensions() {
        let series: Vec<f64> = (0..50).map(|i| (i as f64 / 5.0).sin()).collect();
        let out = dense_trend(&series, 12, 3);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == 12));
        assert!(
            out.chars()
                .filter(|c| *c != '\n')
                .all(|c| ('\u{2800}'..='\u{28FF}').contains(&c))
        );
    }

    #[test]
    fn dense_trend_packs_dots() {
        // Rising pair: low point bottom-left, high point top-right.
        assert_eq!(dense_trend(&[0.0, 1.0], 1, 1), "\u{2848}");
        // Flat series sits on the rounded middle sub-row.
        assert_eq!(dense_trend(&[1.0, 1.0], 1, 1), "\u{2824}");
    }

    #[test]
    fn trend_indicator_selects_renderer() {
        let series = [1.0, 3.0, 2.0];
        assert_eq!(trend_indicator(&series, 6, 1), inline_trend(&series, 6));
        assert_eq!(trend_indicator(&series, 6, 2), dense_trend(&series, 6, 2));
    }
}
