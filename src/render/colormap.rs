/// Gradient stops from silence to peak: black, purple, red-orange, yellow, white.
const STOPS: [(f64, [u8; 3]); 5] = [
    (0.0, [0, 0, 0]),
    (0.3, [84, 18, 123]),
    (0.6, [222, 73, 60]),
    (0.85, [252, 190, 60]),
    (1.0, [252, 253, 191]),
];

/// Map a normalized level (0.0-1.0) to an RGB colour. Out-of-range values clamp.
pub fn heat_color(level: f64) -> [u8; 3] {
    let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };

    for pair in STOPS.windows(2) {
        let (lo, lo_rgb) = pair[0];
        let (hi, hi_rgb) = pair[1];
        if level <= hi {
            let t = (level - lo) / (hi - lo);
            let mut rgb = [0u8; 3];
            for ((out, a), b) in rgb.iter_mut().zip(lo_rgb).zip(hi_rgb) {
                *out = (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
            }
            return rgb;
        }
    }
    STOPS[STOPS.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        assert_eq!(heat_color(0.0), [0, 0, 0]);
        assert_eq!(heat_color(1.0), [252, 253, 191]);
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(heat_color(-3.0), heat_color(0.0));
        assert_eq!(heat_color(7.0), heat_color(1.0));
        assert_eq!(heat_color(f64::NAN), [0, 0, 0]);
    }

    #[test]
    fn hits_stops_exactly() {
        assert_eq!(heat_color(0.3), [84, 18, 123]);
        assert_eq!(heat_color(0.6), [222, 73, 60]);
    }

    #[test]
    fn brightness_increases() {
        let luma = |rgb: [u8; 3]| rgb.iter().map(|&c| u32::from(c)).sum::<u32>();
        let mut last = 0;
        for step in 0..=20 {
            let current = luma(heat_color(step as f64 / 20.0));
            assert!(current >= last, "step {step}");
            last = current;
        }
    }
}
