use image::Rgb;
use once_cell::sync::Lazy;

const LUT_SIZE: usize = 256;

// Samples of matplotlib's inferno at t = 0.0, 0.1, ..., 1.0
const INFERNO_ANCHORS: [[u8; 3]; 11] = [
    [0, 0, 4],
    [22, 11, 57],
    [66, 10, 104],
    [106, 23, 110],
    [147, 38, 103],
    [188, 55, 84],
    [221, 81, 58],
    [243, 118, 27],
    [252, 165, 10],
    [246, 215, 70],
    [252, 255, 164],
];

static INFERNO: Lazy<Vec<Rgb<u8>>> = Lazy::new(|| {
    let segments = (INFERNO_ANCHORS.len() - 1) as f64;
    (0..LUT_SIZE)
        .map(|i| {
            let pos = i as f64 / (LUT_SIZE - 1) as f64 * segments;
            let lo = (pos.floor() as usize).min(INFERNO_ANCHORS.len() - 2);
            let frac = pos - lo as f64;
            let a = INFERNO_ANCHORS[lo];
            let b = INFERNO_ANCHORS[lo + 1];
            let mix = |c: usize| (a[c] as f64 + (b[c] as f64 - a[c] as f64) * frac).round() as u8;
            Rgb([mix(0), mix(1), mix(2)])
        })
        .collect()
});

/// Look up `t` in the inferno table. `t` is clamped to [0, 1]; NaN maps to 0.
pub fn inferno(t: f64) -> Rgb<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let index = ((t * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1);
    INFERNO[index]
}

/// Logarithmic normalisation of positive counts into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNorm {
    pub vmin: f64,
    pub vmax: f64,
}

impl LogNorm {
    /// Returns `None` unless `0 < vmin <= vmax`.
    pub fn new(vmin: f64, vmax: f64) -> Option<Self> {
        if vmin > 0.0 && vmin <= vmax && vmax.is_finite() {
            Some(Self { vmin, vmax })
        } else {
            None
        }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        if value <= 0.0 {
            return 0.0;
        }
        let lo = self.vmin.ln();
        let span = self.vmax.ln() - lo;
        if span <= 0.0 {
            return 0.0;
        }
        ((value.ln() - lo) / span).clamp(0.0, 1.0)
    }
}
