//! Deterministic point coloring.
//!
//! * Score mode: linear blue→orange ramp over the clamped confidence score.
//! * Cluster mode: golden-ratio hue stepping over the label index; noise and
//!   missing labels are always [`NOISE_GRAY`].

use egui::Color32;

use super::dataset::{LabelValue, Point};
use super::derived::ColorMode;

/// Color of unclustered / unlabeled points.
pub const NOISE_GRAY: Color32 = Color32::from_rgb(160, 160, 160);

const SCORE_COLD: [f64; 3] = [66.0, 135.0, 245.0];
const SCORE_WARM: [f64; 3] = [255.0, 165.0, 0.0];

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_75;
const SATURATION: f64 = 0.55;
const LIGHTNESS: f64 = 0.55;

/// 32-bit FNV-1a.
pub fn fnv1a(text: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for b in text.bytes() {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Ramp color for a confidence score; out-of-range values are clamped.
pub fn score_color(score: f64) -> Color32 {
    let t = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
    let c = |i: usize| lerp(SCORE_COLD[i], SCORE_WARM[i], t).round() as u8;
    Color32::from_rgb(c(0), c(1), c(2))
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn hsl(h: f64, s: f64, l: f64) -> Color32 {
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let ch = |t: f64| (hue_to_channel(p, q, t) * 255.0).round() as u8;
    Color32::from_rgb(ch(h + 1.0 / 3.0), ch(h), ch(h - 1.0 / 3.0))
}

/// Hue-wheel color for a cluster label.
pub fn label_color(label: Option<&LabelValue>) -> Color32 {
    let index = match label {
        None | Some(LabelValue::Unset) => return NOISE_GRAY,
        Some(l) if l.is_noise() => return NOISE_GRAY,
        Some(LabelValue::Numeric(n)) => *n,
        Some(LabelValue::Named(s)) => f64::from(fnv1a(s)),
    };
    let hue = (index * GOLDEN_RATIO_CONJUGATE).rem_euclid(1.0);
    hsl(hue, SATURATION, LIGHTNESS)
}

/// Fill color for a point under the active scheme and color mode.
pub fn point_color(point: &Point, scheme: &str, mode: ColorMode) -> Color32 {
    match mode {
        ColorMode::Score => score_color(point.score().unwrap_or(0.0)),
        ColorMode::Cluster => label_color(point.label(scheme)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(fnv1a(""), 0x811c_9dc5);
        assert_eq!(fnv1a("a"), 0xe40c_292c);
    }

    #[test]
    fn score_ramp_endpoints_and_clamping() {
        assert_eq!(score_color(0.0), Color32::from_rgb(66, 135, 245));
        assert_eq!(score_color(1.0), Color32::from_rgb(255, 165, 0));
        assert_eq!(score_color(-3.0), score_color(0.0));
        assert_eq!(score_color(7.0), score_color(1.0));
        assert_eq!(score_color(f64::NAN), score_color(0.0));
    }

    #[test]
    fn noise_and_missing_are_gray() {
        assert_eq!(label_color(None), NOISE_GRAY);
        assert_eq!(label_color(Some(&LabelValue::Unset)), NOISE_GRAY);
        assert_eq!(label_color(Some(&LabelValue::Numeric(-1.0))), NOISE_GRAY);
    }

    #[test]
    fn labels_are_deterministic_and_not_gray() {
        for n in 0..50 {
            let l = LabelValue::Numeric(f64::from(n));
            let a = label_color(Some(&l));
            assert_eq!(a, label_color(Some(&l)));
            assert_ne!(a, NOISE_GRAY);
        }
        let named = LabelValue::Named("cats".into());
        assert_eq!(label_color(Some(&named)), label_color(Some(&named)));
        assert_ne!(label_color(Some(&named)), NOISE_GRAY);
    }

    #[test]
    fn adjacent_labels_get_different_hues() {
        let a = label_color(Some(&LabelValue::Numeric(1.0)));
        let b = label_color(Some(&LabelValue::Numeric(2.0)));
        assert_ne!(a, b);
    }

    #[test]
    fn missing_score_uses_zero() {
        let p = Point::new(1, 0.0, 0.0);
        assert_eq!(point_color(&p, "s", ColorMode::Score), score_color(0.0));
        let p = p.with_score(0.5);
        assert_eq!(point_color(&p, "s", ColorMode::Score), score_color(0.5));
    }
}
