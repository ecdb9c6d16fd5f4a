//! Color effects applied to the photo layer.
//!
//! An effect id resolves to a [`FilterChain`]: an ordered list of color
//! operations with the same meaning as the CSS `filter` functions of the
//! same name. Frame and mat layers are never filtered.

use std::fmt;

use resvg::tiny_skia::{Pixmap, PremultipliedColorU8};

// ============================================================================
// ColorOp
// ============================================================================

/// A single color operation in a filter chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorOp {
    /// `sepia(amount)`, amount in `0..=1`.
    Sepia(f32),
    /// `saturate(factor)`, 1 leaves colors unchanged.
    Saturate(f32),
    /// `hue-rotate(degrees)`.
    HueRotate(f32),
    /// `grayscale(amount)`, amount in `0..=1`.
    Grayscale(f32),
    /// `contrast(factor)`, 1 leaves colors unchanged.
    Contrast(f32),
    /// `brightness(factor)`, 1 leaves colors unchanged.
    Brightness(f32),
}

impl ColorOp {
    /// Applies the operation to an unpremultiplied color in `0..=1`.
    ///
    /// The result is clamped, so chained operations see the same
    /// intermediate values a browser would.
    pub fn apply(self, color: [f32; 3]) -> [f32; 3] {
        let out = match self {
            Self::Sepia(amount) => sepia(color, amount),
            Self::Saturate(factor) => saturate(color, factor),
            Self::HueRotate(degrees) => hue_rotate(color, degrees),
            Self::Grayscale(amount) => grayscale(color, amount),
            Self::Contrast(factor) => contrast(color, factor),
            Self::Brightness(factor) => [color[0] * factor, color[1] * factor, color[2] * factor],
        };
        out.map(|c| c.clamp(0.0, 1.0))
    }
}

impl fmt::Display for ColorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sepia(v) => write!(f, "sepia({v})"),
            Self::Saturate(v) => write!(f, "saturate({v})"),
            Self::HueRotate(v) => write!(f, "hue-rotate({v}deg)"),
            Self::Grayscale(v) => write!(f, "grayscale({v})"),
            Self::Contrast(v) => write!(f, "contrast({v})"),
            Self::Brightness(v) => write!(f, "brightness({v})"),
        }
    }
}

// ============================================================================
// FilterChain
// ============================================================================

/// An ordered sequence of [`ColorOp`]s. The empty chain is the identity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterChain {
    ops: Vec<ColorOp>,
}

impl FilterChain {
    /// The no-op chain.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn new(ops: impl Into<Vec<ColorOp>>) -> Self {
        Self { ops: ops.into() }
    }

    pub fn ops(&self) -> &[ColorOp] {
        &self.ops
    }

    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Runs every operation in order over an unpremultiplied color.
    pub fn apply_rgb(&self, color: [f32; 3]) -> [f32; 3] {
        self.ops.iter().fold(color, |c, op| op.apply(c))
    }

    /// Filters every pixel of a premultiplied pixmap in place.
    ///
    /// Fully transparent pixels are left alone, so a layer pixmap only
    /// changes where something was drawn.
    pub fn apply_to_pixmap(&self, pixmap: &mut Pixmap) {
        if self.is_identity() {
            return;
        }

        for pixel in pixmap.pixels_mut() {
            let a = pixel.alpha();
            if a == 0 {
                continue;
            }

            // Unpremultiply before filtering
            let demul = pixel.demultiply();
            let base = [
                demul.red() as f32 / 255.0,
                demul.green() as f32 / 255.0,
                demul.blue() as f32 / 255.0,
            ];
            let [r, g, b] = self.apply_rgb(base);

            let alpha = a as f32 / 255.0;
            let premul = |c: f32| (c * alpha * 255.0).round().clamp(0.0, a as f32) as u8;
            *pixel = PremultipliedColorU8::from_rgba(premul(r), premul(g), premul(b), a)
                .unwrap_or(PremultipliedColorU8::TRANSPARENT);
        }
    }
}

impl fmt::Display for FilterChain {
    /// Formats as a CSS `filter` value, `none` for the identity chain.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("none");
        }
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

/// Maps an effect id to its filter chain.
///
/// | id      | chain                                |
/// |---------|--------------------------------------|
/// | `warm`  | `sepia(0.3) saturate(1.2)`           |
/// | `sepia` | `sepia(1)`                           |
/// | `tint`  | `hue-rotate(15deg)`                  |
/// | `bw`    | `grayscale(1)`                       |
/// | `maple` | `contrast(1.1) brightness(1.05)`     |
/// | `sedan` | `contrast(0.9) brightness(0.95)`     |
///
/// Every other id, `none` included, resolves to the identity chain.
pub fn resolve(effect_id: &str) -> FilterChain {
    use ColorOp::*;

    match effect_id {
        "warm" => FilterChain::new([Sepia(0.3), Saturate(1.2)]),
        "sepia" => FilterChain::new([Sepia(1.0)]),
        "tint" => FilterChain::new([HueRotate(15.0)]),
        "bw" => FilterChain::new([Grayscale(1.0)]),
        "maple" => FilterChain::new([Contrast(1.1), Brightness(1.05)]),
        "sedan" => FilterChain::new([Contrast(0.9), Brightness(0.95)]),
        _ => FilterChain::identity(),
    }
}

// ============================================================================
// Filter Effects matrices
// ============================================================================

fn sepia(c: [f32; 3], amount: f32) -> [f32; 3] {
    let amount = amount.clamp(0.0, 1.0);
    let sepia_r = c[0] * 0.393 + c[1] * 0.769 + c[2] * 0.189;
    let sepia_g = c[0] * 0.349 + c[1] * 0.686 + c[2] * 0.168;
    let sepia_b = c[0] * 0.272 + c[1] * 0.534 + c[2] * 0.131;
    [
        c[0] + (sepia_r - c[0]) * amount,
        c[1] + (sepia_g - c[1]) * amount,
        c[2] + (sepia_b - c[2]) * amount,
    ]
}

fn grayscale(c: [f32; 3], amount: f32) -> [f32; 3] {
    let amount = amount.clamp(0.0, 1.0);
    let gray = c[0] * 0.2126 + c[1] * 0.7152 + c[2] * 0.0722;
    [
        c[0] + (gray - c[0]) * amount,
        c[1] + (gray - c[1]) * amount,
        c[2] + (gray - c[2]) * amount,
    ]
}

fn saturate(c: [f32; 3], s: f32) -> [f32; 3] {
    let (rw, gw, bw) = (0.213, 0.715, 0.072);
    [
        (rw + (1.0 - rw) * s) * c[0] + (gw - gw * s) * c[1] + (bw - bw * s) * c[2],
        (rw - rw * s) * c[0] + (gw + (1.0 - gw) * s) * c[1] + (bw - bw * s) * c[2],
        (rw - rw * s) * c[0] + (gw - gw * s) * c[1] + (bw + (1.0 - bw) * s) * c[2],
    ]
}

fn hue_rotate(c: [f32; 3], degrees: f32) -> [f32; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let [r, g, b] = c;
    [
        r * (0.213 + cos * 0.787 - sin * 0.213)
            + g * (0.715 - 0.715 * cos - 0.715 * sin)
            + b * (0.072 - 0.072 * cos + 0.928 * sin),
        r * (0.213 - 0.213 * cos + 0.143 * sin)
            + g * (0.715 + 0.285 * cos + 0.140 * sin)
            + b * (0.072 - 0.072 * cos - 0.283 * sin),
        r * (0.213 - 0.213 * cos - 0.787 * sin)
            + g * (0.715 - 0.715 * cos + 0.715 * sin)
            + b * (0.072 + 0.928 * cos + 0.072 * sin),
    ]
}

fn contrast(c: [f32; 3], factor: f32) -> [f32; 3] {
    c.map(|v| (v - 0.5) * factor + 0.5)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::{Color, Paint, Rect, Transform};

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn unknown_effect_is_identity() {
        assert_eq!(resolve("nonexistent"), resolve("none"));
        assert!(resolve("nonexistent").is_identity());
        assert!(resolve("").is_identity());
        assert!(resolve("original").is_identity());
    }

    #[test]
    fn lookup_table_matches_css_strings() {
        assert_eq!(resolve("warm").to_string(), "sepia(0.3) saturate(1.2)");
        assert_eq!(resolve("sepia").to_string(), "sepia(1)");
        assert_eq!(resolve("tint").to_string(), "hue-rotate(15deg)");
        assert_eq!(resolve("bw").to_string(), "grayscale(1)");
        assert_eq!(resolve("maple").to_string(), "contrast(1.1) brightness(1.05)");
        assert_eq!(resolve("sedan").to_string(), "contrast(0.9) brightness(0.95)");
        assert_eq!(resolve("none").to_string(), "none");
    }

    #[test]
    fn identity_leaves_colors_alone() {
        let c = [0.2, 0.5, 0.9];
        assert_eq!(FilterChain::identity().apply_rgb(c), c);
    }

    #[test]
    fn grayscale_equalizes_channels() {
        let out = resolve("bw").apply_rgb([1.0, 0.0, 0.0]);
        assert!((out[0] - 0.2126).abs() < 1e-5);
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn full_sepia_of_white_is_clamped_warm() {
        let out = resolve("sepia").apply_rgb([1.0, 1.0, 1.0]);
        // 0.393 + 0.769 + 0.189 > 1 clamps
        assert_eq!(out[0], 1.0);
        assert!(out[0] >= out[1] && out[1] > out[2]);
    }

    #[test]
    fn zero_hue_rotation_and_unit_factors_are_noops() {
        let c = [0.3, 0.6, 0.1];
        assert!(close(ColorOp::HueRotate(0.0).apply(c), c));
        assert!(close(ColorOp::Saturate(1.0).apply(c), c));
        assert!(close(ColorOp::Contrast(1.0).apply(c), c));
        assert!(close(ColorOp::Brightness(1.0).apply(c), c));
    }

    #[test]
    fn contrast_pivots_on_mid_gray() {
        let mid = [0.5, 0.5, 0.5];
        assert!(close(ColorOp::Contrast(0.9).apply(mid), mid));

        let low = ColorOp::Contrast(0.9).apply([0.0, 0.0, 0.0]);
        assert!((low[0] - 0.05).abs() < 1e-5);
    }

    #[test]
    fn chain_applies_in_order() {
        // brightness after contrast differs from contrast after brightness
        let c = [0.2, 0.2, 0.2];
        let maple = resolve("maple").apply_rgb(c);
        let reversed =
            FilterChain::new([ColorOp::Brightness(1.05), ColorOp::Contrast(1.1)]).apply_rgb(c);
        assert!(!close(maple, reversed));
        assert!(close(maple, [(0.17 * 1.05), (0.17 * 1.05), (0.17 * 1.05)]));
    }

    #[test]
    fn pixmap_filter_skips_transparent_pixels() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(255, 0, 0, 255));
        let rect = Rect::from_xywh(0.0, 0.0, 2.0, 4.0).unwrap();
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);

        resolve("bw").apply_to_pixmap(&mut pixmap);

        let filtered = pixmap.pixel(0, 0).unwrap();
        assert_eq!(filtered.red(), 54);
        assert_eq!(filtered.green(), 54);
        assert_eq!(filtered.blue(), 54);
        assert_eq!(filtered.alpha(), 255);

        let untouched = pixmap.pixel(3, 0).unwrap();
        assert_eq!(untouched.alpha(), 0);
    }
}
