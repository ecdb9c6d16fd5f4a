//! 24-bit hex colors and the brightness adjustment used for bevel tones.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use resvg::tiny_skia::Color;
use serde::{Deserialize, Serialize};

use crate::error::ColorError;

// ============================================================================
// HexColor
// ============================================================================

/// An opaque sRGB color written as `#rrggbb`.
///
/// Parsing accepts 6- or 3-digit hex codes with or without the leading `#`.
/// Formatting always produces lowercase, zero-padded `#rrggbb`.
///
/// Serializes as a string so catalog and config files stay readable:
///
/// ```json
/// { "color": "#2b2b2b" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Adds `percent` to each channel independently, clamping to `0..=255`.
    ///
    /// Despite the name, `percent` is an absolute channel offset, not a
    /// fraction: `+25` lightens every channel by 25 levels. Channels clamp,
    /// they never wrap.
    pub fn adjust(self, percent: i32) -> Self {
        let shift = |channel: u8| (channel as i32 + percent).clamp(0, 255) as u8;
        Self::rgb(shift(self.r), shift(self.g), shift(self.b))
    }

    /// Converts to a tiny-skia paint color with the given alpha.
    pub fn to_color(self, alpha: u8) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, alpha)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed: Srgb<u8> = s
            .trim()
            .parse()
            .map_err(|_| ColorError::InvalidHex(s.to_string()))?;
        Ok(Self::rgb(parsed.red, parsed.green, parsed.blue))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

/// Adjusts the brightness of a hex color string.
///
/// String-level counterpart of [`HexColor::adjust`]:
///
/// ```
/// assert_eq!(frame_preview::adjust("#2b2b2b", 25).unwrap(), "#444444");
/// assert_eq!(frame_preview::adjust("#ffffff", 50).unwrap(), "#ffffff");
/// ```
pub fn adjust(color: &str, percent: i32) -> Result<String, ColorError> {
    let color: HexColor = color.parse()?;
    Ok(color.adjust(percent).to_string())
}

// ============================================================================
// Tests
// ============================================================================
