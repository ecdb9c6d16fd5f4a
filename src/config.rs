//! Drawing constants for the compositor.
//!
//! The defaults reproduce the storefront preview pixel for pixel. They are
//! empirical and have no derivation; treat them as fixed unless a design
//! change calls for different output.
//!
//! Every field is optional in JSON:
//!
//! ```
//! use frame_preview::CompositorConfig;
//!
//! let config = CompositorConfig::from_json(r#"{ "frameRatio": 0.06 }"#).unwrap();
//! assert_eq!(config.frame_ratio, 0.06);
//! assert_eq!(config.bevel.inset_ratio, 0.6);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::{ConfigError, PreviewResult};
use crate::fit::FitMode;

/// Top-level compositor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositorConfig {
    /// Frame thickness as a fraction of display width.
    pub frame_ratio: f32,
    pub bevel: BevelConfig,
    pub mat: MatConfig,
    pub accent: AccentConfig,
    pub placeholder: PlaceholderConfig,
    /// Placement of the photo inside the image box.
    pub image_fit: FitMode,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            frame_ratio: 0.055,
            bevel: BevelConfig::default(),
            mat: MatConfig::default(),
            accent: AccentConfig::default(),
            placeholder: PlaceholderConfig::default(),
            image_fit: FitMode::Cover,
        }
    }
}

impl CompositorConfig {
    /// Serializes to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes and validates a JSON string; absent fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> PreviewResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every numeric constant is finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("frameRatio", self.frame_ratio),
            ("bevel.insetRatio", self.bevel.inset_ratio),
            ("mat.shadowOpacity", self.mat.shadow_opacity),
            ("mat.shadowWidth", self.mat.shadow_width),
            ("accent.width", self.accent.width),
            ("accent.inset", self.accent.inset),
            ("accent.extent", self.accent.extent),
            ("accent.opacity", self.accent.opacity),
            ("placeholder.fontSize", self.placeholder.font_size),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

/// Bevel facet shape and shading.
///
/// Deltas are channel offsets passed to [`HexColor::adjust`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BevelConfig {
    /// Inner facet corners sit `inset_ratio * thickness` in from the edge.
    pub inset_ratio: f32,
    pub top_delta: i32,
    pub left_delta: i32,
    pub bottom_delta: i32,
    pub right_delta: i32,
}

impl Default for BevelConfig {
    fn default() -> Self {
        Self {
            inset_ratio: 0.6,
            top_delta: 25,
            left_delta: 25,
            bottom_delta: -35,
            right_delta: -15,
        }
    }
}

/// Mat board fill and its faint inner line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatConfig {
    pub color: HexColor,
    pub shadow_color: HexColor,
    pub shadow_opacity: f32,
    pub shadow_width: f32,
}

impl Default for MatConfig {
    fn default() -> Self {
        Self {
            color: HexColor::WHITE,
            shadow_color: HexColor::BLACK,
            shadow_opacity: 0.08,
            shadow_width: 1.0,
        }
    }
}

/// Diagonal shadow stroked inside the frame opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccentConfig {
    pub width: f32,
    /// Stroke rectangle inset from the mat box.
    pub inset: f32,
    /// Gradient runs from the mat box corner to `corner + extent` on both axes.
    pub extent: f32,
    pub color: HexColor,
    pub opacity: f32,
}

impl Default for AccentConfig {
    fn default() -> Self {
        Self {
            width: 3.0,
            inset: 1.0,
            extent: 20.0,
            color: HexColor::BLACK,
            opacity: 0.3,
        }
    }
}

/// What the image box shows when the photo cannot be decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceholderConfig {
    pub fill: HexColor,
    pub text_color: HexColor,
    pub label: String,
    pub font_size: f32,
    pub font_family: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            fill: HexColor::rgb(0xf3, 0xf4, 0xf6),
            text_color: HexColor::rgb(0x9c, 0xa3, 0xaf),
            label: "Image not available".to_string(),
            font_size: 14.0,
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Converts an opacity in `0..=1` to an 8-bit alpha.
pub(crate) fn alpha_u8(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}
