//! Serializable customization selection.
//!
//! A [`Customization`] references catalog entries by id. It is owned by the
//! host and passed by value into every render.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "frameStyleId": "black",
//!   "frameSizeId": "30x20",
//!   "matBorderId": "medium",
//!   "effectId": "none"
//! }
//! ```
//!
//! Cart items saved by the storefront use the shorter keys `frameType`,
//! `frameSize`, `border`, and `effect`; those are accepted on input.
//!
//! # Example
//!
//! ```
//! use frame_preview::Customization;
//!
//! let saved = r#"{"frameType":"walnut","frameSize":"40x30","border":"thin","effect":"warm"}"#;
//! let customization = Customization::from_json(saved).unwrap();
//! assert_eq!(customization.frame_style_id, "walnut");
//!
//! let json = customization.to_json().unwrap();
//! assert!(json.contains("\"frameStyleId\":\"walnut\""));
//! ```

use serde::{Deserialize, Serialize};

/// The four catalog selections that define a framed preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    #[serde(alias = "frameType")]
    pub frame_style_id: String,

    #[serde(alias = "frameSize")]
    pub frame_size_id: String,

    #[serde(alias = "border")]
    pub mat_border_id: String,

    #[serde(alias = "effect")]
    pub effect_id: String,
}

impl Default for Customization {
    /// The storefront's initial selection: black frame, 30×20, medium mat,
    /// no effect.
    fn default() -> Self {
        Self::new("black", "30x20", "medium", "none")
    }
}

impl Customization {
    pub fn new(
        frame_style_id: impl Into<String>,
        frame_size_id: impl Into<String>,
        mat_border_id: impl Into<String>,
        effect_id: impl Into<String>,
    ) -> Self {
        Self {
            frame_style_id: frame_style_id.into(),
            frame_size_id: frame_size_id.into(),
            mat_border_id: mat_border_id.into(),
            effect_id: effect_id.into(),
        }
    }

    /// Sets the frame style.
    pub fn with_frame_style(mut self, id: impl Into<String>) -> Self {
        self.frame_style_id = id.into();
        self
    }

    /// Sets the frame size.
    pub fn with_frame_size(mut self, id: impl Into<String>) -> Self {
        self.frame_size_id = id.into();
        self
    }

    /// Sets the mat border.
    pub fn with_mat_border(mut self, id: impl Into<String>) -> Self {
        self.mat_border_id = id.into();
        self
    }

    /// Sets the effect.
    pub fn with_effect(mut self, id: impl Into<String>) -> Self {
        self.effect_id = id.into();
        self
    }

    /// Serializes to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_keys() {
        let json = Customization::default().to_json_pretty().unwrap();
        assert!(json.contains("\"frameStyleId\""));
        assert!(json.contains("\"frameSizeId\""));
        assert!(json.contains("\"matBorderId\""));
        assert!(json.contains("\"effectId\""));
    }

    #[test]
    fn accepts_cart_item_keys() {
        let json = r#"{"frameType":"oak","frameSize":"50x40","border":"thick","effect":"bw"}"#;
        let customization = Customization::from_json(json).unwrap();
        assert_eq!(customization, Customization::new("oak", "50x40", "thick", "bw"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let customization = Customization::from_json(r#"{"effectId":"sepia"}"#).unwrap();
        assert_eq!(customization.frame_style_id, "black");
        assert_eq!(customization.frame_size_id, "30x20");
        assert_eq!(customization.mat_border_id, "medium");
        assert_eq!(customization.effect_id, "sepia");

        assert_eq!(Customization::from_json("{}").unwrap(), Customization::default());
    }

    #[test]
    fn builder_overrides_single_fields() {
        let customization = Customization::default()
            .with_frame_style("none")
            .with_mat_border("none")
            .with_effect("tint")
            .with_frame_size("20x20");
        assert_eq!(customization, Customization::new("none", "20x20", "none", "tint"));
    }
}
