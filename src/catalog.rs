//! Read-only catalog of frame styles, sizes, mat borders, and effects.
//!
//! A [`Catalog`] is constructed once, validated, and shared (usually behind
//! an `Arc`) with every compositor. Lookups never fail: unknown ids resolve
//! to documented fallback entries.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "frameStyles": [{ "id": "black", "label": "Black", "color": "#2b2b2b" }],
//!   "frameSizes": [{
//!     "id": "30x20", "label": "30×20 cm", "width": 30, "height": 20,
//!     "ratio": 1.5, "description": "Standard", "price": 44
//!   }],
//!   "matBorders": [{ "id": "medium", "label": "Medium Mat", "width": 12 }],
//!   "effects": [{ "id": "none", "label": "Original" }]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::customization::Customization;
use crate::error::{CatalogError, PreviewResult};

// ============================================================================
// Entries
// ============================================================================

/// A frame moulding. `color: None` is the frameless style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStyle {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub color: Option<HexColor>,
}

impl FrameStyle {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: Option<HexColor>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color,
        }
    }

    /// The fallback style: no frame, zero thickness.
    pub fn frameless() -> Self {
        Self::new("none", "Frameless", None)
    }

    pub fn is_frameless(&self) -> bool {
        self.color.is_none()
    }
}

/// A print size with its aspect ratio and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSizeSpec {
    pub id: String,
    pub label: String,
    /// Physical width in centimeters.
    pub width: f32,
    /// Physical height in centimeters.
    pub height: f32,
    /// Width / height, drives the preview's aspect ratio.
    pub ratio: f32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: u32,
}

impl FrameSizeSpec {
    /// Creates a size whose ratio is derived from its physical dimensions.
    pub fn new(
        id: impl Into<String>,
        width: f32,
        height: f32,
        description: impl Into<String>,
        price: u32,
    ) -> Self {
        Self {
            id: id.into(),
            label: format!("{width}×{height} cm"),
            width,
            height,
            ratio: width / height,
            description: description.into(),
            price,
        }
    }

    /// The fallback size: 30×20 cm, ratio 3:2.
    pub fn fallback() -> Self {
        Self::new("30x20", 30.0, 20.0, "Standard", 44)
    }
}

/// A mat board inset, `width` in layout units. Zero draws no mat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatBorder {
    pub id: String,
    pub label: String,
    pub width: f32,
}

impl MatBorder {
    pub fn new(id: impl Into<String>, label: impl Into<String>, width: f32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            width,
        }
    }

    /// The fallback mat: none.
    pub fn none() -> Self {
        Self::new("none", "No Mat", 0.0)
    }
}

/// A selectable color effect; see [`crate::effect::resolve`] for the filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectSpec {
    pub id: String,
    pub label: String,
}

impl EffectSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// The fallback effect: the unfiltered original.
    pub fn original() -> Self {
        Self::new("none", "Original")
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Serialized shape of a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogTables {
    #[serde(default)]
    frame_styles: Vec<FrameStyle>,
    #[serde(default)]
    frame_sizes: Vec<FrameSizeSpec>,
    #[serde(default)]
    mat_borders: Vec<MatBorder>,
    #[serde(default)]
    effects: Vec<EffectSpec>,
}

/// Validated lookup tables plus the fallback entries used on a miss.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: CatalogTables,
    fallback: Fallbacks,
}

#[derive(Debug, Clone)]
struct Fallbacks {
    frame_style: FrameStyle,
    frame_size: FrameSizeSpec,
    mat_border: MatBorder,
    effect: EffectSpec,
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            frame_style: FrameStyle::frameless(),
            frame_size: FrameSizeSpec::fallback(),
            mat_border: MatBorder::none(),
            effect: EffectSpec::original(),
        }
    }
}

/// Every catalog entry a [`Customization`] points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCustomization<'a> {
    pub frame_style: &'a FrameStyle,
    pub frame_size: &'a FrameSizeSpec,
    pub mat_border: &'a MatBorder,
    pub effect: &'a EffectSpec,
}

impl Catalog {
    /// Builds a catalog after validating every table.
    pub fn new(
        frame_styles: Vec<FrameStyle>,
        frame_sizes: Vec<FrameSizeSpec>,
        mat_borders: Vec<MatBorder>,
        effects: Vec<EffectSpec>,
    ) -> Result<Self, CatalogError> {
        Self::from_tables(CatalogTables {
            frame_styles,
            frame_sizes,
            mat_borders,
            effects,
        })
    }

    fn from_tables(tables: CatalogTables) -> Result<Self, CatalogError> {
        check_ids("frame style", tables.frame_styles.iter().map(|s| s.id.as_str()))?;
        check_ids("frame size", tables.frame_sizes.iter().map(|s| s.id.as_str()))?;
        check_ids("mat border", tables.mat_borders.iter().map(|m| m.id.as_str()))?;
        check_ids("effect", tables.effects.iter().map(|e| e.id.as_str()))?;

        for size in &tables.frame_sizes {
            if !size.ratio.is_finite() || size.ratio <= 0.0 {
                return Err(CatalogError::InvalidRatio {
                    id: size.id.clone(),
                    ratio: size.ratio,
                });
            }
        }
        for mat in &tables.mat_borders {
            if !mat.width.is_finite() || mat.width < 0.0 {
                return Err(CatalogError::InvalidMatWidth {
                    id: mat.id.clone(),
                    width: mat.width,
                });
            }
        }

        Ok(Self {
            tables,
            fallback: Fallbacks::default(),
        })
    }

    /// The storefront's standard tables.
    pub fn builtin() -> Self {
        let hex = |r, g, b| Some(HexColor::rgb(r, g, b));
        let tables = CatalogTables {
            frame_styles: vec![
                FrameStyle::frameless(),
                FrameStyle::new("black", "Black", hex(0x2b, 0x2b, 0x2b)),
                FrameStyle::new("white", "White", hex(0xf5, 0xf5, 0xf5)),
                FrameStyle::new("natural", "Natural", hex(0xc8, 0xa8, 0x82)),
                FrameStyle::new("walnut", "Walnut", hex(0x6b, 0x44, 0x23)),
                FrameStyle::new("oak", "Oak", hex(0xb8, 0x95, 0x6a)),
                FrameStyle::new("darkwood", "Dark Wood", hex(0x4a, 0x34, 0x28)),
            ],
            frame_sizes: vec![
                FrameSizeSpec::new("20x20", 20.0, 20.0, "Square", 34),
                FrameSizeSpec::new("30x20", 30.0, 20.0, "Standard", 44),
                FrameSizeSpec::new("40x30", 40.0, 30.0, "Medium", 64),
                FrameSizeSpec::new("50x40", 50.0, 40.0, "Large", 84),
                FrameSizeSpec::new("60x40", 60.0, 40.0, "XL", 99),
            ],
            mat_borders: vec![
                MatBorder::none(),
                MatBorder::new("thin", "Thin Mat", 6.0),
                MatBorder::new("medium", "Medium Mat", 12.0),
                MatBorder::new("thick", "Thick Mat", 18.0),
            ],
            effects: vec![
                EffectSpec::original(),
                EffectSpec::new("warm", "Warm"),
                EffectSpec::new("sepia", "Sepia"),
                EffectSpec::new("bw", "B&W"),
                EffectSpec::new("tint", "Tint"),
                EffectSpec::new("maple", "Maple"),
                EffectSpec::new("sedan", "Sedan"),
            ],
        };

        Self {
            tables,
            fallback: Fallbacks::default(),
        }
    }

    /// Parses and validates a catalog from JSON.
    pub fn from_json(json: &str) -> PreviewResult<Self> {
        let tables: CatalogTables = serde_json::from_str(json)?;
        Ok(Self::from_tables(tables)?)
    }

    /// Serializes the tables to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.tables)
    }

    /// Serializes the tables to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.tables)
    }

    pub fn frame_styles(&self) -> &[FrameStyle] {
        &self.tables.frame_styles
    }

    pub fn frame_sizes(&self) -> &[FrameSizeSpec] {
        &self.tables.frame_sizes
    }

    pub fn mat_borders(&self) -> &[MatBorder] {
        &self.tables.mat_borders
    }

    pub fn effects(&self) -> &[EffectSpec] {
        &self.tables.effects
    }

    /// Looks up a frame style, falling back to frameless.
    pub fn frame_style(&self, id: &str) -> &FrameStyle {
        find(&self.tables.frame_styles, id, |s| &s.id).unwrap_or_else(|| {
            tracing::debug!(id, "unknown frame style, using frameless");
            &self.fallback.frame_style
        })
    }

    /// Looks up a frame size, falling back to 30×20 (3:2).
    pub fn frame_size(&self, id: &str) -> &FrameSizeSpec {
        find(&self.tables.frame_sizes, id, |s| &s.id).unwrap_or_else(|| {
            tracing::debug!(id, "unknown frame size, using 30x20");
            &self.fallback.frame_size
        })
    }

    /// Looks up a mat border, falling back to no mat.
    pub fn mat_border(&self, id: &str) -> &MatBorder {
        find(&self.tables.mat_borders, id, |m| &m.id).unwrap_or_else(|| {
            tracing::debug!(id, "unknown mat border, using none");
            &self.fallback.mat_border
        })
    }

    /// Looks up an effect, falling back to the original.
    pub fn effect(&self, id: &str) -> &EffectSpec {
        find(&self.tables.effects, id, |e| &e.id).unwrap_or_else(|| {
            tracing::debug!(id, "unknown effect, using original");
            &self.fallback.effect
        })
    }

    /// Resolves every id in a customization.
    pub fn resolve(&self, customization: &Customization) -> ResolvedCustomization<'_> {
        ResolvedCustomization {
            frame_style: self.frame_style(&customization.frame_style_id),
            frame_size: self.frame_size(&customization.frame_size_id),
            mat_border: self.mat_border(&customization.mat_border_id),
            effect: self.effect(&customization.effect_id),
        }
    }

    /// Price of a customization. Only the print size is priced.
    pub fn quote(&self, customization: &Customization) -> u32 {
        self.frame_size(&customization.frame_size_id).price
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn find<'a, T>(items: &'a [T], id: &str, key: impl Fn(&T) -> &String) -> Option<&'a T> {
    items.iter().find(|item| key(item) == id)
}

fn check_ids<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(CatalogError::EmptyId { table });
        }
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                table,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
