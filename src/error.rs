//! Error types for the fallible, non-render entry points.
//!
//! Rendering itself never fails: catalog misses fall back to defaults and
//! decode failures become placeholder pixels. These errors only surface when
//! parsing colors, loading catalog/config JSON, or encoding output.

use crate::loader::LoadError;

/// Convenience result type for this crate.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Top-level error taxonomy.
#[derive(thiserror::Error, Debug)]
pub enum PreviewError {
    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Errors when serializing or deserializing catalog or configuration JSON.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Errors when encoding a rendered preview.
    #[error("encode error: {0}")]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Invalid hex color input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),
}

/// Invalid catalog table contents.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("{table} entry has an empty id")]
    EmptyId { table: &'static str },

    #[error("duplicate {table} id {id:?}")]
    DuplicateId { table: &'static str, id: String },

    #[error("frame size {id:?} has invalid aspect ratio {ratio}")]
    InvalidRatio { id: String, ratio: f32 },

    #[error("mat border {id:?} has invalid width {width}")]
    InvalidMatWidth { id: String, width: f32 },
}

/// Invalid drawing constants.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidValue { field: &'static str, value: f32 },
}
