//! frame-preview: live compositing of framed photo previews
//!
//! Given a photo, a customization (frame style, print size, mat border, and
//! color effect) and a target width, this crate renders what the framed
//! print will look like: a bevelled moulding, a mat board, the photo cropped
//! into the opening with the effect applied, and a small depth shadow.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use frame_preview::{
//!     Catalog, Customization, DecodingLoader, FrameCompositor, ImageSource, RenderRequest,
//! };
//!
//! let compositor = FrameCompositor::new(Arc::new(Catalog::builtin()), DecodingLoader::new());
//!
//! let customization = Customization::default()
//!     .with_frame_style("walnut")
//!     .with_effect("warm");
//! let request = RenderRequest::new(ImageSource::path("missing.jpg"), customization, 280.0)
//!     .with_pixel_ratio(2.0);
//!
//! let preview = futures::executor::block_on(compositor.render(&request));
//!
//! // The file does not exist, so the placeholder was drawn.
//! assert!(preview.placeholder);
//! assert_eq!((preview.image.width(), preview.image.height()), (560, 374));
//! ```
//!
//! # Live previews
//!
//! Hosts that re-render on every change keep a [`PreviewSurface`] per view
//! and an [`ImageSlot`] for the current photo. The surface only keeps the
//! newest render; the slot releases temporary sources once no render needs
//! them.
//!
//! # Serializable selections
//!
//! [`Customization`], [`Catalog`] and [`CompositorConfig`] round-trip
//! through JSON with camelCase keys:
//!
//! ```
//! use frame_preview::{Catalog, Customization};
//!
//! let catalog = Catalog::builtin();
//! let customization = Customization::from_json(r#"{"frameSizeId":"50x40"}"#).unwrap();
//! assert_eq!(catalog.quote(&customization), 84);
//! ```

mod catalog;
mod color;
mod compositor;
mod config;
mod customization;
mod data_url;
mod effect;
mod error;
mod fit;
mod geometry;
mod layer;
mod loader;
mod slot;
mod surface;

pub use catalog::{
    Catalog, EffectSpec, FrameSizeSpec, FrameStyle, MatBorder, ResolvedCustomization,
};
pub use color::{HexColor, adjust};
pub use compositor::{FrameCompositor, RenderRequest, RenderResult};
pub use config::{AccentConfig, BevelConfig, CompositorConfig, MatConfig, PlaceholderConfig};
pub use customization::Customization;
pub use effect::{ColorOp, FilterChain, resolve as resolve_effect};
pub use error::{CatalogError, ColorError, ConfigError, PreviewError, PreviewResult};
pub use fit::{Fit, FitMode, fit_contain, fit_cover};
pub use geometry::{FrameGeometry, GeometryInput, Rect, Size, SizePx};
pub use layer::{
    AccentLayer, FrameLayer, LayerEffect, LayerPipeline, MatLayer, PhotoLayer, PlaceholderLayer,
    RenderContext,
};
pub use loader::{DecodedImage, DecodingLoader, ImageLoader, ImageSource, LoadError};
pub use slot::{ImageHandle, ImageSlot};
pub use surface::{PreviewSurface, RenderTicket};
