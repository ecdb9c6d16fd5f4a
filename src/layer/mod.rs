//! Layer infrastructure for the framed preview.
//!
//! The compositor paints a fixed stack of layers onto one pixmap, bottom to
//! top:
//!
//! ```text
//! ┌─────────┐
//! │  Frame  │ ◄── base fill + four bevel facets (framed styles only)
//! └────┬────┘
//!      ▼
//! ┌─────────┐
//! │   Mat   │ ◄── white board + faint inner line (mat width > 0)
//! └────┬────┘
//!      ▼
//! ┌─────────┐
//! │  Photo  │ ◄── clipped, fitted, filtered photo, or the placeholder
//! └────┬────┘
//!      ▼
//! ┌─────────┐
//! │ Accent  │ ◄── diagonal depth shadow (framed styles only)
//! └─────────┘
//! ```
//!
//! Each layer implements [`LayerEffect`] and draws in logical units; the
//! [`RenderContext`] carries the device-pixel transform. Nothing is cached
//! between renders.

pub mod accent;
pub mod frame;
pub mod mat;
pub mod photo;
pub mod svg;

pub use accent::AccentLayer;
pub use frame::FrameLayer;
pub use mat::MatLayer;
pub use photo::{PhotoLayer, PlaceholderLayer};

use image::RgbaImage;
use resvg::tiny_skia::{Pixmap, Transform};

use crate::color::HexColor;
use crate::config::CompositorConfig;
use crate::geometry::FrameGeometry;

// ============================================================================
// Render Context
// ============================================================================

/// The surface that flows through the layer stack.
pub struct RenderContext {
    /// Device-pixel raster, premultiplied.
    pub pixmap: Pixmap,

    /// Layout every layer positions itself against.
    pub geometry: FrameGeometry,
}

impl RenderContext {
    /// Allocates a transparent pixmap of the geometry's physical size.
    ///
    /// Returns `None` only if the size overflows what tiny-skia can allocate.
    pub fn new(geometry: FrameGeometry) -> Option<Self> {
        let size = geometry.pixel_size();
        let pixmap = Pixmap::new(size.width, size.height)?;
        Some(Self { pixmap, geometry })
    }

    /// Maps logical layout units to device pixels.
    pub fn transform(&self) -> Transform {
        Transform::from_scale(self.geometry.pixel_ratio, self.geometry.pixel_ratio)
    }

    /// Finishes the render, converting to straight-alpha RGBA.
    pub fn into_image(self) -> RgbaImage {
        svg::pixmap_to_rgba_image(&self.pixmap)
    }
}

// ============================================================================
// Layer Trait
// ============================================================================

/// A self-contained drawing step.
///
/// Layers read positions from [`RenderContext::geometry`] and draw with
/// [`RenderContext::transform`], so they never deal with the pixel ratio
/// directly.
pub trait LayerEffect {
    fn paint(&self, ctx: &mut RenderContext);
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// The layers for one render, split around the photo decode.
///
/// [`paint_backdrop`](Self::paint_backdrop) runs before the decode is
/// awaited; [`paint_foreground`](Self::paint_foreground) runs after it with
/// whichever image layer the decode produced.
pub struct LayerPipeline<'a> {
    /// Absent for frameless styles.
    pub frame: Option<FrameLayer<'a>>,

    /// Absent when the mat width is zero.
    pub mat: Option<MatLayer<'a>>,

    /// Drawn only over a frame.
    pub accent: Option<AccentLayer<'a>>,
}

impl<'a> LayerPipeline<'a> {
    /// Picks the active layers for a geometry and frame color.
    pub fn build(
        geometry: &FrameGeometry,
        config: &'a CompositorConfig,
        frame_color: Option<HexColor>,
    ) -> Self {
        let frame = frame_color
            .filter(|_| geometry.has_frame())
            .map(|color| FrameLayer::new(color, &config.bevel));
        let accent = frame.as_ref().map(|_| AccentLayer::new(&config.accent));
        let mat = geometry.has_mat().then(|| MatLayer::new(&config.mat));

        Self { frame, mat, accent }
    }

    /// Paints the frame and mat.
    pub fn paint_backdrop(&self, ctx: &mut RenderContext) {
        if let Some(frame) = &self.frame {
            frame.paint(ctx);
        }
        if let Some(mat) = &self.mat {
            mat.paint(ctx);
        }
    }

    /// Paints the image layer, then the accent above it.
    pub fn paint_foreground(&self, ctx: &mut RenderContext, image: &dyn LayerEffect) {
        image.paint(ctx);
        if let Some(accent) = &self.accent {
            accent.paint(ctx);
        }
    }
}
