//! Image layer: the customer's photo, or a placeholder when it failed to
//! decode.

use image::RgbaImage;
use resvg::tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Transform,
};

use super::svg::{TextLabel, draw_label, rgba_image_to_pixmap};
use super::{LayerEffect, RenderContext};
use crate::config::PlaceholderConfig;
use crate::effect::FilterChain;
use crate::fit::FitMode;
use crate::geometry::Size;

// ============================================================================
// PhotoLayer
// ============================================================================

/// Draws a decoded photo into the image box.
///
/// The photo is scaled with `fit`, clipped strictly to the image box, and
/// filtered on its own pixmap before being composited, so the effect never
/// bleeds onto the frame or mat.
#[derive(Debug, Clone)]
pub struct PhotoLayer<'a> {
    pub image: &'a RgbaImage,
    pub fit: FitMode,
    pub filter: &'a FilterChain,
}

impl<'a> PhotoLayer<'a> {
    pub fn new(image: &'a RgbaImage, fit: FitMode, filter: &'a FilterChain) -> Self {
        Self { image, fit, filter }
    }

    /// Maps source pixels to device pixels.
    fn placement(&self, ctx: &RenderContext, src: Size) -> Transform {
        let image_box = ctx.geometry.image_box;
        let fit = self.fit.fit(src, image_box.size());
        let scale_x = fit.width / src.width;
        let scale_y = fit.height / src.height;

        ctx.transform()
            .pre_translate(image_box.x + fit.offset_x, image_box.y + fit.offset_y)
            .pre_scale(scale_x, scale_y)
    }

    /// Coverage mask for the image box in device pixels.
    fn clip_mask(ctx: &RenderContext) -> Option<Mask> {
        let rect = ctx.geometry.image_box.to_skia()?;
        let mut mask = Mask::new(ctx.pixmap.width(), ctx.pixmap.height())?;
        mask.fill_path(&PathBuilder::from_rect(rect), FillRule::Winding, true, ctx.transform());
        Some(mask)
    }
}

impl LayerEffect for PhotoLayer<'_> {
    fn paint(&self, ctx: &mut RenderContext) {
        let Some(source) = rgba_image_to_pixmap(self.image) else {
            return;
        };
        let Some(mask) = Self::clip_mask(ctx) else {
            return;
        };

        let src_size = Size::new(source.width() as f32, source.height() as f32);
        let transform = self.placement(ctx, src_size);
        let paint = PixmapPaint {
            quality: FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };

        if self.filter.is_identity() {
            ctx.pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, Some(&mask));
            return;
        }

        // Filter on a separate layer so only photo pixels are touched
        let Some(mut layer) = Pixmap::new(ctx.pixmap.width(), ctx.pixmap.height()) else {
            return;
        };
        layer.draw_pixmap(0, 0, source.as_ref(), &paint, transform, Some(&mask));
        self.filter.apply_to_pixmap(&mut layer);
        ctx.pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

// ============================================================================
// PlaceholderLayer
// ============================================================================

/// Fills the image box and centers a short message on the display.
#[derive(Debug, Clone)]
pub struct PlaceholderLayer<'a> {
    pub config: &'a PlaceholderConfig,
}

impl<'a> PlaceholderLayer<'a> {
    pub fn new(config: &'a PlaceholderConfig) -> Self {
        Self { config }
    }
}

impl LayerEffect for PlaceholderLayer<'_> {
    fn paint(&self, ctx: &mut RenderContext) {
        let geometry = ctx.geometry;
        let transform = ctx.transform();

        if let Some(rect) = geometry.image_box.to_skia() {
            let mut paint = Paint::default();
            paint.set_color(self.config.fill.to_color(255));
            ctx.pixmap.fill_rect(rect, &paint, transform, None);
        }

        if self.config.label.is_empty() {
            return;
        }
        let label = TextLabel {
            text: &self.config.label,
            color: self.config.text_color,
            font_size: self.config.font_size,
            font_family: &self.config.font_family,
            center: (geometry.display.width / 2.0, geometry.display.height / 2.0),
        };
        draw_label(&mut ctx.pixmap, geometry.display, &label, transform);
    }
}
