//! Mat board layer.

use resvg::tiny_skia::{Paint, PathBuilder, Stroke};

use super::{LayerEffect, RenderContext};
use crate::config::{MatConfig, alpha_u8};
use crate::geometry::Rect;

/// Fills the mat box and strokes a faint line just inside its edge.
#[derive(Debug, Clone)]
pub struct MatLayer<'a> {
    pub config: &'a MatConfig,
}

impl<'a> MatLayer<'a> {
    pub fn new(config: &'a MatConfig) -> Self {
        Self { config }
    }

    /// The stroke rectangle: half a unit inside the mat box so a 1-unit
    /// line lands on whole pixels.
    pub fn shadow_rect(mat_box: Rect) -> Rect {
        Rect::new(
            mat_box.x + 0.5,
            mat_box.y + 0.5,
            mat_box.width - 1.0,
            mat_box.height - 1.0,
        )
    }
}

impl LayerEffect for MatLayer<'_> {
    fn paint(&self, ctx: &mut RenderContext) {
        let mat_box = ctx.geometry.mat_box;
        let transform = ctx.transform();

        let Some(fill_rect) = mat_box.to_skia() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(self.config.color.to_color(255));
        ctx.pixmap.fill_rect(fill_rect, &paint, transform, None);

        let Some(shadow) = Self::shadow_rect(mat_box).to_skia() else {
            return;
        };
        let alpha = alpha_u8(self.config.shadow_opacity);
        if alpha == 0 || self.config.shadow_width <= 0.0 {
            return;
        }
        paint.set_color(self.config.shadow_color.to_color(alpha));
        let stroke = Stroke {
            width: self.config.shadow_width,
            ..Default::default()
        };
        let path = PathBuilder::from_rect(shadow);
        ctx.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }
}
