//! Depth accent: a short shadow in the top-left corner of the frame opening.

use resvg::tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, PathBuilder, Point, SpreadMode, Stroke, Transform,
};

use super::{LayerEffect, RenderContext};
use crate::config::{AccentConfig, alpha_u8};
use crate::geometry::Rect;

/// Strokes the inside edge of the mat box with a diagonal gradient.
///
/// The gradient runs from the mat box corner (config color at config
/// opacity) to `extent` units down and right (transparent), padded beyond,
/// so only the top-left corner visibly darkens.
#[derive(Debug, Clone)]
pub struct AccentLayer<'a> {
    pub config: &'a AccentConfig,
}

impl<'a> AccentLayer<'a> {
    pub fn new(config: &'a AccentConfig) -> Self {
        Self { config }
    }

    pub fn stroke_rect(&self, mat_box: Rect) -> Rect {
        let inset = self.config.inset;
        Rect::new(
            mat_box.x + inset,
            mat_box.y + inset,
            mat_box.width - inset * 2.0,
            mat_box.height - inset * 2.0,
        )
    }

    fn paint_for(&self, mat_box: Rect) -> Option<Paint<'static>> {
        let color = self.config.color;
        let start = Point::from_xy(mat_box.x, mat_box.y);
        let end = Point::from_xy(mat_box.x + self.config.extent, mat_box.y + self.config.extent);
        let shader = LinearGradient::new(
            start,
            end,
            vec![
                GradientStop::new(0.0, color.to_color(alpha_u8(self.config.opacity))),
                GradientStop::new(1.0, Color::from_rgba8(color.r, color.g, color.b, 0)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        )?;

        Some(Paint {
            shader,
            anti_alias: true,
            ..Default::default()
        })
    }
}

impl LayerEffect for AccentLayer<'_> {
    fn paint(&self, ctx: &mut RenderContext) {
        let mat_box = ctx.geometry.mat_box;
        let transform = ctx.transform();
        let Some(rect) = self.stroke_rect(mat_box).to_skia() else {
            return;
        };
        let Some(paint) = self.paint_for(mat_box) else {
            return;
        };

        let stroke = Stroke {
            width: self.config.width,
            ..Default::default()
        };
        let path = PathBuilder::from_rect(rect);
        ctx.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }
}
