//! Frame moulding layer: a base fill and four bevel facets.

use resvg::tiny_skia::{FillRule, Paint, Path, PathBuilder};

use super::{LayerEffect, RenderContext};
use crate::color::HexColor;
use crate::config::BevelConfig;
use crate::geometry::Rect;

// ============================================================================
// FrameLayer
// ============================================================================

/// Paints the frame ring around the mat box.
///
/// The whole outer box is filled with the base color first; later layers
/// cover the interior. Each facet is a trapezoid joining one outer edge to
/// the points `inset_ratio * thickness` in from the corners, shaded with
/// [`HexColor::adjust`]:
///
/// ```text
/// (0,0) ┌──────────── top ─────────────┐ (W,0)
///       │ ╲                          ╱ │
///       │   ┌──────────────────────┐   │
///  left │   │                      │   │ right
///       │   └──────────────────────┘   │
///       │ ╱                          ╲ │
/// (0,H) └─────────── bottom ───────────┘ (W,H)
/// ```
#[derive(Debug, Clone)]
pub struct FrameLayer<'a> {
    pub color: HexColor,
    pub bevel: &'a BevelConfig,
}

impl<'a> FrameLayer<'a> {
    pub fn new(color: HexColor, bevel: &'a BevelConfig) -> Self {
        Self { color, bevel }
    }

    /// Facet polygons and their colors, in paint order.
    pub fn facets(&self, outer: Rect, thickness: f32) -> [(HexColor, [(f32, f32); 4]); 4] {
        let Rect { x, y, width: w, height: h } = outer;
        let o = thickness * self.bevel.inset_ratio;

        [
            (
                self.color.adjust(self.bevel.top_delta),
                [(x, y), (x + w, y), (x + w - o, y + o), (x + o, y + o)],
            ),
            (
                self.color.adjust(self.bevel.left_delta),
                [(x, y), (x + o, y + o), (x + o, y + h - o), (x, y + h)],
            ),
            (
                self.color.adjust(self.bevel.bottom_delta),
                [(x, y + h), (x + w, y + h), (x + w - o, y + h - o), (x + o, y + h - o)],
            ),
            (
                self.color.adjust(self.bevel.right_delta),
                [(x + w, y), (x + w, y + h), (x + w - o, y + h - o), (x + w - o, y + o)],
            ),
        ]
    }
}

impl LayerEffect for FrameLayer<'_> {
    fn paint(&self, ctx: &mut RenderContext) {
        let geometry = ctx.geometry;
        let transform = ctx.transform();

        let Some(outer) = geometry.outer.to_skia() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(self.color.to_color(255));
        ctx.pixmap.fill_rect(outer, &paint, transform, None);

        for (color, points) in self.facets(geometry.outer, geometry.frame_thickness) {
            let Some(path) = polygon(&points) else {
                continue;
            };
            paint.set_color(color.to_color(255));
            ctx.pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
    }
}

fn polygon(points: &[(f32, f32)]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}
