//! Layout geometry for a framed preview.
//!
//! All rectangles are in logical layout units (1 unit = 1 device pixel at a
//! pixel ratio of 1). [`FrameGeometry`] is pure arithmetic and can be
//! computed and tested without drawing anything.

/// Smallest dimension any fill or clip rectangle is allowed to have.
pub const MIN_EXTENT: f32 = 1.0;

/// A rectangle in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X offset from the left edge of the output box
    pub x: f32,
    /// Y offset from the top edge of the output box
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle at the origin with the given size.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Shrinks the rectangle by `amount` on every side.
    ///
    /// The resulting width and height are floored at [`MIN_EXTENT`] so that
    /// pathological insets never produce empty or negative rectangles.
    pub fn inset(&self, amount: f32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2.0).max(MIN_EXTENT),
            height: (self.height - amount * 2.0).max(MIN_EXTENT),
        }
    }

    /// Converts to a tiny-skia rectangle.
    ///
    /// Only fails for non-finite input; callers skip the draw in that case.
    pub fn to_skia(&self) -> Option<resvg::tiny_skia::Rect> {
        resvg::tiny_skia::Rect::from_xywh(
            self.x,
            self.y,
            self.width.max(MIN_EXTENT),
            self.height.max(MIN_EXTENT),
        )
    }
}

/// A 2D size in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// A 2D size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

// ============================================================================
// FrameGeometry
// ============================================================================

/// The nested rectangles of a framed preview, outer to inner.
///
/// ```text
/// ┌──────────── outer ────────────┐
/// │ frame (thickness)             │
/// │  ┌───────── mat_box ───────┐  │
/// │  │ mat (inset)             │  │
/// │  │  ┌──── image_box ────┐  │  │
/// │  │  │                   │  │  │
/// │  │  └───────────────────┘  │  │
/// │  └─────────────────────────┘  │
/// └───────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// Logical display size; also the outer box.
    pub display: Size,
    /// Device pixel ratio used to rasterize, always >= 1.
    pub pixel_ratio: f32,
    /// Frame border thickness, 0 for frameless styles.
    pub frame_thickness: f32,
    /// Mat inset, 0 when no mat is drawn.
    pub mat_inset: f32,
    pub outer: Rect,
    pub mat_box: Rect,
    pub image_box: Rect,
}

/// Inputs to [`FrameGeometry::compute`], already resolved from the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryInput {
    pub width: f32,
    pub height: Option<f32>,
    pub pixel_ratio: Option<f32>,
    /// Width / height of the selected frame size.
    pub aspect_ratio: f32,
    pub has_frame: bool,
    pub mat_width: f32,
    /// Frame thickness as a fraction of display width.
    pub frame_ratio: f32,
}

impl FrameGeometry {
    pub fn compute(input: GeometryInput) -> Self {
        let width = sanitize_extent(input.width);
        let height = match input.height {
            Some(h) => sanitize_extent(h),
            None => sanitize_extent((width / input.aspect_ratio).round()),
        };
        let pixel_ratio = sanitize_pixel_ratio(input.pixel_ratio);

        let frame_thickness = if input.has_frame && input.frame_ratio.is_finite() {
            (width * input.frame_ratio.max(0.0)).round()
        } else {
            0.0
        };
        let mat_inset = if input.mat_width.is_finite() {
            input.mat_width.max(0.0)
        } else {
            0.0
        };

        let display = Size::new(width, height);
        let outer = Rect::from_size(display);
        let mat_box = outer.inset(frame_thickness);
        let image_box = mat_box.inset(mat_inset);

        Self {
            display,
            pixel_ratio,
            frame_thickness,
            mat_inset,
            outer,
            mat_box,
            image_box,
        }
    }

    /// Physical raster size: `round(width * dpr) x round(height * dpr)`.
    pub fn pixel_size(&self) -> SizePx {
        let scale = |v: f32| ((v * self.pixel_ratio).round() as u32).max(1);
        SizePx::new(scale(self.display.width), scale(self.display.height))
    }

    pub fn has_frame(&self) -> bool {
        self.frame_thickness > 0.0
    }

    pub fn has_mat(&self) -> bool {
        self.mat_inset > 0.0
    }
}

/// Clamps a requested display extent to something drawable.
fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() { value.max(MIN_EXTENT) } else { MIN_EXTENT }
}

/// Unknown, non-finite, or sub-1 pixel ratios render at 1.
fn sanitize_pixel_ratio(ratio: Option<f32>) -> f32 {
    match ratio {
        Some(r) if r.is_finite() && r >= 1.0 => r,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(width: f32, aspect_ratio: f32) -> GeometryInput {
        GeometryInput {
            width,
            height: None,
            pixel_ratio: None,
            aspect_ratio,
            has_frame: true,
            mat_width: 12.0,
            frame_ratio: 0.055,
        }
    }

    #[test]
    fn rect_edges_and_inset() {
        let rect = Rect::new(10.0, 20.0, 100.0, 200.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 220.0);
        assert_eq!(rect.inset(5.0), Rect::new(15.0, 25.0, 90.0, 190.0));
    }

    #[test]
    fn inset_is_floored() {
        let rect = Rect::new(0.0, 0.0, 10.0, 4.0).inset(3.0);
        assert_eq!(rect, Rect::new(3.0, 3.0, 4.0, 1.0));

        let rect = Rect::new(0.0, 0.0, 10.0, 10.0).inset(50.0);
        assert_eq!(rect.width, 1.0);
        assert_eq!(rect.height, 1.0);
    }

    #[test]
    fn reference_layout() {
        let geometry = FrameGeometry::compute(input(280.0, 1.5));
        assert_eq!(geometry.display, Size::new(280.0, 187.0));
        assert_eq!(geometry.frame_thickness, 15.0);
        assert_eq!(geometry.mat_box, Rect::new(15.0, 15.0, 250.0, 157.0));
        assert_eq!(geometry.image_box, Rect::new(27.0, 27.0, 226.0, 133.0));
        assert_eq!(geometry.pixel_size(), SizePx::new(280, 187));
    }

    #[test]
    fn height_follows_aspect_ratio() {
        let cases = [(280.0, 1.0), (280.0, 1.5), (300.0, 4.0 / 3.0), (333.0, 1.25), (17.0, 1.5)];
        for (width, ratio) in cases {
            let geometry = FrameGeometry::compute(input(width, ratio));
            assert_eq!(geometry.display.height, (width / ratio).round());
        }
    }

    #[test]
    fn explicit_height_wins() {
        let mut req = input(280.0, 1.5);
        req.height = Some(400.0);
        let geometry = FrameGeometry::compute(req);
        assert_eq!(geometry.display, Size::new(280.0, 400.0));
    }

    #[test]
    fn frameless_mat_box_is_outer() {
        let mut req = input(280.0, 1.5);
        req.has_frame = false;
        let geometry = FrameGeometry::compute(req);
        assert_eq!(geometry.frame_thickness, 0.0);
        assert!(!geometry.has_frame());
        assert_eq!(geometry.mat_box, geometry.outer);
    }

    #[test]
    fn oversized_mat_keeps_image_box_drawable() {
        let mut req = input(280.0, 1.5);
        req.mat_width = 500.0;
        let geometry = FrameGeometry::compute(req);
        assert!(geometry.image_box.width >= 1.0);
        assert!(geometry.image_box.height >= 1.0);
    }

    #[test]
    fn pixel_ratio_scales_raster_only() {
        let mut req = input(280.0, 1.5);
        req.pixel_ratio = Some(2.0);
        let geometry = FrameGeometry::compute(req);
        assert_eq!(geometry.display, Size::new(280.0, 187.0));
        assert_eq!(geometry.pixel_size(), SizePx::new(560, 374));

        req.pixel_ratio = Some(1.5);
        assert_eq!(FrameGeometry::compute(req).pixel_size(), SizePx::new(420, 281));
    }

    #[test]
    fn bad_pixel_ratios_fall_back_to_one() {
        for ratio in [None, Some(0.0), Some(-2.0), Some(0.5), Some(f32::NAN), Some(f32::INFINITY)] {
            let mut req = input(100.0, 1.0);
            req.pixel_ratio = ratio;
            assert_eq!(FrameGeometry::compute(req).pixel_ratio, 1.0);
        }
    }

    #[test]
    fn degenerate_width_is_clamped() {
        for width in [0.0, -50.0, f32::NAN] {
            let geometry = FrameGeometry::compute(input(width, 1.5));
            assert_eq!(geometry.display.width, 1.0);
            assert!(geometry.display.height >= 1.0);
            assert!(geometry.mat_box.width >= 1.0 && geometry.mat_box.height >= 1.0);
            assert!(geometry.image_box.width >= 1.0 && geometry.image_box.height >= 1.0);
            assert_eq!(geometry.pixel_size(), SizePx::new(1, 1));
        }
    }

    #[test]
    fn thick_frame_floors_mat_box() {
        let mut req = input(10.0, 1.0);
        req.frame_ratio = 0.9;
        let geometry = FrameGeometry::compute(req);
        assert_eq!(geometry.frame_thickness, 9.0);
        assert_eq!(geometry.mat_box.width, 1.0);
        assert_eq!(geometry.mat_box.height, 1.0);
    }

    #[test]
    fn bad_frame_ratio_draws_no_frame() {
        for ratio in [-0.2, f32::NAN, f32::INFINITY] {
            let mut req = input(280.0, 1.5);
            req.frame_ratio = ratio;
            let geometry = FrameGeometry::compute(req);
            assert_eq!(geometry.frame_thickness, 0.0);
            assert_eq!(geometry.mat_box, geometry.outer);
            assert!(geometry.image_box.width.is_finite());
        }
    }
}
