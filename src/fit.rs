//! Aspect-preserving image fit math.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// How the decoded photo is placed inside the image box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// Fill the box completely, cropping overflow equally on both sides.
    #[default]
    Cover,
    /// Fit entirely inside the box, leaving bands on one axis.
    Contain,
}

/// A scaled placement relative to the destination box origin.
///
/// For cover fits the offsets are zero or negative; for contain fits they
/// are zero or positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fit {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Fit {
    /// Uniform scale factor from source pixels to destination units.
    pub fn scale(&self, src: Size) -> f32 {
        self.width / src.width.max(1.0)
    }
}

impl FitMode {
    pub fn fit(self, src: Size, dst: Size) -> Fit {
        match self {
            Self::Cover => fit_cover(src, dst),
            Self::Contain => fit_contain(src, dst),
        }
    }
}

/// Scales `src` so it covers `dst` with no gaps, centered on both axes.
///
/// When the source is wider than the destination (by aspect ratio) the
/// height matches and the overflow is trimmed left and right; otherwise the
/// width matches and the overflow is trimmed top and bottom.
pub fn fit_cover(src: Size, dst: Size) -> Fit {
    let (src_w, src_h) = (src.width.max(1.0), src.height.max(1.0));
    let src_ratio = src_w / src_h;
    let dst_ratio = dst.width / dst.height;

    if src_ratio > dst_ratio {
        let height = dst.height;
        let width = height * src_ratio;
        Fit {
            width,
            height,
            offset_x: -(width - dst.width) / 2.0,
            offset_y: 0.0,
        }
    } else {
        let width = dst.width;
        let height = width / src_ratio;
        Fit {
            width,
            height,
            offset_x: 0.0,
            offset_y: -(height - dst.height) / 2.0,
        }
    }
}

/// Scales `src` to fit entirely inside `dst`, centered on both axes.
pub fn fit_contain(src: Size, dst: Size) -> Fit {
    let (src_w, src_h) = (src.width.max(1.0), src.height.max(1.0));
    let src_ratio = src_w / src_h;
    let dst_ratio = dst.width / dst.height;

    if src_ratio > dst_ratio {
        let width = dst.width;
        let height = width / src_ratio;
        Fit {
            width,
            height,
            offset_x: 0.0,
            offset_y: (dst.height - height) / 2.0,
        }
    } else {
        let height = dst.height;
        let width = height * src_ratio;
        Fit {
            width,
            height,
            offset_x: (dst.width - width) / 2.0,
            offset_y: 0.0,
        }
    }
}
