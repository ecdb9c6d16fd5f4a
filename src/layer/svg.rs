//! resvg/usvg helpers shared by the layers.
//!
//! Text is rendered by building a tiny SVG document and rasterizing it with
//! resvg, so the placeholder label gets real font shaping without a separate
//! text stack. Also converts between tiny-skia pixmaps (premultiplied) and
//! `image` buffers (straight alpha).

use std::sync::{Arc, OnceLock};

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, IntSize, Pixmap, Transform};
use resvg::usvg::{Options, Tree, fontdb};

use crate::color::HexColor;
use crate::geometry::Size;

// ============================================================================
// Text
// ============================================================================

/// A single line of centered text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel<'a> {
    pub text: &'a str,
    pub color: HexColor,
    pub font_size: f32,
    pub font_family: &'a str,
    /// Anchor point; the text is centered on it both ways.
    pub center: (f32, f32),
}

impl TextLabel<'_> {
    /// Builds an SVG document of `canvas` size holding just this label.
    pub fn to_svg(&self, canvas: Size) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" fill="{color}" "#,
                r#"text-anchor="middle" dominant-baseline="central">{text}</text></svg>"#,
            ),
            w = canvas.width,
            h = canvas.height,
            x = self.center.0,
            y = self.center.1,
            family = escape_xml(self.font_family),
            size = self.font_size,
            color = self.color,
            text = escape_xml(self.text),
        )
    }
}

/// Draws `label` onto `pixmap`.
///
/// `canvas` is the logical size the label coordinates refer to and
/// `transform` maps it to device pixels. Returns `false` if the generated
/// document could not be parsed, in which case nothing is drawn.
pub fn draw_label(
    pixmap: &mut Pixmap,
    canvas: Size,
    label: &TextLabel<'_>,
    transform: Transform,
) -> bool {
    let opts = Options {
        fontdb: system_fonts(),
        font_family: label.font_family.to_string(),
        ..Options::default()
    };

    let tree = match Tree::from_str(&label.to_svg(canvas), &opts) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::debug!(error = %err, "failed to build label document");
            return false;
        }
    };

    resvg::render(&tree, transform, &mut pixmap.as_mut());
    true
}

/// System fonts, loaded once per process.
///
/// When the generic `sans-serif` family maps to a face that is not
/// installed, it is pointed at the first installed family instead, so the
/// label still renders on minimal hosts.
fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            if !has_family(&db, fontdb::Family::SansSerif) {
                let fallback = db
                    .faces()
                    .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
                if let Some(name) = fallback {
                    tracing::debug!(family = %name, "no sans-serif face, falling back");
                    db.set_sans_serif_family(name);
                }
            }
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

fn has_family(db: &fontdb::Database, family: fontdb::Family<'_>) -> bool {
    let query = fontdb::Query {
        families: &[family],
        ..fontdb::Query::default()
    };
    db.query(&query).is_some()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Pixel conversion
// ============================================================================

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        // tiny_skia uses premultiplied alpha
        let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
        *dst = Rgba([r, g, b, a]);
    }

    img
}

/// Converts straight-alpha pixels to a premultiplied pixmap.
///
/// Returns `None` for empty images.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let mut data = Vec::with_capacity(img.as_raw().len());
    for pixel in img.pixels() {
        let [r, g, b, a] = pixel.0;
        let premul = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[premul.red(), premul.green(), premul.blue(), premul.alpha()]);
    }
    Pixmap::from_vec(data, size)
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}
