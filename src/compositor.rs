//! Frame preview compositor.

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};

use crate::catalog::{Catalog, ResolvedCustomization};
use crate::config::CompositorConfig;
use crate::customization::Customization;
use crate::effect;
use crate::error::PreviewResult;
use crate::geometry::{FrameGeometry, GeometryInput, Size, SizePx};
use crate::layer::{LayerPipeline, PhotoLayer, PlaceholderLayer, RenderContext};
use crate::loader::ImageLoader;
use crate::slot::ImageHandle;

// ============================================================================
// RenderRequest
// ============================================================================

/// Everything one render needs besides the catalog and loader.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// The photo; held for the whole render so it cannot be released early.
    pub source: ImageHandle,
    pub customization: Customization,
    /// Logical display width.
    pub width: f32,
    /// Logical display height; derived from the frame size's aspect ratio
    /// when absent.
    pub height: Option<f32>,
    /// Device pixel ratio; 1 when absent.
    pub pixel_ratio: Option<f32>,
}

impl RenderRequest {
    pub fn new(source: impl Into<ImageHandle>, customization: Customization, width: f32) -> Self {
        Self {
            source: source.into(),
            customization,
            width,
            height: None,
            pixel_ratio: None,
        }
    }

    /// Forces the display height instead of deriving it.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = Some(pixel_ratio);
        self
    }
}

// ============================================================================
// RenderResult
// ============================================================================

/// A finished preview.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Straight-alpha pixels sized by [`FrameGeometry::pixel_size`]. Empty
    /// only if that size is too large to allocate.
    pub image: RgbaImage,
    /// Logical size the image should be displayed at.
    pub logical_size: Size,
    pub geometry: FrameGeometry,
    /// The selection this preview shows.
    pub customization: Customization,
    /// True when the photo failed to load and the placeholder was drawn.
    pub placeholder: bool,
}

impl RenderResult {
    pub fn pixel_size(&self) -> SizePx {
        SizePx::new(self.image.width(), self.image.height())
    }

    /// Encodes the preview as PNG.
    pub fn encode_png(&self) -> PreviewResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

// ============================================================================
// FrameCompositor
// ============================================================================

/// Renders framed previews of a photo.
///
/// A compositor is immutable after construction and can be shared between
/// tasks; every [`render`](Self::render) call is independent.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use frame_preview::{
///     Catalog, Customization, DecodingLoader, FrameCompositor, ImageSource, RenderRequest,
/// };
///
/// let compositor = FrameCompositor::new(Arc::new(Catalog::builtin()), DecodingLoader::new());
/// let source = ImageSource::path("photo.jpg");
/// let request = RenderRequest::new(source, Customization::default(), 280.0);
///
/// let geometry = compositor.geometry(&request);
/// assert_eq!(geometry.display.height, 187.0);
/// assert_eq!(geometry.frame_thickness, 15.0);
/// ```
pub struct FrameCompositor<L> {
    catalog: Arc<Catalog>,
    config: CompositorConfig,
    loader: L,
}

impl<L: ImageLoader> FrameCompositor<L> {
    /// Creates a compositor with the default drawing constants.
    pub fn new(catalog: Arc<Catalog>, loader: L) -> Self {
        Self {
            catalog,
            config: CompositorConfig::default(),
            loader,
        }
    }

    /// Replaces the drawing constants.
    ///
    /// The config is used as given; [`CompositorConfig::validate`] checks it
    /// first.
    pub fn with_config(mut self, config: CompositorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Computes the layout for a request without drawing.
    pub fn geometry(&self, request: &RenderRequest) -> FrameGeometry {
        self.layout(request, &self.catalog.resolve(&request.customization))
    }

    fn layout(
        &self,
        request: &RenderRequest,
        resolved: &ResolvedCustomization<'_>,
    ) -> FrameGeometry {
        FrameGeometry::compute(GeometryInput {
            width: request.width,
            height: request.height,
            pixel_ratio: request.pixel_ratio,
            aspect_ratio: resolved.frame_size.ratio,
            has_frame: resolved.frame_style.color.is_some(),
            mat_width: resolved.mat_border.width,
            frame_ratio: self.config.frame_ratio,
        })
    }

    /// Renders a preview.
    ///
    /// Frame and mat are painted before the photo is loaded; the load is the
    /// only await. A load or decode failure is logged and rendered as the
    /// placeholder, so this never fails.
    #[tracing::instrument(
        skip(self, request),
        fields(
            frame = %request.customization.frame_style_id,
            size = %request.customization.frame_size_id,
            mat = %request.customization.mat_border_id,
            effect = %request.customization.effect_id,
            width = request.width,
        )
    )]
    pub async fn render(&self, request: &RenderRequest) -> RenderResult {
        let resolved = self.catalog.resolve(&request.customization);
        let geometry = self.layout(request, &resolved);
        let filter = effect::resolve(&resolved.effect.id);
        tracing::trace!(%filter, "resolved photo filter");
        let pipeline = LayerPipeline::build(&geometry, &self.config, resolved.frame_style.color);

        let mut ctx = RenderContext::new(geometry);
        if let Some(ctx) = ctx.as_mut() {
            pipeline.paint_backdrop(ctx);
        }

        let loaded = self.loader.load(request.source.source()).await;
        if let Err(err) = &loaded {
            tracing::warn!(
                source = %request.source.source().describe(),
                error = %err,
                "photo failed to load, drawing placeholder"
            );
        }

        let image = match ctx {
            Some(mut ctx) => {
                match &loaded {
                    Ok(photo) => {
                        let layer = PhotoLayer::new(&photo.pixels, self.config.image_fit, &filter);
                        pipeline.paint_foreground(&mut ctx, &layer);
                    }
                    Err(_) => {
                        let layer = PlaceholderLayer::new(&self.config.placeholder);
                        pipeline.paint_foreground(&mut ctx, &layer);
                    }
                }
                ctx.into_image()
            }
            None => {
                tracing::warn!(?geometry, "preview too large to allocate");
                RgbaImage::new(0, 0)
            }
        };

        RenderResult {
            image,
            logical_size: geometry.display,
            geometry,
            customization: request.customization.clone(),
            placeholder: loaded.is_err(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::{FrameSizeSpec, FrameStyle, MatBorder};
    use crate::loader::tests::png_bytes;
    use crate::loader::{DecodingLoader, ImageSource};
    use futures::executor::block_on;

    pub(crate) fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    pub(crate) fn red_photo() -> ImageSource {
        ImageSource::bytes(png_bytes(30, 20, [255, 0, 0, 255]))
    }

    fn compositor() -> FrameCompositor<DecodingLoader> {
        FrameCompositor::new(Arc::new(Catalog::builtin()), DecodingLoader::new())
    }

    fn render(request: &RenderRequest) -> RenderResult {
        init_tracing();
        block_on(compositor().render(request))
    }

    fn px(result: &RenderResult, x: u32, y: u32) -> [u8; 4] {
        result.image.get_pixel(x, y).0
    }

    fn gray(value: u8) -> [u8; 4] {
        [value, value, value, 255]
    }

    #[test]
    fn reference_preview() {
        let request = RenderRequest::new(red_photo(), Customization::default(), 280.0);
        let result = render(&request);

        assert!(!result.placeholder);
        assert_eq!(result.pixel_size(), SizePx::new(280, 187));
        assert_eq!(result.logical_size, Size::new(280.0, 187.0));
        assert_eq!(result.geometry.frame_thickness, 15.0);
        assert_eq!(result.customization, Customization::default());

        // bevel facets around #2b2b2b
        assert_eq!(px(&result, 140, 2), gray(68));
        assert_eq!(px(&result, 2, 93), gray(68));
        assert_eq!(px(&result, 140, 184), gray(8));
        assert_eq!(px(&result, 277, 93), gray(28));
        assert_eq!(px(&result, 140, 12), gray(43));

        // mat and photo
        assert_eq!(px(&result, 20, 93), gray(255));
        let [r, g, b, a] = px(&result, 140, 93);
        assert!(r >= 250 && g <= 5 && b <= 5 && a == 255);
    }

    #[test]
    fn black_and_white_effect() {
        let customization = Customization::default().with_effect("bw");
        let result = render(&RenderRequest::new(red_photo(), customization, 280.0));
        let [r, g, b, _] = px(&result, 140, 93);
        assert!((53..=55).contains(&r), "got {r}");
        assert_eq!((r, g), (g, b));

        // frame and mat are not filtered
        assert_eq!(px(&result, 140, 2), gray(68));
        assert_eq!(px(&result, 20, 93), gray(255));
    }

    #[test]
    fn unknown_effect_renders_like_original() {
        let original = render(&RenderRequest::new(red_photo(), Customization::default(), 280.0));
        let unknown = render(&RenderRequest::new(
            red_photo(),
            Customization::default().with_effect("vaporwave"),
            280.0,
        ));
        assert_eq!(original.image, unknown.image);
    }

    #[test]
    fn undecodable_photo_draws_placeholder() {
        let source = ImageSource::bytes(vec![1u8, 2, 3]);
        let request = RenderRequest::new(source, Customization::default(), 280.0);
        let result = render(&request);

        assert!(result.placeholder);
        assert_eq!(px(&result, 35, 120), [243, 244, 246, 255]);
        assert_eq!(px(&result, 140, 2), gray(68));
        assert_eq!(px(&result, 20, 93), gray(255));
    }

    #[test]
    fn uploaded_data_url_is_drawn() {
        use base64::Engine;

        let png = png_bytes(30, 20, [255, 0, 0, 255]);
        let encoded = base64::engine::general_purpose::STANDARD.encode(png);
        let source = ImageSource::url(format!("data:image/png;base64,{encoded}"));
        let result = render(&RenderRequest::new(source, Customization::default(), 280.0));

        assert!(!result.placeholder);
        let [r, g, b, _] = px(&result, 140, 93);
        assert!(r >= 250 && g <= 5 && b <= 5);
    }

    #[test]
    fn unsupported_url_draws_placeholder() {
        let request = RenderRequest::new(
            ImageSource::url("https://cdn.example.com/p.jpg"),
            Customization::default(),
            280.0,
        );
        assert!(render(&request).placeholder);
    }

    #[test]
    fn frameless_without_mat_is_all_photo() {
        let customization = Customization::default()
            .with_frame_style("none")
            .with_mat_border("none");
        let result = render(&RenderRequest::new(red_photo(), customization, 280.0));

        assert_eq!(result.geometry.frame_thickness, 0.0);
        assert_eq!(result.geometry.mat_box, result.geometry.outer);
        assert_eq!(result.geometry.image_box, result.geometry.outer);
        let [r, _, _, a] = px(&result, 0, 0);
        assert!(r >= 250 && a == 255);
    }

    #[test]
    fn unknown_ids_fall_back() {
        let customization = Customization::new("gold", "99x99", "velvet", "glow");
        let result = render(&RenderRequest::new(red_photo(), customization, 280.0));

        // frameless, 30x20, no mat
        assert_eq!(result.geometry.display, Size::new(280.0, 187.0));
        assert_eq!(result.geometry.frame_thickness, 0.0);
        assert_eq!(result.geometry.mat_inset, 0.0);
    }

    #[test]
    fn pixel_ratio_scales_output() {
        let request =
            RenderRequest::new(red_photo(), Customization::default(), 280.0).with_pixel_ratio(2.0);
        let result = render(&request);

        assert_eq!(result.pixel_size(), SizePx::new(560, 374));
        assert_eq!(result.logical_size, Size::new(280.0, 187.0));
        assert_eq!(px(&result, 280, 4), gray(68));
        assert_eq!(px(&result, 40, 186), gray(255));
    }

    #[test]
    fn explicit_height_overrides_ratio() {
        let request =
            RenderRequest::new(red_photo(), Customization::default(), 280.0).with_height(280.0);
        let result = render(&request);
        assert_eq!(result.pixel_size(), SizePx::new(280, 280));
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        for width in [0.0, -10.0, f32::NAN, 3.0] {
            let request = RenderRequest::new(red_photo(), Customization::default(), width);
            let result = render(&request);
            assert!(result.image.width() >= 1 && result.image.height() >= 1);
        }

        let catalog = Catalog::new(
            vec![FrameStyle::new("thick", "Thick", Some(crate::color::HexColor::BLACK))],
            vec![FrameSizeSpec::new("sq", 10.0, 10.0, "Square", 1)],
            vec![MatBorder::new("huge", "Huge", 500.0)],
            vec![],
        )
        .unwrap();
        let compositor = FrameCompositor::new(Arc::new(catalog), DecodingLoader::new());
        let customization = Customization::new("thick", "sq", "huge", "none");
        let request = RenderRequest::new(red_photo(), customization, 100.0);
        let result = block_on(compositor.render(&request));
        assert!(result.geometry.image_box.width >= 1.0);
        assert_eq!(result.pixel_size(), SizePx::new(100, 100));
    }

    #[test]
    fn contain_fit_from_config() {
        let config = CompositorConfig::from_json(r#"{ "imageFit": "contain" }"#).unwrap();
        let compositor = compositor().with_config(config);
        // 4:1 photo leaves mat-colored bands above and below
        let request = RenderRequest::new(
            ImageSource::bytes(png_bytes(400, 100, [255, 0, 0, 255])),
            Customization::default(),
            280.0,
        );
        let result = block_on(compositor.render(&request));
        assert_eq!(px(&result, 140, 30), gray(255));
        assert!(px(&result, 140, 93)[0] >= 250);
    }

    #[test]
    fn encodes_png() {
        let result = render(&RenderRequest::new(red_photo(), Customization::default(), 280.0));
        let bytes = result.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, result.image);
    }

    #[test]
    fn request_keeps_handle_alive() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let handle = ImageHandle::revocable(red_photo(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let request = RenderRequest::new(handle, Customization::default(), 280.0);

        let result = render(&request);
        assert!(!result.placeholder);
        assert_eq!(released.load(Ordering::SeqCst), 0);

        drop(request);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
