//! The image-loading seam.
//!
//! Rendering awaits exactly one [`ImageLoader::load`] call per request. A
//! failed load is not an error to the caller of `render`; the compositor
//! draws a placeholder instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;
use url::Url;

use crate::data_url::{self, decode_data_url};
use crate::geometry::Size;

/// An opaque reference to a photo that has not been decoded yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// A URL: remote, object/blob URL, `data:`, or `file://`.
    Url(String),
    /// A local file.
    Path(PathBuf),
    /// Encoded image bytes (PNG, JPEG, ...).
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Short form for log fields; never includes byte contents or
    /// data URL payloads.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) if is_data_url(url) => data_url::describe(url),
            Self::Url(url) => url.clone(),
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

/// A decoded photo ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }
}

/// Why a photo could not be loaded.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The loader cannot fetch this kind of source.
    #[error("unsupported image source: {0}")]
    Unsupported(String),

    #[error("invalid image URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid data URL: {0}")]
    DataUrl(String),

    /// A `file:` URL that does not name a local path.
    #[error("not a local file URL: {0}")]
    NotLocalFile(String),

    #[error("decoded image is empty")]
    Empty,
}

/// Loads and decodes an [`ImageSource`].
///
/// Implementations make a single attempt; the compositor does not retry and
/// applies no timeout.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, source: &ImageSource) -> Result<DecodedImage, LoadError>;
}

#[async_trait]
impl<L: ImageLoader + ?Sized> ImageLoader for Arc<L> {
    async fn load(&self, source: &ImageSource) -> Result<DecodedImage, LoadError> {
        (**self).load(source).await
    }
}

// ============================================================================
// DecodingLoader
// ============================================================================

/// Decodes in-memory bytes and local files with the `image` crate.
///
/// `data:` URLs are decoded in memory and `file:` URLs are converted to
/// paths. Any other URL scheme is rejected with [`LoadError::Unsupported`];
/// hosts that fetch over the network supply their own loader.
///
/// Reading and decoding happen synchronously inside `load`, so the returned
/// future never yields and a large photo blocks the thread polling it.
/// Hosts sharing an async runtime with other work move the decode off that
/// thread:
///
/// ```
/// use async_trait::async_trait;
/// use frame_preview::{DecodedImage, DecodingLoader, ImageLoader, ImageSource, LoadError};
/// use futures::channel::oneshot;
///
/// struct ThreadLoader;
///
/// #[async_trait]
/// impl ImageLoader for ThreadLoader {
///     async fn load(&self, source: &ImageSource) -> Result<DecodedImage, LoadError> {
///         let (tx, rx) = oneshot::channel();
///         let source = source.clone();
///         std::thread::spawn(move || {
///             let _ = tx.send(futures::executor::block_on(DecodingLoader::new().load(&source)));
///         });
///         rx.await
///             .unwrap_or_else(|_| Err(LoadError::Unsupported("decode thread exited".into())))
///     }
/// }
///
/// let result = futures::executor::block_on(ThreadLoader.load(&ImageSource::path("missing.png")));
/// assert!(matches!(result, Err(LoadError::Io(_))));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodingLoader;

impl DecodingLoader {
    pub fn new() -> Self {
        Self
    }

    fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, LoadError> {
        let pixels = image::load_from_memory(bytes)?.to_rgba8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(LoadError::Empty);
        }
        Ok(DecodedImage::new(pixels))
    }

    fn decode_path(path: &Path) -> Result<DecodedImage, LoadError> {
        let bytes = std::fs::read(path)?;
        Self::decode_bytes(&bytes)
    }

    fn decode_url(raw: &str) -> Result<DecodedImage, LoadError> {
        let url = Url::parse(raw)?;
        match url.scheme() {
            "data" => {
                let data = decode_data_url(raw)?;
                tracing::trace!(
                    media_type = %data.media_type,
                    len = data.bytes.len(),
                    "decoding data URL"
                );
                Self::decode_bytes(&data.bytes)
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| LoadError::NotLocalFile(raw.to_string()))?;
                Self::decode_path(&path)
            }
            _ => Err(LoadError::Unsupported(raw.to_string())),
        }
    }
}

fn is_data_url(url: &str) -> bool {
    url.trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

#[async_trait]
impl ImageLoader for DecodingLoader {
    async fn load(&self, source: &ImageSource) -> Result<DecodedImage, LoadError> {
        match source {
            ImageSource::Bytes(bytes) => Self::decode_bytes(bytes),
            ImageSource::Path(path) => Self::decode_path(path),
            ImageSource::Url(url) => Self::decode_url(url),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use futures::executor::block_on;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    /// Encodes a solid-color PNG.
    pub(crate) fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_png_bytes() {
        let source = ImageSource::bytes(png_bytes(8, 4, [10, 20, 30, 255]));
        let decoded = block_on(DecodingLoader::new().load(&source)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
        assert_eq!(decoded.size(), Size::new(8.0, 4.0));
        assert_eq!(decoded.pixels.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn corrupt_bytes_fail_to_decode() {
        let source = ImageSource::bytes(vec![0u8, 1, 2, 3, 4, 5]);
        let result = block_on(DecodingLoader::new().load(&source));
        assert!(matches!(result, Err(LoadError::Decode(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = ImageSource::path("/definitely/not/here.png");
        let result = block_on(DecodingLoader::new().load(&source));
        assert!(matches!(result, Err(LoadError::Io(_))));

        let source = ImageSource::url("file:///definitely/not/here.png");
        let result = block_on(DecodingLoader::new().load(&source));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn reads_local_files() {
        let name = format!("frame-preview-loader-{}.png", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, png_bytes(3, 5, [0, 0, 255, 255])).unwrap();

        let decoded = block_on(DecodingLoader::new().load(&ImageSource::path(&path))).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 5));

        let url = Url::from_file_path(&path).unwrap();
        let decoded = block_on(DecodingLoader::new().load(&ImageSource::url(url))).unwrap();
        assert_eq!(decoded.pixels.get_pixel(1, 1).0, [0, 0, 255, 255]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_urls_are_percent_decoded() {
        let dir = std::env::temp_dir().join(format!("frame preview {}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("my photo.png");
        std::fs::write(&path, png_bytes(2, 2, [0, 255, 0, 255])).unwrap();

        let url = Url::from_file_path(&path).unwrap();
        assert!(url.as_str().contains("my%20photo.png"));
        let decoded = block_on(DecodingLoader::new().load(&ImageSource::url(url))).unwrap();
        assert_eq!(decoded.pixels.get_pixel(0, 0).0, [0, 255, 0, 255]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn localhost_file_url_is_local() {
        let name = format!("frame-preview-localhost-{}.png", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, png_bytes(4, 1, [9, 9, 9, 255])).unwrap();

        let url = format!("file://localhost{}", path.display());
        let decoded = block_on(DecodingLoader::new().load(&ImageSource::url(url))).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 1));

        std::fs::remove_file(&path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn remote_host_file_url_is_rejected() {
        let source = ImageSource::url("file://fileserver/share/photo.png");
        let result = block_on(DecodingLoader::new().load(&source));
        assert!(matches!(result, Err(LoadError::NotLocalFile(_))));
    }

    #[test]
    fn remote_urls_are_unsupported() {
        let source = ImageSource::url("https://example.com/photo.jpg");
        let result = block_on(DecodingLoader::new().load(&source));
        assert!(matches!(result, Err(LoadError::Unsupported(url)) if url.contains("example.com")));

        let source = ImageSource::url("blob:https://shop.example/1f2e");
        let result = block_on(DecodingLoader::new().load(&source));
        assert!(matches!(result, Err(LoadError::Unsupported(_))));
    }

    #[test]
    fn data_url_decodes() {
        let encoded = STANDARD.encode(png_bytes(6, 3, [200, 100, 50, 255]));
        let source = ImageSource::url(format!("data:image/png;base64,{encoded}"));
        let decoded = block_on(DecodingLoader::new().load(&source)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 3));
        assert_eq!(decoded.pixels.get_pixel(5, 2).0, [200, 100, 50, 255]);

        // percent-encoded payloads work too
        let png = png_bytes(1, 1, [1, 2, 3, 255]);
        let escaped: String = png.iter().map(|b| format!("%{b:02X}")).collect();
        let source = ImageSource::url(format!("data:image/png,{escaped}"));
        let decoded = block_on(DecodingLoader::new().load(&source)).unwrap();
        assert_eq!(decoded.pixels.get_pixel(0, 0).0, [1, 2, 3, 255]);
    }

    #[test]
    fn bad_data_urls_fail() {
        let source = ImageSource::url("data:image/png;base64,not base64!");
        let result = block_on(DecodingLoader::new().load(&source));
        assert!(matches!(result, Err(LoadError::DataUrl(_))));

        let source = ImageSource::url("data:text/plain,hello");
        let result = block_on(DecodingLoader::new().load(&source));
        assert!(matches!(result, Err(LoadError::Decode(_))));
    }

    #[test]
    fn malformed_url_is_rejected() {
        let result = block_on(DecodingLoader::new().load(&ImageSource::url("photo.jpg")));
        assert!(matches!(result, Err(LoadError::Url(_))));
    }

    #[test]
    fn describe_hides_bytes() {
        assert_eq!(ImageSource::bytes(vec![1u8, 2, 3]).describe(), "<3 bytes>");
        assert_eq!(ImageSource::url("blob:abc").describe(), "blob:abc");
        assert_eq!(
            ImageSource::url("data:image/png;base64,iVBORw0KGgo=").describe(),
            "data:image/png;base64,<12 chars>"
        );
    }
}
