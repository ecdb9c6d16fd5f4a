//! Ownership of the photo currently shown in a preview.
//!
//! A host that creates temporary sources (object URLs, scratch files) wraps
//! them in a revocable [`ImageHandle`]. Every [`RenderRequest`] holds a clone,
//! so the source stays valid until the last in-flight render that uses it is
//! done, no matter how quickly the user swaps photos.
//!
//! [`RenderRequest`]: crate::RenderRequest

use std::fmt;
use std::sync::Arc;

use crate::loader::ImageSource;

type Release = Box<dyn FnOnce(&ImageSource) + Send + Sync>;

struct Inner {
    source: ImageSource,
    release: Option<Release>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::debug!(source = %self.source.describe(), "releasing image source");
            release(&self.source);
        }
    }
}

/// A shared reference to an [`ImageSource`].
///
/// Cloning is cheap. The release callback, if any, runs exactly once when
/// the last clone is dropped.
#[derive(Clone)]
pub struct ImageHandle {
    inner: Arc<Inner>,
}

impl ImageHandle {
    /// A handle with nothing to release.
    pub fn new(source: ImageSource) -> Self {
        Self::build(source, None)
    }

    /// A handle that calls `release` once the source is no longer referenced.
    pub fn revocable(
        source: ImageSource,
        release: impl FnOnce(&ImageSource) + Send + Sync + 'static,
    ) -> Self {
        Self::build(source, Some(Box::new(release)))
    }

    fn build(source: ImageSource, release: Option<Release>) -> Self {
        Self {
            inner: Arc::new(Inner { source, release }),
        }
    }

    pub fn source(&self) -> &ImageSource {
        &self.inner.source
    }

    /// Whether both handles refer to the same underlying source.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<ImageSource> for ImageHandle {
    fn from(source: ImageSource) -> Self {
        Self::new(source)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("source", &self.inner.source.describe())
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}

// ============================================================================
// ImageSlot
// ============================================================================

/// The host-side owner of the current photo.
///
/// Replacing or clearing the slot drops its reference to the previous
/// handle; the previous source is released as soon as no render still holds
/// it.
#[derive(Debug, Default)]
pub struct ImageSlot {
    handle: Option<ImageHandle>,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `handle` and returns a clone for the next render request.
    pub fn replace(&mut self, handle: impl Into<ImageHandle>) -> ImageHandle {
        let handle = handle.into();
        self.handle = Some(handle.clone());
        handle
    }

    pub fn clear(&mut self) {
        self.handle = None;
    }

    pub fn handle(&self) -> Option<&ImageHandle> {
        self.handle.as_ref()
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.handle.as_ref().map(ImageHandle::source)
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }
}
