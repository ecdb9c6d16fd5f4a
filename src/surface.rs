//! Latest-wins holder for a live preview.
//!
//! A host re-renders on every customization change, and renders can finish
//! out of order (a large photo decodes slower than a small one). Each render
//! takes a [`RenderTicket`] before it starts; only the result for the most
//! recently issued ticket is ever shown. Superseded renders still run to
//! completion and their results are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::compositor::{FrameCompositor, RenderRequest, RenderResult};
use crate::loader::ImageLoader;

/// A position in the render order of one [`PreviewSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket {
    seq: u64,
}

impl RenderTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    content: Option<Arc<RenderResult>>,
    committed_seq: u64,
}

/// The displayed preview of one product view.
///
/// Tickets are ordered per surface only; two surfaces never affect each
/// other.
#[derive(Debug, Default)]
pub struct PreviewSurface {
    issued: AtomicU64,
    state: Mutex<SurfaceState>,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new render, superseding every earlier ticket.
    pub fn issue(&self) -> RenderTicket {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        RenderTicket { seq }
    }

    /// Whether no newer ticket has been issued since `ticket`.
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.seq
    }

    /// Stores `result` if `ticket` is still current.
    ///
    /// Returns `false` and drops the result when a newer render has been
    /// issued.
    pub fn commit(&self, ticket: RenderTicket, result: RenderResult) -> bool {
        let mut state = self.lock();
        if !self.is_current(ticket) || ticket.seq <= state.committed_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq(),
                "discarding superseded render"
            );
            return false;
        }
        state.content = Some(Arc::new(result));
        state.committed_seq = ticket.seq;
        true
    }

    /// Issues a ticket, renders, and commits.
    ///
    /// Returns whether the result was kept.
    pub async fn render<L: ImageLoader>(
        &self,
        compositor: &FrameCompositor<L>,
        request: &RenderRequest,
    ) -> bool {
        let ticket = self.issue();
        let result = compositor.render(request).await;
        self.commit(ticket, result)
    }

    /// The most recently committed preview.
    pub fn content(&self) -> Option<Arc<RenderResult>> {
        self.lock().content.clone()
    }

    /// Sequence number of the newest ticket, 0 before the first.
    pub fn latest_seq(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Sequence number of the displayed preview, 0 if nothing is shown.
    pub fn committed_seq(&self) -> u64 {
        self.lock().committed_seq
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
