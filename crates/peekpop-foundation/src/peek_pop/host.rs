//! Capabilities a host provides to the recognizer.
//!
//! The recognizer keeps only `Weak` references to them: the host owns the
//! content and its view hierarchy.

use peekpop_ui_graphics::{GraphicsLayer, Rect};

/// Handle to content in a table owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(pub u64);

/// Supplies the content to preview.
pub trait PreviewContentSupplier {
    /// Content to peek for the press that just began, or `None` to suppress
    /// the peek. Called synchronously; must not block.
    fn supply_preview_content(&self) -> Option<ContentId>;

    /// Previewed content asked to be closed (e.g. its own close button).
    ///
    /// The recognizer never calls this; hosts implement it by forwarding to
    /// [`PeekPopGestureRecognizer::dismiss`](super::PeekPopGestureRecognizer::dismiss).
    fn on_dismiss_requested(&self);
}

/// The view that previewed content is attached to.
pub trait PreviewContainer {
    fn bounds(&self) -> Rect;

    fn attach_child(&self, content: ContentId, frame: Rect);

    /// Must tolerate content that is not attached.
    fn detach_child(&self, content: ContentId);

    fn set_child_layer(&self, content: ContentId, layer: GraphicsLayer);
}

/// A host that provides both capabilities.
pub trait PeekPopHost: PreviewContentSupplier + PreviewContainer {}

impl<T: PreviewContentSupplier + PreviewContainer + ?Sized> PeekPopHost for T {}
