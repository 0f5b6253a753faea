//! Host for the demo screen: a "Long Tap on me" label whose preview is a
//! card with a "Close" button.

use peekpop_foundation::{
    ContentId, PeekPopGestureRecognizer, PreviewContainer, PreviewContentSupplier,
};
use peekpop_ui_graphics::{GraphicsLayer, Rect};
use std::cell::{Cell, RefCell};

pub const LABEL_TEXT: &str = "Long Tap on me";

pub struct DemoHost {
    bounds: Rect,
    next_content: Cell<u64>,
    attached: RefCell<Vec<ContentId>>,
    layer_updates: Cell<usize>,
    recognizer: RefCell<Option<PeekPopGestureRecognizer>>,
}

impl DemoHost {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            next_content: Cell::new(0),
            attached: RefCell::new(Vec::new()),
            layer_updates: Cell::new(0),
            recognizer: RefCell::new(None),
        }
    }

    /// Route the close button of previewed cards to `recognizer`.
    pub fn bind(&self, recognizer: PeekPopGestureRecognizer) {
        *self.recognizer.borrow_mut() = Some(recognizer);
    }

    pub fn attached(&self) -> Vec<ContentId> {
        self.attached.borrow().clone()
    }

    pub fn layer_updates(&self) -> usize {
        self.layer_updates.get()
    }

    /// The user tapped "Close" on the previewed card.
    pub fn tap_close(&self) {
        if self.attached.borrow().is_empty() {
            log::info!("close tapped with nothing on screen");
            return;
        }
        self.on_dismiss_requested();
    }
}

impl PreviewContentSupplier for DemoHost {
    fn supply_preview_content(&self) -> Option<ContentId> {
        let id = self.next_content.get() + 1;
        self.next_content.set(id);
        log::info!("building preview card #{id} for \"{LABEL_TEXT}\"");
        Some(ContentId(id))
    }

    fn on_dismiss_requested(&self) {
        let recognizer = self.recognizer.borrow().clone();
        match recognizer {
            Some(recognizer) => recognizer.dismiss(),
            None => log::warn!("dismiss requested before the recognizer was bound"),
        }
    }
}

impl PreviewContainer for DemoHost {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn attach_child(&self, content: ContentId, frame: Rect) {
        log::info!("attach {content:?} at {frame:?}");
        self.attached.borrow_mut().push(content);
    }

    fn detach_child(&self, content: ContentId) {
        let mut attached = self.attached.borrow_mut();
        if let Some(index) = attached.iter().position(|id| *id == content) {
            attached.remove(index);
            log::info!("detach {content:?}");
        }
    }

    fn set_child_layer(&self, content: ContentId, layer: GraphicsLayer) {
        self.layer_updates.set(self.layer_updates.get() + 1);
        log::debug!(
            "{content:?}: alpha {:.2} scale {:.2}x{:.2} offset ({:.1}, {:.1})",
            layer.alpha,
            layer.scale_x,
            layer.scale_y,
            layer.translation_x,
            layer.translation_y
        );
    }
}
