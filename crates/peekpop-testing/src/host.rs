//! In-memory host implementing both preview capabilities.

use peekpop_foundation::{
    ContentId, PeekPopGestureRecognizer, PreviewContainer, PreviewContentSupplier,
};
use peekpop_ui_graphics::{GraphicsLayer, Rect};
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};

/// A child the host has seen attached, with every layer written to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChildRecord {
    pub attached: bool,
    pub frame: Rect,
    pub attach_count: usize,
    pub detach_count: usize,
    pub layers: Vec<GraphicsLayer>,
}

impl ChildRecord {
    pub fn last_layer(&self) -> Option<GraphicsLayer> {
        self.layers.last().copied()
    }
}

/// Host that owns a content table and records everything the recognizer
/// does to it.
pub struct TestHost {
    bounds: Cell<Rect>,
    next_content: Cell<u64>,
    supplies_content: Cell<bool>,
    children: RefCell<FxHashMap<ContentId, ChildRecord>>,
    supplied: RefCell<Vec<ContentId>>,
    dismiss_requests: Cell<usize>,
    recognizer: RefCell<Option<PeekPopGestureRecognizer>>,
}

impl TestHost {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds: Cell::new(bounds),
            next_content: Cell::new(0),
            supplies_content: Cell::new(true),
            children: RefCell::new(FxHashMap::default()),
            supplied: RefCell::new(Vec::new()),
            dismiss_requests: Cell::new(0),
            recognizer: RefCell::new(None),
        }
    }

    /// Recognizer that dismissal requests are forwarded to.
    pub fn bind(&self, recognizer: PeekPopGestureRecognizer) {
        self.recognizer.replace(Some(recognizer));
    }

    pub fn unbind(&self) {
        self.recognizer.replace(None);
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    /// Whether presses get fresh content or are suppressed.
    pub fn set_supplies_content(&self, supplies: bool) {
        self.supplies_content.set(supplies);
    }

    pub fn supplied(&self) -> Vec<ContentId> {
        self.supplied.borrow().clone()
    }

    pub fn last_supplied(&self) -> Option<ContentId> {
        self.supplied.borrow().last().copied()
    }

    pub fn child(&self, content: ContentId) -> Option<ChildRecord> {
        self.children.borrow().get(&content).cloned()
    }

    pub fn is_attached(&self, content: ContentId) -> bool {
        self.children
            .borrow()
            .get(&content)
            .map(|child| child.attached)
            .unwrap_or(false)
    }

    pub fn attached_children(&self) -> Vec<ContentId> {
        let mut attached: Vec<ContentId> = self
            .children
            .borrow()
            .iter()
            .filter(|(_, child)| child.attached)
            .map(|(id, _)| *id)
            .collect();
        attached.sort();
        attached
    }

    pub fn total_attach_count(&self) -> usize {
        self.children
            .borrow()
            .values()
            .map(|child| child.attach_count)
            .sum()
    }

    pub fn dismiss_requests(&self) -> usize {
        self.dismiss_requests.get()
    }
}

impl PreviewContentSupplier for TestHost {
    fn supply_preview_content(&self) -> Option<ContentId> {
        if !self.supplies_content.get() {
            return None;
        }
        let id = ContentId(self.next_content.get() + 1);
        self.next_content.set(id.0);
        self.supplied.borrow_mut().push(id);
        Some(id)
    }

    fn on_dismiss_requested(&self) {
        self.dismiss_requests.set(self.dismiss_requests.get() + 1);
        let recognizer = self.recognizer.borrow().clone();
        match recognizer {
            Some(recognizer) => recognizer.dismiss(),
            None => log::warn!("dismiss requested with no recognizer bound"),
        }
    }
}

impl PreviewContainer for TestHost {
    fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    fn attach_child(&self, content: ContentId, frame: Rect) {
        let mut children = self.children.borrow_mut();
        let child = children.entry(content).or_default();
        child.attached = true;
        child.frame = frame;
        child.attach_count += 1;
    }

    fn detach_child(&self, content: ContentId) {
        if let Some(child) = self.children.borrow_mut().get_mut(&content) {
            if child.attached {
                child.attached = false;
                child.detach_count += 1;
            }
        }
    }

    fn set_child_layer(&self, content: ContentId, layer: GraphicsLayer) {
        if let Some(child) = self.children.borrow_mut().get_mut(&content) {
            child.layers.push(layer);
        }
    }
}
