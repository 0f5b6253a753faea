use super::*;

use crate::gesture_constants::POP_DELAY_MILLIS;
use crate::input::gestures::GesturePhase;
use crate::input::InputSurface;
use peekpop_core::RuntimeHandle;
use peekpop_ui_graphics::{GraphicsLayer, Rect};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

const HOST_BOUNDS: Rect = Rect::new(0.0, 0.0, 320.0, 480.0);
const CONTENT_X: ContentId = ContentId(1);
const CONTENT_Y: ContentId = ContentId(2);

#[derive(Default)]
struct FakeHost {
    supply: Cell<Option<ContentId>>,
    supply_requests: Cell<usize>,
    attached: RefCell<Vec<ContentId>>,
    attach_count: Cell<usize>,
    detach_count: Cell<usize>,
    layers: RefCell<Vec<(ContentId, GraphicsLayer)>>,
    recognizer: RefCell<Option<PeekPopGestureRecognizer>>,
}

impl FakeHost {
    fn is_attached(&self, content: ContentId) -> bool {
        self.attached.borrow().contains(&content)
    }

    fn first_layer(&self, content: ContentId) -> Option<GraphicsLayer> {
        self.layers
            .borrow()
            .iter()
            .find(|(id, _)| *id == content)
            .map(|(_, layer)| *layer)
    }

    fn last_layer(&self, content: ContentId) -> Option<GraphicsLayer> {
        self.layers
            .borrow()
            .iter()
            .rev()
            .find(|(id, _)| *id == content)
            .map(|(_, layer)| *layer)
    }
}

impl PreviewContentSupplier for FakeHost {
    fn supply_preview_content(&self) -> Option<ContentId> {
        self.supply_requests.set(self.supply_requests.get() + 1);
        self.supply.get()
    }

    fn on_dismiss_requested(&self) {
        let recognizer = self.recognizer.borrow().clone();
        if let Some(recognizer) = recognizer {
            recognizer.dismiss();
        }
    }
}

impl PreviewContainer for FakeHost {
    fn bounds(&self) -> Rect {
        HOST_BOUNDS
    }

    fn attach_child(&self, content: ContentId, _frame: Rect) {
        self.attached.borrow_mut().push(content);
        self.attach_count.set(self.attach_count.get() + 1);
    }

    fn detach_child(&self, content: ContentId) {
        let mut attached = self.attached.borrow_mut();
        if let Some(index) = attached.iter().position(|id| *id == content) {
            attached.remove(index);
            self.detach_count.set(self.detach_count.get() + 1);
        }
    }

    fn set_child_layer(&self, content: ContentId, layer: GraphicsLayer) {
        self.layers.borrow_mut().push((content, layer));
    }
}

struct Fixture {
    runtime: RuntimeHandle,
    recognizer: PeekPopGestureRecognizer,
    host: Rc<FakeHost>,
}

impl Fixture {
    fn new(style: PeekAnimationStyle) -> Self {
        let runtime = RuntimeHandle::new();
        let surface = InputSurface::new(Rect::new(100.0, 200.0, 120.0, 40.0));
        let recognizer = PeekPopGestureRecognizer::new(&runtime, &surface, style);
        let host = Rc::new(FakeHost::default());
        host.supply.set(Some(CONTENT_X));
        host.recognizer.replace(Some(recognizer.clone()));
        recognizer.set_delegate(&host);
        Self {
            runtime,
            recognizer,
            host,
        }
    }

    fn send(&self, phase: GesturePhase) {
        self.recognizer.on_gesture_phase_changed(phase);
    }

    fn advance(&self, millis: u64) {
        self.runtime.advance_by_millis(millis);
    }
}

#[test]
fn grow_in_peek_pops_after_hold_and_slides_out_on_request() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    assert!(fixture.host.is_attached(CONTENT_X));
    assert_eq!(fixture.host.attach_count.get(), 1);
    assert_eq!(
        fixture.host.first_layer(CONTENT_X),
        Some(GraphicsLayer::scaled(0.0, 0.0).with_alpha(0.0))
    );
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Peeking);
    assert_eq!(fixture.recognizer.previewed_content(), Some(CONTENT_X));
    assert!(fixture.recognizer.is_timer_active());
    assert_eq!(
        fixture.runtime.next_timer_due_nanos(),
        Some(POP_DELAY_MILLIS * 1_000_000)
    );

    fixture.advance(1_400);
    assert!(!fixture.recognizer.has_committed());
    assert_eq!(
        fixture.host.last_layer(CONTENT_X),
        Some(GraphicsLayer::scaled(PEEK_SCALE_X, PEEK_SCALE_Y))
    );

    fixture.advance(500);
    assert!(fixture.recognizer.has_committed());
    assert!(!fixture.recognizer.is_timer_active());
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Popped);
    assert_eq!(
        fixture.host.last_layer(CONTENT_X),
        Some(GraphicsLayer::IDENTITY)
    );

    // Releasing after the pop keeps the committed content on screen.
    fixture.send(GesturePhase::Ended);
    assert!(fixture.host.is_attached(CONTENT_X));
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Popped);

    fixture.host.on_dismiss_requested();
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Dismissing);
    assert_eq!(
        fixture.recognizer.last_dismiss_style(),
        Some(DismissStyle::SlideDown)
    );

    fixture.advance(300);
    assert!(!fixture.host.is_attached(CONTENT_X));
    assert_eq!(fixture.recognizer.previewed_content(), None);
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Idle);
    assert_eq!(
        fixture.host.last_layer(CONTENT_X),
        Some(GraphicsLayer::translated(0.0, HOST_BOUNDS.height).with_alpha(COMMITTED_DISMISS_ALPHA))
    );
}

#[test]
fn ended_before_pop_fades_out() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(500);
    fixture.send(GesturePhase::Ended);

    assert!(!fixture.recognizer.is_timer_active());
    assert!(!fixture.recognizer.has_committed());
    assert_eq!(
        fixture.recognizer.last_dismiss_style(),
        Some(DismissStyle::FadeOut)
    );

    fixture.advance(2_000);
    assert!(!fixture.recognizer.has_committed());
    assert!(!fixture.host.is_attached(CONTENT_X));
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Idle);
    assert_eq!(
        fixture.host.last_layer(CONTENT_X),
        Some(GraphicsLayer::scaled(PEEK_SCALE_X, PEEK_SCALE_Y).with_alpha(0.0))
    );
}

#[test]
fn cancelled_before_pop_fades_out() {
    let fixture = Fixture::new(PeekAnimationStyle::FadeIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(100);
    fixture.send(GesturePhase::Cancelled);
    fixture.advance(2_000);

    assert!(!fixture.recognizer.has_committed());
    assert_eq!(
        fixture.recognizer.last_dismiss_style(),
        Some(DismissStyle::FadeOut)
    );
    assert_eq!(fixture.host.detach_count.get(), 1);
    assert_eq!(fixture.host.last_layer(CONTENT_X).map(|layer| layer.alpha), Some(0.0));
}

#[test]
fn host_without_content_suppresses_the_peek() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);
    fixture.host.supply.set(None);
    let cycle = fixture.recognizer.cycle();

    fixture.send(GesturePhase::Began);

    assert_eq!(fixture.host.attach_count.get(), 0);
    assert!(!fixture.recognizer.is_timer_active());
    assert!(!fixture.runtime.has_pending_timers());
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Idle);
    assert_eq!(fixture.recognizer.cycle(), cycle);
}

#[test]
fn phases_without_began_are_inert() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    for phase in [
        GesturePhase::Changed,
        GesturePhase::Ended,
        GesturePhase::Cancelled,
        GesturePhase::Failed,
    ] {
        fixture.send(phase);
        fixture.advance(100);
    }

    assert_eq!(fixture.host.attach_count.get(), 0);
    assert!(fixture.host.layers.borrow().is_empty());
    assert!(!fixture.runtime.has_pending_timers());
    assert_eq!(fixture.recognizer.last_dismiss_style(), None);
}

#[test]
fn changed_does_not_disturb_a_peek() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.send(GesturePhase::Changed);

    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Peeking);
    assert!(fixture.recognizer.is_timer_active());
}

#[test]
fn failed_dismisses_committed_content() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(1_900);
    assert!(fixture.recognizer.has_committed());

    fixture.send(GesturePhase::Failed);
    assert_eq!(
        fixture.recognizer.last_dismiss_style(),
        Some(DismissStyle::SlideDown)
    );
    fixture.advance(300);

    assert!(!fixture.host.is_attached(CONTENT_X));
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Idle);
}

#[test]
fn failed_while_peeking_fades_out() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(300);
    fixture.send(GesturePhase::Failed);
    fixture.advance(2_000);

    assert!(!fixture.recognizer.has_committed());
    assert_eq!(
        fixture.recognizer.last_dismiss_style(),
        Some(DismissStyle::FadeOut)
    );
    assert!(!fixture.host.is_attached(CONTENT_X));
}

#[test]
fn pop_timer_commits_before_the_spring_settles() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(1_550);
    assert!(fixture.recognizer.has_committed());
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Popped);

    fixture.send(GesturePhase::Ended);
    fixture.advance(500);
    assert!(fixture.host.is_attached(CONTENT_X));

    fixture.recognizer.dismiss();
    fixture.advance(300);
    assert_eq!(
        fixture.recognizer.last_dismiss_style(),
        Some(DismissStyle::SlideDown)
    );
    assert!(!fixture.host.is_attached(CONTENT_X));
}

#[test]
fn failed_during_pop_spring_slides_out() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(1_550);
    fixture.send(GesturePhase::Failed);
    fixture.advance(300);

    assert_eq!(
        fixture.recognizer.last_dismiss_style(),
        Some(DismissStyle::SlideDown)
    );
    assert_eq!(
        fixture.host.last_layer(CONTENT_X),
        Some(GraphicsLayer::translated(0.0, HOST_BOUNDS.height).with_alpha(COMMITTED_DISMISS_ALPHA))
    );
    assert!(!fixture.host.is_attached(CONTENT_X));
}

#[test]
fn ended_after_commit_keeps_popped_content() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(1_900);
    fixture.send(GesturePhase::Ended);
    fixture.advance(1_000);

    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Popped);
    assert!(fixture.recognizer.has_committed());
    assert!(fixture.host.is_attached(CONTENT_X));
    assert_eq!(fixture.host.detach_count.get(), 0);
}

#[test]
fn dismissed_commit_does_not_leak_into_the_next_peek() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(1_900);
    fixture.recognizer.dismiss();
    fixture.advance(300);
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Idle);
    assert!(!fixture.recognizer.has_committed());

    fixture.recognizer.peek(CONTENT_Y);
    fixture.send(GesturePhase::Ended);
    fixture.advance(300);

    assert_eq!(
        fixture.recognizer.last_dismiss_style(),
        Some(DismissStyle::FadeOut)
    );
    assert!(!fixture.host.is_attached(CONTENT_Y));
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Idle);
}

#[test]
fn second_began_replaces_the_running_cycle() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(1_000);
    fixture.host.supply.set(Some(CONTENT_Y));
    fixture.send(GesturePhase::Began);

    assert!(!fixture.host.is_attached(CONTENT_X));
    assert!(fixture.host.is_attached(CONTENT_Y));
    assert_eq!(fixture.runtime.pending_timer_count(), 1);
    assert_eq!(fixture.recognizer.previewed_content(), Some(CONTENT_Y));

    // The first cycle's timer would have fired at 1.5s.
    fixture.advance(1_000);
    assert!(!fixture.recognizer.has_committed());

    fixture.advance(1_000);
    assert!(fixture.recognizer.has_committed());
    assert_eq!(fixture.recognizer.previewed_content(), Some(CONTENT_Y));
}

#[test]
fn began_over_popped_content_starts_a_clean_cycle() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(1_900);
    fixture.send(GesturePhase::Ended);
    assert!(fixture.recognizer.has_committed());

    fixture.host.supply.set(Some(CONTENT_Y));
    fixture.send(GesturePhase::Began);

    assert!(!fixture.recognizer.has_committed());
    assert!(!fixture.host.is_attached(CONTENT_X));
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Peeking);

    fixture.advance(300);
    fixture.send(GesturePhase::Ended);
    fixture.advance(300);
    assert_eq!(
        fixture.recognizer.last_dismiss_style(),
        Some(DismissStyle::FadeOut)
    );
    assert!(fixture.host.attached.borrow().is_empty());
}

#[test]
fn stale_dismiss_completion_is_ignored() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(600);
    fixture.send(GesturePhase::Ended);
    fixture.advance(50);
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Dismissing);

    fixture.host.supply.set(Some(CONTENT_Y));
    fixture.send(GesturePhase::Began);
    assert!(!fixture.host.is_attached(CONTENT_X));

    fixture.advance(400);
    assert!(fixture.host.is_attached(CONTENT_Y));
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Peeking);
    assert_eq!(fixture.recognizer.previewed_content(), Some(CONTENT_Y));
}

#[test]
fn repeated_dismiss_detaches_once() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);

    fixture.send(GesturePhase::Began);
    fixture.advance(200);
    fixture.recognizer.dismiss();
    fixture.recognizer.dismiss();
    fixture.advance(100);
    fixture.recognizer.dismiss();
    fixture.advance(300);
    fixture.recognizer.dismiss();

    assert_eq!(fixture.host.detach_count.get(), 1);
    assert_eq!(fixture.recognizer.phase(), PeekPopPhase::Idle);
    assert!(!fixture.runtime.has_pending_timers());
}

#[test]
fn fade_in_starts_at_peek_scale() {
    let fixture = Fixture::new(PeekAnimationStyle::FadeIn);

    fixture.send(GesturePhase::Began);
    assert_eq!(
        fixture.host.first_layer(CONTENT_X),
        Some(GraphicsLayer::scaled(PEEK_SCALE_X, PEEK_SCALE_Y).with_alpha(0.0))
    );

    fixture.advance(100);
    let layer = fixture.host.last_layer(CONTENT_X).expect("layer written");
    assert_eq!((layer.scale_x, layer.scale_y), (PEEK_SCALE_X, PEEK_SCALE_Y));
    assert!(layer.alpha > 0.0);

    fixture.advance(400);
    assert_eq!(
        fixture.host.last_layer(CONTENT_X),
        Some(GraphicsLayer::scaled(PEEK_SCALE_X, PEEK_SCALE_Y))
    );
}

#[test]
fn missing_delegate_ignores_presses() {
    let runtime = RuntimeHandle::new();
    let surface = InputSurface::new(HOST_BOUNDS);
    let recognizer = PeekPopGestureRecognizer::new(&runtime, &surface, PeekAnimationStyle::default());

    recognizer.on_gesture_phase_changed(GesturePhase::Began);
    recognizer.peek(CONTENT_X);

    assert_eq!(recognizer.phase(), PeekPopPhase::Idle);
    assert!(!runtime.has_pending_timers());
    assert_eq!(recognizer.animation_style(), PeekAnimationStyle::GrowIn);
}

#[test]
fn dropped_host_ignores_presses() {
    let fixture = Fixture::new(PeekAnimationStyle::GrowIn);
    let Fixture {
        runtime,
        recognizer,
        host,
    } = fixture;
    host.recognizer.replace(None);
    drop(host);

    recognizer.on_gesture_phase_changed(GesturePhase::Began);

    assert_eq!(recognizer.phase(), PeekPopPhase::Idle);
    assert!(!runtime.has_pending_timers());
}

#[test]
fn supplier_without_container_does_not_peek() {
    let runtime = RuntimeHandle::new();
    let surface = InputSurface::new(HOST_BOUNDS);
    let recognizer = PeekPopGestureRecognizer::new(&runtime, &surface, PeekAnimationStyle::GrowIn);
    let host = Rc::new(FakeHost::default());
    host.supply.set(Some(CONTENT_X));
    let supplier: Weak<dyn PreviewContentSupplier> = Rc::downgrade(&host) as Weak<_>;
    recognizer.set_content_supplier(supplier);

    recognizer.on_gesture_phase_changed(GesturePhase::Began);

    assert_eq!(host.supply_requests.get(), 0);
    assert_eq!(host.attach_count.get(), 0);
    assert!(!recognizer.is_timer_active());
}

#[test]
fn capabilities_can_come_from_different_objects() {
    let runtime = RuntimeHandle::new();
    let surface = InputSurface::new(HOST_BOUNDS);
    let recognizer = PeekPopGestureRecognizer::new(&runtime, &surface, PeekAnimationStyle::GrowIn);
    let supplier_host = Rc::new(FakeHost::default());
    supplier_host.supply.set(Some(CONTENT_Y));
    let container_host = Rc::new(FakeHost::default());
    let supplier: Weak<dyn PreviewContentSupplier> = Rc::downgrade(&supplier_host) as Weak<_>;
    let container: Weak<dyn PreviewContainer> = Rc::downgrade(&container_host) as Weak<_>;
    recognizer.set_content_supplier(supplier);
    recognizer.set_container(container);

    recognizer.on_gesture_phase_changed(GesturePhase::Began);

    assert!(container_host.is_attached(CONTENT_Y));
    assert_eq!(supplier_host.attach_count.get(), 0);
}

#[test]
fn recognizer_attaches_a_long_press_to_the_surface() {
    let runtime = RuntimeHandle::new();
    let surface = InputSurface::new(HOST_BOUNDS);
    let recognizer = PeekPopGestureRecognizer::new(&runtime, &surface, PeekAnimationStyle::FadeIn);

    assert_eq!(surface.gesture_count(), 1);
    assert_eq!(
        recognizer.input().minimum_press_duration_millis(),
        crate::gesture_constants::LONG_PRESS_MINIMUM_DURATION_MILLIS
    );
}
