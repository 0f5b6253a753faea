//! Interactive surface that owns gesture input sources.

use super::dispatcher::PointerDispatcher;
use super::gestures::LongPressGesture;
use super::types::{PointerEvent, PointerEventKind, PointerId};
use peekpop_ui_graphics::Rect;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// A rectangle that accepts pointer input.
///
/// A pointer down inside the bounds captures that pointer; all of its later
/// events reach the attached gestures wherever they land, until it goes up or
/// is cancelled. Only one pointer is captured at a time.
#[derive(Clone)]
pub struct InputSurface {
    inner: Rc<RefCell<SurfaceInner>>,
}

struct SurfaceInner {
    bounds: Rect,
    dispatcher: PointerDispatcher,
    gestures: Vec<LongPressGesture>,
    captured: Option<PointerId>,
    flushing: bool,
}

impl InputSurface {
    pub fn new(bounds: Rect) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SurfaceInner {
                bounds,
                dispatcher: PointerDispatcher::new(),
                gestures: Vec::new(),
                captured: None,
                flushing: false,
            })),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.inner.borrow().bounds
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.inner.borrow_mut().bounds = bounds;
    }

    pub fn add_gesture(&self, gesture: LongPressGesture) {
        self.inner.borrow_mut().gestures.push(gesture);
    }

    pub fn gesture_count(&self) -> usize {
        self.inner.borrow().gestures.len()
    }

    pub fn captured_pointer(&self) -> Option<PointerId> {
        self.inner.borrow().captured
    }

    /// Queue an event without delivering it.
    pub fn enqueue(&self, event: PointerEvent) {
        self.inner.borrow_mut().dispatcher.push(event);
    }

    /// Queue an event and deliver everything pending.
    pub fn dispatch(&self, event: PointerEvent) {
        self.enqueue(event);
        self.flush();
    }

    /// Deliver queued events in order. Events queued by gesture targets
    /// during delivery are delivered in the same flush.
    pub fn flush(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.flushing {
                return;
            }
            inner.flushing = true;
        }
        loop {
            let mut batch: SmallVec<[PointerEvent; 4]> = SmallVec::new();
            self.inner
                .borrow_mut()
                .dispatcher
                .drain(|_, event| batch.push(event));
            if batch.is_empty() {
                break;
            }
            for event in batch {
                self.route(event);
            }
        }
        self.inner.borrow_mut().flushing = false;
    }

    fn route(&self, event: PointerEvent) {
        let gestures = {
            let mut inner = self.inner.borrow_mut();
            match (event.kind, inner.captured) {
                (PointerEventKind::Down, None) => {
                    if !inner.bounds.contains_point(event.position) {
                        log::trace!("pointer {} down outside surface", event.id);
                        return;
                    }
                    inner.captured = Some(event.id);
                }
                (_, Some(captured)) if captured == event.id => {
                    if event.is_terminal() {
                        inner.captured = None;
                    }
                }
                _ => {
                    log::trace!("ignoring {:?} for pointer {}", event.kind, event.id);
                    return;
                }
            }
            inner.gestures.clone()
        };
        for gesture in gestures {
            gesture.handle_pointer_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::gestures::GesturePhase;
    use peekpop_core::RuntimeHandle;
    use peekpop_ui_graphics::Point;

    fn surface_with_gesture() -> (RuntimeHandle, InputSurface, Rc<RefCell<Vec<GesturePhase>>>) {
        let runtime = RuntimeHandle::new();
        let surface = InputSurface::new(Rect::new(0.0, 0.0, 100.0, 40.0));
        let gesture = LongPressGesture::new(&runtime);
        let phases = Rc::new(RefCell::new(Vec::new()));
        {
            let phases = Rc::clone(&phases);
            gesture.add_target(move |phase| phases.borrow_mut().push(phase));
        }
        surface.add_gesture(gesture);
        (runtime, surface, phases)
    }

    #[test]
    fn down_outside_bounds_is_ignored() {
        let (runtime, surface, phases) = surface_with_gesture();

        surface.dispatch(PointerEvent::down(1, Point::new(150.0, 10.0)));
        runtime.advance_by_millis(600);

        assert!(surface.captured_pointer().is_none());
        assert!(phases.borrow().is_empty());
    }

    #[test]
    fn captured_pointer_keeps_receiving_events_outside_bounds() {
        let (runtime, surface, phases) = surface_with_gesture();

        surface.dispatch(PointerEvent::down(1, Point::new(50.0, 20.0)));
        runtime.advance_by_millis(600);
        surface.dispatch(PointerEvent::moved(1, Point::new(500.0, 20.0)));
        surface.dispatch(PointerEvent::up(1, Point::new(500.0, 20.0)));

        assert_eq!(
            phases.borrow().as_slice(),
            &[GesturePhase::Began, GesturePhase::Changed, GesturePhase::Ended]
        );
        assert!(surface.captured_pointer().is_none());
    }

    #[test]
    fn second_pointer_is_ignored_while_one_is_captured() {
        let (runtime, surface, phases) = surface_with_gesture();

        surface.dispatch(PointerEvent::down(1, Point::new(50.0, 20.0)));
        surface.dispatch(PointerEvent::down(2, Point::new(60.0, 20.0)));
        surface.dispatch(PointerEvent::up(2, Point::new(60.0, 20.0)));
        runtime.advance_by_millis(600);

        assert_eq!(surface.captured_pointer(), Some(1));
        assert_eq!(phases.borrow().as_slice(), &[GesturePhase::Began]);
    }

    #[test]
    fn queued_events_are_delivered_in_order_on_flush() {
        let (runtime, surface, phases) = surface_with_gesture();

        surface.dispatch(PointerEvent::down(1, Point::new(50.0, 20.0)));
        runtime.advance_by_millis(600);
        surface.enqueue(PointerEvent::moved(1, Point::new(52.0, 20.0)));
        surface.enqueue(PointerEvent::cancel(1, Point::new(52.0, 20.0)));
        assert_eq!(phases.borrow().len(), 1);

        surface.flush();

        assert_eq!(
            phases.borrow().as_slice(),
            &[
                GesturePhase::Began,
                GesturePhase::Changed,
                GesturePhase::Cancelled
            ]
        );
    }
}
