//! Long-press gesture recogniser.
//!
//! Reports phases of a single sustained press. A press that lifts, cancels or
//! wanders off before the hold completes fails without notifying targets.

use crate::gesture_constants::{LONG_PRESS_ALLOWABLE_MOVEMENT, LONG_PRESS_MINIMUM_DURATION_MILLIS};
use crate::input::types::{PointerEvent, PointerEventKind, PointerId};
use peekpop_core::{RuntimeHandle, TimerSlot};
use peekpop_ui_graphics::Point;
use std::cell::RefCell;
use std::rc::Rc;

/// Phase transitions reported by a continuous gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LongPressState {
    /// No pointer tracked.
    #[default]
    Idle,
    /// Pointer down, waiting for the minimum press duration.
    Holding,
    /// Press recognized; moves report `Changed`.
    Recognized,
}

type PhaseTarget = Box<dyn FnMut(GesturePhase)>;

#[derive(Clone)]
pub struct LongPressGesture {
    inner: Rc<RefCell<LongPressInner>>,
}

struct LongPressInner {
    runtime: RuntimeHandle,
    minimum_press_duration_millis: u64,
    allowable_movement: f32,
    state: LongPressState,
    pointer: Option<PointerId>,
    origin: Point,
    hold_timer: TimerSlot,
    targets: Vec<PhaseTarget>,
}

impl LongPressGesture {
    pub fn new(runtime: &RuntimeHandle) -> Self {
        Self::with_minimum_press_duration(runtime, LONG_PRESS_MINIMUM_DURATION_MILLIS)
    }

    pub fn with_minimum_press_duration(runtime: &RuntimeHandle, millis: u64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(LongPressInner {
                runtime: runtime.clone(),
                minimum_press_duration_millis: millis,
                allowable_movement: LONG_PRESS_ALLOWABLE_MOVEMENT,
                state: LongPressState::Idle,
                pointer: None,
                origin: Point::ZERO,
                hold_timer: TimerSlot::new(),
                targets: Vec::new(),
            })),
        }
    }

    pub fn minimum_press_duration_millis(&self) -> u64 {
        self.inner.borrow().minimum_press_duration_millis
    }

    pub fn set_allowable_movement(&self, distance: f32) {
        self.inner.borrow_mut().allowable_movement = distance.max(0.0);
    }

    pub fn state(&self) -> LongPressState {
        self.inner.borrow().state
    }

    /// Register a callback for reported phases. Targets run in registration
    /// order.
    pub fn add_target(&self, target: impl FnMut(GesturePhase) + 'static) {
        self.inner.borrow_mut().targets.push(Box::new(target));
    }

    pub fn handle_pointer_event(&self, event: &PointerEvent) {
        let (state, tracked) = {
            let inner = self.inner.borrow();
            (inner.state, inner.pointer)
        };

        if event.kind == PointerEventKind::Down {
            if state == LongPressState::Idle {
                self.start_hold(event);
            }
            return;
        }
        if tracked != Some(event.id) {
            return;
        }

        match (state, event.kind) {
            (LongPressState::Holding, PointerEventKind::Move) => {
                let too_far = {
                    let inner = self.inner.borrow();
                    inner.origin.distance_to(event.position) > inner.allowable_movement
                };
                if too_far {
                    self.fail("moved before the hold completed");
                }
            }
            (LongPressState::Holding, PointerEventKind::Up) => {
                self.fail("released before the hold completed")
            }
            (LongPressState::Holding, PointerEventKind::Cancel) => {
                self.fail("cancelled before the hold completed")
            }
            (LongPressState::Recognized, PointerEventKind::Move) => {
                self.emit(GesturePhase::Changed)
            }
            (LongPressState::Recognized, PointerEventKind::Up) => {
                self.reset();
                self.emit(GesturePhase::Ended);
            }
            (LongPressState::Recognized, PointerEventKind::Cancel) => {
                self.reset();
                self.emit(GesturePhase::Cancelled);
            }
            _ => {}
        }
    }

    /// Drop any tracked press without reporting a phase.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.hold_timer.invalidate();
        inner.state = LongPressState::Idle;
        inner.pointer = None;
    }

    fn start_hold(&self, event: &PointerEvent) {
        let weak = Rc::downgrade(&self.inner);
        let mut inner = self.inner.borrow_mut();
        inner.state = LongPressState::Holding;
        inner.pointer = Some(event.id);
        inner.origin = event.position;
        let runtime = inner.runtime.clone();
        let delay = inner.minimum_press_duration_millis;
        inner.hold_timer.restart(&runtime, delay, move || {
            if let Some(inner) = weak.upgrade() {
                LongPressGesture { inner }.on_hold_elapsed();
            }
        });
    }

    fn on_hold_elapsed(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state != LongPressState::Holding {
                return;
            }
            inner.state = LongPressState::Recognized;
        }
        self.emit(GesturePhase::Began);
    }

    fn fail(&self, reason: &str) {
        log::trace!("long press failed: {reason}");
        self.reset();
    }

    fn emit(&self, phase: GesturePhase) {
        let mut targets = std::mem::take(&mut self.inner.borrow_mut().targets);
        for target in targets.iter_mut() {
            target(phase);
        }
        let mut inner = self.inner.borrow_mut();
        // Keep targets registered while emitting, after the existing ones.
        targets.append(&mut inner.targets);
        inner.targets = targets;
    }
}
