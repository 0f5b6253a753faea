use crate::frame_clock::FrameClock;
use crate::NANOS_PER_MILLI;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

pub type FrameCallbackId = u64;
pub type TimerId = u64;

/// Frame interval used when virtual time is advanced (~60 FPS).
pub const FRAME_INTERVAL_NANOS: u64 = 16_666_667;

type FrameCallback = Box<dyn FnOnce(u64)>;
type TimerCallback = Box<dyn FnOnce()>;

struct PendingTimer {
    due_nanos: u64,
    callback: TimerCallback,
}

#[derive(Default)]
struct RuntimeState {
    now_nanos: u64,
    next_id: u64,
    frame_callbacks: Vec<(FrameCallbackId, FrameCallback)>,
    timers: FxHashMap<TimerId, PendingTimer>,
}

impl RuntimeState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn take_frame_callback(&mut self, id: FrameCallbackId) -> Option<FrameCallback> {
        let index = self
            .frame_callbacks
            .iter()
            .position(|(candidate, _)| *candidate == id)?;
        Some(self.frame_callbacks.remove(index).1)
    }

    /// Earliest timer due at or before `deadline`, ties broken by id so
    /// timers scheduled first fire first.
    fn take_due_timer(&mut self, deadline: u64) -> Option<(u64, TimerCallback)> {
        let id = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due_nanos <= deadline)
            .min_by_key(|(id, timer)| (timer.due_nanos, **id))
            .map(|(id, _)| *id)?;
        self.timers
            .remove(&id)
            .map(|timer| (timer.due_nanos, timer.callback))
    }
}

/// Shared handle to the single-threaded runtime.
///
/// Callbacks are always invoked with the runtime borrow released, so they are
/// free to schedule or cancel further work.
#[derive(Clone, Default)]
pub struct RuntimeHandle {
    inner: Rc<RefCell<RuntimeState>>,
}

impl RuntimeHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub fn now_nanos(&self) -> u64 {
        self.inner.borrow().now_nanos
    }

    pub fn now_millis(&self) -> u64 {
        self.now_nanos() / NANOS_PER_MILLI
    }

    pub fn register_frame_callback(&self, callback: impl FnOnce(u64) + 'static) -> FrameCallbackId {
        let mut state = self.inner.borrow_mut();
        let id = state.allocate_id();
        state.frame_callbacks.push((id, Box::new(callback)));
        id
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let removed = self.inner.borrow_mut().take_frame_callback(id);
        // Dropped outside the borrow: the callback may own registrations.
        drop(removed);
    }

    pub fn has_frame_callbacks(&self) -> bool {
        !self.inner.borrow().frame_callbacks.is_empty()
    }

    /// Run every frame callback registered before this call.
    ///
    /// Callbacks registered while draining wait for the next frame, and a
    /// callback cancelled by an earlier one in the same batch does not run.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let ids: SmallVec<[FrameCallbackId; 8]> = {
            let mut state = self.inner.borrow_mut();
            state.now_nanos = state.now_nanos.max(frame_time_nanos);
            state.frame_callbacks.iter().map(|(id, _)| *id).collect()
        };
        for id in ids {
            let callback = self.inner.borrow_mut().take_frame_callback(id);
            if let Some(callback) = callback {
                callback(frame_time_nanos);
            }
        }
    }

    pub fn schedule_timer(&self, delay_nanos: u64, callback: impl FnOnce() + 'static) -> TimerId {
        let mut state = self.inner.borrow_mut();
        let id = state.allocate_id();
        let due_nanos = state.now_nanos.saturating_add(delay_nanos);
        state.timers.insert(
            id,
            PendingTimer {
                due_nanos,
                callback: Box::new(callback),
            },
        );
        log::trace!("timer {id} scheduled for {due_nanos}ns");
        id
    }

    /// Returns whether the timer was still pending.
    pub fn cancel_timer(&self, id: TimerId) -> bool {
        let removed = self.inner.borrow_mut().timers.remove(&id);
        if removed.is_none() {
            log::trace!("timer {id} already fired or cancelled");
        }
        removed.is_some()
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.inner.borrow().timers.contains_key(&id)
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.inner.borrow().timers.is_empty()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    pub fn next_timer_due_nanos(&self) -> Option<u64> {
        self.inner
            .borrow()
            .timers
            .values()
            .map(|timer| timer.due_nanos)
            .min()
    }

    fn fire_due_timers(&self, deadline: u64) {
        loop {
            let due = self.inner.borrow_mut().take_due_timer(deadline);
            let Some((due_nanos, callback)) = due else {
                break;
            };
            {
                let mut state = self.inner.borrow_mut();
                state.now_nanos = state.now_nanos.max(due_nanos);
            }
            log::trace!("firing timer due at {due_nanos}ns");
            callback();
        }
    }

    /// Produce a single frame at `frame_time_nanos`: due timers fire first,
    /// then pending frame callbacks run.
    pub fn run_frame(&self, frame_time_nanos: u64) {
        self.fire_due_timers(frame_time_nanos);
        self.drain_frame_callbacks(frame_time_nanos);
    }

    /// Advance virtual time to `target_nanos` in frame-sized steps.
    pub fn advance_to(&self, target_nanos: u64) {
        loop {
            let now = self.now_nanos();
            if now >= target_nanos {
                break;
            }
            let step_end = now.saturating_add(FRAME_INTERVAL_NANOS).min(target_nanos);
            self.run_frame(step_end);
        }
    }

    pub fn advance_by(&self, nanos: u64) {
        let target = self.now_nanos().saturating_add(nanos);
        self.advance_to(target);
    }

    pub fn advance_by_millis(&self, millis: u64) {
        self.advance_by(millis.saturating_mul(NANOS_PER_MILLI));
    }

    /// Keep producing frames until no frame callbacks remain or
    /// `max_frames` have run. Pending timers are not waited for.
    pub fn pump_frames(&self, max_frames: usize) -> bool {
        for _ in 0..max_frames {
            if !self.has_frame_callbacks() {
                return true;
            }
            let next = self.now_nanos().saturating_add(FRAME_INTERVAL_NANOS);
            self.run_frame(next);
        }
        !self.has_frame_callbacks()
    }
}
