//! One-shot timers and the single-timer slot.

use crate::runtime::{RuntimeHandle, TimerId};
use crate::NANOS_PER_MILLI;

/// Pending one-shot timer. Dropping the registration invalidates it.
pub struct TimerRegistration {
    runtime: RuntimeHandle,
    id: Option<TimerId>,
}

impl TimerRegistration {
    pub fn start(
        runtime: &RuntimeHandle,
        delay_millis: u64,
        callback: impl FnOnce() + 'static,
    ) -> Self {
        let id = runtime.schedule_timer(delay_millis.saturating_mul(NANOS_PER_MILLI), callback);
        Self {
            runtime: runtime.clone(),
            id: Some(id),
        }
    }

    /// True until the timer fires or is cancelled.
    pub fn is_active(&self) -> bool {
        self.id
            .map(|id| self.runtime.is_timer_pending(id))
            .unwrap_or(false)
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

impl Drop for TimerRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

/// Holds at most one pending timer.
///
/// `restart` invalidates the previous timer before arming the next one, so
/// two timers started through the same slot can never both be pending.
#[derive(Default)]
pub struct TimerSlot {
    registration: Option<TimerRegistration>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restart(
        &mut self,
        runtime: &RuntimeHandle,
        delay_millis: u64,
        callback: impl FnOnce() + 'static,
    ) {
        self.invalidate();
        self.registration = Some(TimerRegistration::start(runtime, delay_millis, callback));
    }

    pub fn invalidate(&mut self) {
        if let Some(registration) = self.registration.take() {
            registration.cancel();
        }
    }

    pub fn is_valid(&self) -> bool {
        self.registration
            .as_ref()
            .map(TimerRegistration::is_active)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn restart_replaces_pending_timer() {
        let runtime = RuntimeHandle::new();
        let mut slot = TimerSlot::new();
        let first = Rc::new(Cell::new(false));
        let second = Rc::new(Cell::new(false));

        {
            let first = Rc::clone(&first);
            slot.restart(&runtime, 10, move || first.set(true));
        }
        runtime.advance_by_millis(5);
        {
            let second = Rc::clone(&second);
            slot.restart(&runtime, 10, move || second.set(true));
        }
        runtime.advance_by_millis(8);

        assert!(!first.get());
        assert!(!second.get());
        assert!(slot.is_valid());

        runtime.advance_by_millis(5);
        assert!(second.get());
        assert!(!slot.is_valid());
        assert!(!runtime.has_pending_timers());
    }

    #[test]
    fn invalidate_is_idempotent() {
        let runtime = RuntimeHandle::new();
        let mut slot = TimerSlot::new();
        slot.restart(&runtime, 10, || {});

        slot.invalidate();
        slot.invalidate();

        assert!(!slot.is_valid());
        assert!(!runtime.has_pending_timers());
    }
}
