//! Core runtime for PeekPop
//!
//! Everything here runs on one logical UI thread. The runtime owns a virtual
//! clock, one-shot frame callbacks and one-shot timers; gesture and animation
//! code schedules work against it and hosts advance it.

mod frame_clock;
mod owned;
pub mod platform;
mod runtime;
mod timer;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use owned::{Owned, WeakOwned};
pub use platform::Clock;
pub use runtime::{FrameCallbackId, RuntimeHandle, TimerId, FRAME_INTERVAL_NANOS};
pub use timer::{TimerRegistration, TimerSlot};

pub const NANOS_PER_MILLI: u64 = 1_000_000;
