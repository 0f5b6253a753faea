//! Shared gesture timing and movement thresholds.
//!
//! Distances are in logical pixels, durations in milliseconds.

/// How long a pointer must stay down before a long press is recognized.
pub const LONG_PRESS_MINIMUM_DURATION_MILLIS: u64 = 500;

/// Maximum travel from the press position before the hold completes. Moving
/// farther fails the press.
pub const LONG_PRESS_ALLOWABLE_MOVEMENT: f32 = 10.0;

/// Time between a recognized long press (peek) and the commit (pop).
pub const POP_DELAY_MILLIS: u64 = 1_500;
