//! Platform abstraction for wall-clock time.
//!
//! The runtime itself only knows virtual time. Hosts that run against a real
//! clock read it through this trait and advance the runtime to match.

/// Provides timing information for the runtime.
pub trait Clock {
    /// Instant type produced by this clock implementation.
    type Instant: Copy;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of nanoseconds elapsed since `since`.
    fn elapsed_nanos(&self, since: Self::Instant) -> u64;
}
