//! Peek and pop on a plain long press.
//!
//! [`PeekPopGestureRecognizer`] turns the phases of one long press into three
//! transitions against a host: peek (preview the supplied content), pop
//! (commit to it once the press is held long enough) and dismiss (tear the
//! preview down).

mod host;
mod recognizer;

pub use host::{ContentId, PeekPopHost, PreviewContainer, PreviewContentSupplier};
pub use recognizer::{
    CycleId, DismissStyle, PeekAnimationStyle, PeekPopGestureRecognizer, PeekPopPhase,
    COMMITTED_DISMISS_ALPHA, DISMISS_ANIMATION_MILLIS, PEEK_ANIMATION_MILLIS, PEEK_SCALE_X,
    PEEK_SCALE_Y, POP_ANIMATION_MILLIS,
};

#[cfg(test)]
#[path = "tests/recognizer_tests.rs"]
mod tests;
