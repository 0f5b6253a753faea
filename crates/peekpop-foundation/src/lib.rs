//! Input handling and the peek/pop recognizer for PeekPop
//!
//! A long press on an [`InputSurface`] previews ("peeks") content supplied by
//! the host, commits to it ("pops") when the press is held, and dismisses it
//! otherwise.

pub mod gesture_constants;
pub mod input;
pub mod peek_pop;

pub use input::gestures::{GesturePhase, LongPressGesture, LongPressState};
pub use input::{InputSurface, PointerDispatcher, PointerEvent, PointerEventKind, PointerId};
pub use peek_pop::{
    ContentId, CycleId, DismissStyle, PeekAnimationStyle, PeekPopGestureRecognizer, PeekPopHost,
    PeekPopPhase, PreviewContainer, PreviewContentSupplier,
};

pub mod prelude {
    pub use crate::input::prelude::*;
    pub use crate::peek_pop::{
        ContentId, PeekAnimationStyle, PeekPopGestureRecognizer, PeekPopHost, PeekPopPhase,
        PreviewContainer, PreviewContentSupplier,
    };
}
