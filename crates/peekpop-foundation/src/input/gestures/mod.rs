pub mod long_press;

pub use long_press::{GesturePhase, LongPressGesture, LongPressState};
