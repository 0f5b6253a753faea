pub mod dispatcher;
pub mod gestures;
pub mod surface;
pub mod types;

pub use dispatcher::PointerDispatcher;
pub use surface::InputSurface;
pub use types::{PointerEvent, PointerEventKind, PointerId};

pub mod prelude {
    pub use super::gestures::{GesturePhase, LongPressGesture};
    pub use super::surface::InputSurface;
    pub use super::types::{PointerEvent, PointerEventKind, PointerId};
}
