//! Pure math/data for PeekPop
//!
//! Geometry primitives and the transform/opacity layer applied to previewed
//! content.

mod geometry;
mod layer;

pub use geometry::*;
pub use layer::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::layer::GraphicsLayer;
}
