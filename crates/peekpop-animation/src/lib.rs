//! Frame-driven animations with easing curves and duration-bound springs.

mod animation;

pub use animation::*;
