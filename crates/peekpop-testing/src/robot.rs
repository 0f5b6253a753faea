//! Robot testing for peek/pop interactions
//!
//! Drives a real [`PeekPopGestureRecognizer`] end to end: pointer events go
//! through an [`InputSurface`] and its long press, time is virtual.
//!
//! # Example
//!
//! ```
//! use peekpop_foundation::{PeekAnimationStyle, PeekPopPhase};
//! use peekpop_testing::create_headless_robot_test;
//!
//! let robot = create_headless_robot_test(320, 480, PeekAnimationStyle::GrowIn);
//! robot.press();
//! robot.advance_millis(600);
//! assert_eq!(robot.recognizer().phase(), PeekPopPhase::Peeking);
//! robot.release();
//! robot.wait_for_idle();
//! assert_eq!(robot.recognizer().phase(), PeekPopPhase::Idle);
//! ```

use crate::host::TestHost;
use peekpop_core::{RuntimeHandle, NANOS_PER_MILLI};
use peekpop_foundation::{
    InputSurface, PeekAnimationStyle, PeekPopGestureRecognizer, PointerEvent, PointerId,
    PreviewContentSupplier,
};
use peekpop_ui_graphics::{Point, Rect, Size};
use std::cell::Cell;
use std::rc::Rc;

/// Size of the pressable surface, centred in the host.
pub const SURFACE_SIZE: Size = Size::new(120.0, 40.0);

/// Frames allowed for animations to settle in [`PeekPopRobot::wait_for_idle`].
const IDLE_FRAME_LIMIT: usize = 600;

pub struct PeekPopRobot {
    runtime: RuntimeHandle,
    surface: InputSurface,
    recognizer: PeekPopGestureRecognizer,
    host: Rc<TestHost>,
    pointer: Cell<PointerId>,
    cursor: Cell<Point>,
}

/// Host of `width` x `height` with a pressable surface in its centre.
pub fn create_headless_robot_test(width: u32, height: u32, style: PeekAnimationStyle) -> PeekPopRobot {
    PeekPopRobot::new(Size::new(width as f32, height as f32), style)
}

impl PeekPopRobot {
    pub fn new(viewport: Size, style: PeekAnimationStyle) -> Self {
        let runtime = RuntimeHandle::new();
        let host_bounds = Rect::from_size(viewport);
        let centre = host_bounds.center();
        let surface_bounds = Rect::new(
            centre.x - SURFACE_SIZE.width / 2.0,
            centre.y - SURFACE_SIZE.height / 2.0,
            SURFACE_SIZE.width,
            SURFACE_SIZE.height,
        );
        let surface = InputSurface::new(surface_bounds);
        let recognizer = PeekPopGestureRecognizer::new(&runtime, &surface, style);
        let host = Rc::new(TestHost::new(host_bounds));
        host.bind(recognizer.clone());
        recognizer.set_delegate(&host);

        Self {
            runtime,
            surface,
            recognizer,
            host,
            pointer: Cell::new(0),
            cursor: Cell::new(centre),
        }
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    pub fn surface(&self) -> &InputSurface {
        &self.surface
    }

    pub fn recognizer(&self) -> &PeekPopGestureRecognizer {
        &self.recognizer
    }

    pub fn host(&self) -> &Rc<TestHost> {
        &self.host
    }

    pub fn surface_center(&self) -> Point {
        self.surface.bounds().center()
    }

    /// Put a new pointer down in the centre of the surface.
    pub fn press(&self) {
        self.press_at(self.surface_center());
    }

    pub fn press_at(&self, position: Point) {
        let id = self.pointer.get() + 1;
        self.pointer.set(id);
        self.cursor.set(position);
        self.surface.dispatch(PointerEvent::down(id, position));
    }

    pub fn move_to(&self, position: Point) {
        self.cursor.set(position);
        self.surface
            .dispatch(PointerEvent::moved(self.pointer.get(), position));
    }

    pub fn move_by(&self, dx: f32, dy: f32) {
        let cursor = self.cursor.get();
        self.move_to(Point::new(cursor.x + dx, cursor.y + dy));
    }

    pub fn release(&self) {
        self.surface
            .dispatch(PointerEvent::up(self.pointer.get(), self.cursor.get()));
    }

    /// The platform took the touch away.
    pub fn cancel(&self) {
        self.surface
            .dispatch(PointerEvent::cancel(self.pointer.get(), self.cursor.get()));
    }

    /// Press, hold for `millis`, release.
    pub fn long_press(&self, millis: u64) {
        self.press();
        self.advance_millis(millis);
        self.release();
    }

    /// Advance virtual time, firing timers and frames on the way.
    pub fn advance_time(&self, nanos: u64) {
        self.runtime.advance_by(nanos);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.advance_time(millis.saturating_mul(NANOS_PER_MILLI));
    }

    /// Run frames until no animation is pending. Pending timers are left
    /// alone.
    pub fn wait_for_idle(&self) -> bool {
        self.runtime.pump_frames(IDLE_FRAME_LIMIT)
    }

    /// Ask the host to close the previewed content, as its close button
    /// would.
    pub fn request_dismiss(&self) {
        self.host.on_dismiss_requested();
    }
}
