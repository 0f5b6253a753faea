//! Animation system for PeekPop
//!
//! An animation takes a duration, a timing curve (easing or spring), an
//! update callback that receives every intermediate value and a completion
//! callback. Values advance on frame callbacks of the shared runtime.

use std::cell::RefCell;
use std::rc::Rc;

use peekpop_core::{FrameCallbackRegistration, RuntimeHandle, NANOS_PER_MILLI};
use peekpop_ui_graphics::GraphicsLayer;

/// Trait for types that can be linearly interpolated.
///
/// `fraction` may leave `[0, 1]` while a spring overshoots.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

impl Lerp for GraphicsLayer {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        GraphicsLayer {
            // Opacity cannot overshoot.
            alpha: <f32 as Lerp>::lerp(&self.alpha, &target.alpha, fraction).clamp(0.0, 1.0),
            scale_x: <f32 as Lerp>::lerp(&self.scale_x, &target.scale_x, fraction),
            scale_y: <f32 as Lerp>::lerp(&self.scale_y, &target.scale_y, fraction),
            translation_x: <f32 as Lerp>::lerp(&self.translation_x, &target.translation_x, fraction),
            translation_y: <f32 as Lerp>::lerp(&self.translation_y, &target.translation_y, fraction),
        }
    }
}

/// Timing curves for tweens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction.clamp(0.0, 1.0),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve approximation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric `t` matching the x fraction, clamped
    // to [0, 1].
    let mut t = fraction;
    let mut newton_success = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            newton_success = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !newton_success {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let x = sample_curve(ax, bx, cx, t);
            let delta = x - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Residual displacement a spring is allowed when its duration runs out.
const SPRING_SETTLE_THRESHOLD: f32 = 0.001;

/// Damped spring stretched over the animation's duration.
///
/// The natural frequency is derived from the damping ratio so the oscillation
/// decays below [`SPRING_SETTLE_THRESHOLD`] by the end of the duration.
/// `initial_velocity` is expressed in total distances per duration, so `1.0`
/// means the value starts moving as fast as a linear tween would.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 = under-damped (bouncy).
    pub damping_ratio: f32,
    pub initial_velocity: f32,
}

impl SpringSpec {
    pub fn new(damping_ratio: f32, initial_velocity: f32) -> Self {
        Self {
            damping_ratio: damping_ratio.max(0.05),
            initial_velocity,
        }
    }

    fn natural_frequency(&self) -> f32 {
        let zeta = self.damping_ratio.min(1.0);
        -SPRING_SETTLE_THRESHOLD.ln() / zeta
    }

    /// Position of the spring at `fraction` of its duration. Starts at 0,
    /// ends exactly at 1, and may exceed 1 in between when under-damped.
    pub fn transform(&self, fraction: f32) -> f32 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }

        let omega = self.natural_frequency();
        let velocity = self.initial_velocity;
        let t = fraction;

        // Displacement from the target starts at -1 with the given velocity.
        let displacement = if self.damping_ratio < 1.0 {
            let zeta = self.damping_ratio;
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega * t).exp();
            let sine_coefficient = (velocity - zeta * omega) / damped;
            envelope * (-(damped * t).cos() + sine_coefficient * (damped * t).sin())
        } else {
            // Over-damped springs are approximated as critically damped.
            let envelope = (-omega * t).exp();
            envelope * (-1.0 + (velocity - omega) * t)
        };

        1.0 + displacement
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

/// Timing curve of an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationCurve {
    Tween(Easing),
    Spring(SpringSpec),
}

impl AnimationCurve {
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            AnimationCurve::Tween(easing) => easing.transform(fraction),
            AnimationCurve::Spring(spring) => spring.transform(fraction),
        }
    }
}

/// Animation specification combining duration, delay and timing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Delay before starting animation in milliseconds.
    pub delay_millis: u64,
    pub curve: AnimationCurve,
}

impl AnimationSpec {
    /// Create a tween animation with duration and easing.
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            delay_millis: 0,
            curve: AnimationCurve::Tween(easing),
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }

    pub fn spring(duration_millis: u64, spring: SpringSpec) -> Self {
        Self {
            duration_millis,
            delay_millis: 0,
            curve: AnimationCurve::Spring(spring),
        }
    }

    /// Add a delay before the animation starts.
    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::EaseInOut)
    }
}

type UpdateCallback<T> = Box<dyn FnMut(&T)>;
type CompletionCallback = Box<dyn FnOnce(bool)>;

/// Animatable value holder.
///
/// Starting a new animation supersedes the running one; the superseded
/// completion is reported with `finished == false`.
pub struct Animatable<T: Lerp + Clone + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: Lerp + Clone + 'static> {
    runtime: RuntimeHandle,
    current: T,
    start: T,
    target: T,
    spec: AnimationSpec,
    /// Bumped whenever the running animation is replaced or cancelled.
    generation: u64,
    start_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    on_update: Option<UpdateCallback<T>>,
    on_complete: Option<CompletionCallback>,
}

impl<T: Lerp + Clone + 'static> Animatable<T> {
    pub fn new(initial: T, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            runtime,
            current: initial.clone(),
            start: initial.clone(),
            target: initial,
            spec: AnimationSpec::default(),
            generation: 0,
            start_time_nanos: None,
            registration: None,
            on_update: None,
            on_complete: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Animate from the current value to `target`.
    ///
    /// `on_update` runs once per frame with the new value; `on_complete` runs
    /// once, with `true` if the target was reached.
    pub fn animate_to(
        &self,
        target: T,
        spec: AnimationSpec,
        on_update: impl FnMut(&T) + 'static,
        on_complete: impl FnOnce(bool) + 'static,
    ) {
        let (registration, superseded) = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.start = inner.current.clone();
            inner.target = target;
            inner.spec = spec;
            inner.start_time_nanos = None;
            inner.on_update = Some(Box::new(on_update));
            let superseded = inner.on_complete.replace(Box::new(on_complete));
            (inner.registration.take(), superseded)
        };

        if let Some(registration) = registration {
            registration.cancel();
        }
        if let Some(superseded) = superseded {
            superseded(false);
        }
        Self::schedule_frame(&self.inner);
    }

    /// Stop where the value currently is. The pending completion reports
    /// `false`.
    pub fn cancel(&self) {
        let (registration, completion) = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.start = inner.current.clone();
            inner.target = inner.current.clone();
            inner.start_time_nanos = None;
            inner.on_update = None;
            (inner.registration.take(), inner.on_complete.take())
        };
        if let Some(registration) = registration {
            registration.cancel();
        }
        if let Some(completion) = completion {
            completion(false);
        }
    }

    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    /// Return the current animation target.
    pub fn target(&self) -> T {
        self.inner.borrow().target.clone()
    }

    /// Return the spec of the most recent animation.
    pub fn spec(&self) -> AnimationSpec {
        self.inner.borrow().spec
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().registration.is_some()
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let runtime = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            inner.runtime.clone()
        };
        let weak = Rc::downgrade(this);
        let registration = runtime.frame_clock().with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_nanos: u64) {
        let (value, finished, generation, mut on_update) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;

            let spec = inner.spec;
            let start_time = *inner.start_time_nanos.get_or_insert(frame_time_nanos);
            let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
            let delay_nanos = spec.delay_millis * NANOS_PER_MILLI;

            if elapsed_nanos < delay_nanos {
                drop(inner);
                Self::schedule_frame(this);
                return;
            }

            let duration_nanos = (spec.duration_millis * NANOS_PER_MILLI).max(1);
            let linear_progress =
                ((elapsed_nanos - delay_nanos) as f32 / duration_nanos as f32).clamp(0.0, 1.0);
            let finished = linear_progress >= 1.0;
            let value = if finished {
                inner.target.clone()
            } else {
                let progress = spec.curve.transform(linear_progress);
                inner.start.lerp(&inner.target, progress)
            };
            inner.current = value.clone();
            if finished {
                inner.start = inner.target.clone();
                inner.start_time_nanos = None;
            }
            (value, finished, inner.generation, inner.on_update.take())
        };

        if let Some(update) = on_update.as_mut() {
            update(&value);
        }

        let completion = {
            let mut inner = this.borrow_mut();
            if inner.generation != generation {
                // The update callback started or cancelled an animation.
                return;
            }
            if finished {
                inner.on_complete.take()
            } else {
                inner.on_update = on_update;
                None
            }
        };

        if finished {
            log::trace!("animation finished after {frame_time_nanos}ns frame");
            if let Some(completion) = completion {
                completion(true);
            }
        } else {
            Self::schedule_frame(this);
        }
    }
}

impl<T: Lerp + Clone + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
