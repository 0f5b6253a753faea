use super::host::{ContentId, PeekPopHost, PreviewContainer, PreviewContentSupplier};
use crate::gesture_constants::{LONG_PRESS_MINIMUM_DURATION_MILLIS, POP_DELAY_MILLIS};
use crate::input::gestures::{GesturePhase, LongPressGesture};
use crate::input::InputSurface;
use peekpop_animation::{Animatable, AnimationSpec, Easing, SpringSpec};
use peekpop_core::{Owned, RuntimeHandle, TimerSlot};
use peekpop_ui_graphics::{GraphicsLayer, Rect};
use std::rc::{Rc, Weak};

pub const PEEK_ANIMATION_MILLIS: u64 = 400;
pub const POP_ANIMATION_MILLIS: u64 = 200;
pub const DISMISS_ANIMATION_MILLIS: u64 = 200;

/// Scale of peeking content relative to the container.
pub const PEEK_SCALE_X: f32 = 0.8;
pub const PEEK_SCALE_Y: f32 = 0.6;

/// Opacity committed content fades to while sliding away.
pub const COMMITTED_DISMISS_ALPHA: f32 = 0.4;

fn peek_spring() -> SpringSpec {
    SpringSpec::new(0.8, 1.0)
}

fn pop_spring() -> SpringSpec {
    SpringSpec::new(0.5, 0.6)
}

/// Entry transition of peeking content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PeekAnimationStyle {
    /// Appears at peek scale and fades in.
    FadeIn,
    /// Grows from nothing to peek scale while fading in.
    #[default]
    GrowIn,
}

/// Where the recognizer is within one peek/pop interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeekPopPhase {
    Idle,
    Peeking,
    Popped,
    Dismissing,
}

/// How the last dismissal animated content out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissStyle {
    /// Uncommitted content fades to transparent in place.
    FadeOut,
    /// Committed content slides down by its height, fading to
    /// [`COMMITTED_DISMISS_ALPHA`].
    SlideDown,
}

/// Identity of one peek/pop interaction. Completions carrying a stale id are
/// ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CycleId(u64);

impl CycleId {
    fn next(self) -> Self {
        CycleId(self.0.wrapping_add(1))
    }
}

struct PreviewedContent {
    id: ContentId,
    frame: Rect,
    animation: Animatable<GraphicsLayer>,
}

struct RecognizerState {
    runtime: RuntimeHandle,
    style: PeekAnimationStyle,
    input: LongPressGesture,
    supplier: Option<Weak<dyn PreviewContentSupplier>>,
    container: Option<Weak<dyn PreviewContainer>>,
    pop_timer: TimerSlot,
    previewed: Option<PreviewedContent>,
    has_committed: bool,
    phase: PeekPopPhase,
    cycle: CycleId,
    last_dismiss: Option<DismissStyle>,
}

/// Peek/pop driven by a long press on an [`InputSurface`].
///
/// Cheap to clone; clones share state. Timer and animation callbacks hold
/// weak references, so dropping every clone stops the recognizer.
#[derive(Clone)]
pub struct PeekPopGestureRecognizer {
    state: Owned<RecognizerState>,
}

impl PeekPopGestureRecognizer {
    /// Attach a long press with the standard minimum press duration to
    /// `surface`, animating peeks with `style`.
    pub fn new(runtime: &RuntimeHandle, surface: &InputSurface, style: PeekAnimationStyle) -> Self {
        let input =
            LongPressGesture::with_minimum_press_duration(runtime, LONG_PRESS_MINIMUM_DURATION_MILLIS);
        let recognizer = Self {
            state: Owned::new(RecognizerState {
                runtime: runtime.clone(),
                style,
                input: input.clone(),
                supplier: None,
                container: None,
                pop_timer: TimerSlot::new(),
                previewed: None,
                has_committed: false,
                phase: PeekPopPhase::Idle,
                cycle: CycleId::default(),
                last_dismiss: None,
            }),
        };

        let weak = recognizer.state.downgrade();
        input.add_target(move |phase| {
            if let Some(state) = weak.upgrade() {
                PeekPopGestureRecognizer { state }.on_gesture_phase_changed(phase);
            }
        });
        surface.add_gesture(input);
        recognizer
    }

    /// Use `host` for both content and container. Only a weak reference is
    /// kept.
    pub fn set_delegate<H: PeekPopHost + 'static>(&self, host: &Rc<H>) {
        let host: Weak<H> = Rc::downgrade(host);
        let supplier: Weak<dyn PreviewContentSupplier> = host.clone();
        let container: Weak<dyn PreviewContainer> = host;
        self.state.update(|state| {
            state.supplier = Some(supplier);
            state.container = Some(container);
        });
    }

    pub fn set_content_supplier(&self, supplier: Weak<dyn PreviewContentSupplier>) {
        self.state.update(|state| state.supplier = Some(supplier));
    }

    pub fn set_container(&self, container: Weak<dyn PreviewContainer>) {
        self.state.update(|state| state.container = Some(container));
    }

    pub fn animation_style(&self) -> PeekAnimationStyle {
        self.state.with(|state| state.style)
    }

    pub fn phase(&self) -> PeekPopPhase {
        self.state.with(|state| state.phase)
    }

    pub fn has_committed(&self) -> bool {
        self.state.with(|state| state.has_committed)
    }

    pub fn previewed_content(&self) -> Option<ContentId> {
        self.state
            .with(|state| state.previewed.as_ref().map(|previewed| previewed.id))
    }

    /// Whether the pop timer is pending.
    pub fn is_timer_active(&self) -> bool {
        self.state.with(|state| state.pop_timer.is_valid())
    }

    pub fn cycle(&self) -> CycleId {
        self.state.with(|state| state.cycle)
    }

    pub fn last_dismiss_style(&self) -> Option<DismissStyle> {
        self.state.with(|state| state.last_dismiss)
    }

    pub fn input(&self) -> LongPressGesture {
        self.state.with(|state| state.input.clone())
    }

    /// Entry point for the input source.
    pub fn on_gesture_phase_changed(&self, phase: GesturePhase) {
        log::trace!("gesture phase {phase:?} in {:?}", self.phase());
        match phase {
            GesturePhase::Began => self.begin_cycle(),
            GesturePhase::Ended | GesturePhase::Cancelled => {
                self.invalidate_timer();
                if !self.has_committed() {
                    self.dismiss();
                }
            }
            GesturePhase::Failed => {
                self.invalidate_timer();
                self.dismiss();
            }
            GesturePhase::Changed => {}
        }
    }

    /// Attach `content` to the container and animate it in.
    ///
    /// Any content already previewed is torn down first. No-op without a
    /// container.
    pub fn peek(&self, content: ContentId) {
        let Some(container) = self.container() else {
            log::trace!("peek of {content:?} ignored: no container");
            return;
        };
        if self.state.with(|state| state.previewed.is_some()) {
            self.abandon_cycle();
        }

        let frame = container.bounds();
        let (style, runtime) = self.state.with(|state| (state.style, state.runtime.clone()));
        let peek_layer = GraphicsLayer::scaled(PEEK_SCALE_X, PEEK_SCALE_Y);
        let initial = match style {
            PeekAnimationStyle::GrowIn => GraphicsLayer::scaled(0.0, 0.0).with_alpha(0.0),
            PeekAnimationStyle::FadeIn => peek_layer.with_alpha(0.0),
        };

        container.attach_child(content, frame);
        container.set_child_layer(content, initial);

        let animation = Animatable::new(initial, runtime);
        let cycle = self.state.update(|state| {
            state.cycle = state.cycle.next();
            state.phase = PeekPopPhase::Peeking;
            state.previewed = Some(PreviewedContent {
                id: content,
                frame,
                animation: animation.clone(),
            });
            state.cycle
        });
        log::debug!("peeking {content:?} ({style:?}) in {cycle:?}");

        animation.animate_to(
            peek_layer,
            AnimationSpec::spring(PEEK_ANIMATION_MILLIS, peek_spring()),
            self.layer_writer(content),
            |_| {},
        );
    }

    /// Animate the previewed content out, then detach it.
    ///
    /// Also invalidates the pop timer. No-op without previewed content or
    /// while a dismissal is already running.
    pub fn dismiss(&self) {
        let started = self.state.update(|state| {
            state.pop_timer.invalidate();
            if state.phase == PeekPopPhase::Dismissing {
                return None;
            }
            let (content, frame, animation) = state
                .previewed
                .as_ref()
                .map(|previewed| (previewed.id, previewed.frame, previewed.animation.clone()))?;
            let style = if state.has_committed {
                DismissStyle::SlideDown
            } else {
                DismissStyle::FadeOut
            };
            state.phase = PeekPopPhase::Dismissing;
            state.last_dismiss = Some(style);
            Some((content, frame, animation, style, state.cycle))
        });
        let Some((content, frame, animation, style, cycle)) = started else {
            return;
        };

        let target = match style {
            DismissStyle::SlideDown => {
                GraphicsLayer::translated(0.0, frame.height).with_alpha(COMMITTED_DISMISS_ALPHA)
            }
            DismissStyle::FadeOut => animation.target().with_alpha(0.0),
        };
        log::debug!("dismissing {content:?} ({style:?}) in {cycle:?}");

        let weak = self.state.downgrade();
        animation.animate_to(
            target,
            AnimationSpec::tween(DISMISS_ANIMATION_MILLIS, Easing::EaseInOut),
            self.layer_writer(content),
            move |_| {
                if let Some(state) = weak.upgrade() {
                    PeekPopGestureRecognizer { state }.finish_dismiss(cycle);
                }
            },
        );
    }

    fn begin_cycle(&self) {
        if self.container().is_none() {
            log::trace!("press ignored: no container");
            return;
        }
        let Some(supplier) = self.supplier() else {
            log::trace!("press ignored: no content supplier");
            return;
        };
        let Some(content) = supplier.supply_preview_content() else {
            log::trace!("press ignored: host supplied no content");
            return;
        };

        self.abandon_cycle();
        self.state.update(|state| {
            state.pop_timer.invalidate();
            state.has_committed = false;
        });
        self.peek(content);

        let weak = self.state.downgrade();
        self.state.update(|state| {
            let runtime = state.runtime.clone();
            state.pop_timer.restart(&runtime, POP_DELAY_MILLIS, move || {
                if let Some(state) = weak.upgrade() {
                    PeekPopGestureRecognizer { state }.pop();
                }
            });
        });
    }

    /// Commit to the previewed content and spring it to full size.
    ///
    /// The commit happens when the pop timer fires, so a release during the
    /// spring still dismisses committed content.
    fn pop(&self) {
        let peeking = self.state.update(|state| {
            if state.phase != PeekPopPhase::Peeking {
                return None;
            }
            let (content, animation) = state
                .previewed
                .as_ref()
                .map(|previewed| (previewed.id, previewed.animation.clone()))?;
            state.has_committed = true;
            state.phase = PeekPopPhase::Popped;
            Some((content, animation, state.cycle))
        });
        let Some((content, animation, cycle)) = peeking else {
            log::trace!("pop ignored: nothing peeking");
            return;
        };
        log::debug!("popping {content:?}, committed {cycle:?}");

        let target = animation.target().with_identity_transform();
        animation.animate_to(
            target,
            AnimationSpec::spring(POP_ANIMATION_MILLIS, pop_spring()),
            self.layer_writer(content),
            move |finished| {
                if !finished {
                    log::trace!("pop spring of {cycle:?} interrupted");
                }
            },
        );
    }

    fn finish_dismiss(&self, cycle: CycleId) {
        let content = self.state.with(|state| {
            if state.cycle != cycle || state.phase != PeekPopPhase::Dismissing {
                return None;
            }
            state.previewed.as_ref().map(|previewed| previewed.id)
        });
        let Some(content) = content else {
            log::trace!("stale dismissal of {cycle:?} ignored");
            return;
        };

        if let Some(container) = self.container() {
            container.detach_child(content);
        }
        let previewed = self.state.update(|state| {
            state.phase = PeekPopPhase::Idle;
            state.has_committed = false;
            state.previewed.take()
        });
        drop(previewed);
        log::debug!("dismissed {content:?} in {cycle:?}");
    }

    /// Cancel the pop timer and the in-flight animation and detach whatever
    /// is previewed, leaving the recognizer idle.
    fn abandon_cycle(&self) {
        let previous = self.state.update(|state| {
            state.pop_timer.invalidate();
            state.cycle = state.cycle.next();
            state.phase = PeekPopPhase::Idle;
            state.has_committed = false;
            state.previewed.take()
        });
        let Some(previous) = previous else {
            return;
        };
        log::debug!("abandoning preview of {:?}", previous.id);
        previous.animation.cancel();
        if let Some(container) = self.container() {
            container.detach_child(previous.id);
        }
    }

    fn invalidate_timer(&self) {
        self.state.update(|state| state.pop_timer.invalidate());
    }

    fn supplier(&self) -> Option<Rc<dyn PreviewContentSupplier>> {
        self.state
            .with(|state| state.supplier.as_ref().and_then(Weak::upgrade))
    }

    fn container(&self) -> Option<Rc<dyn PreviewContainer>> {
        self.state
            .with(|state| state.container.as_ref().and_then(Weak::upgrade))
    }

    fn layer_writer(&self, content: ContentId) -> impl FnMut(&GraphicsLayer) + 'static {
        let container = self.state.with(|state| state.container.clone());
        move |layer| {
            if let Some(container) = container.as_ref().and_then(Weak::upgrade) {
                container.set_child_layer(content, *layer);
            }
        }
    }
}
