mod demo_host;

use anyhow::{bail, Result};
use demo_host::{DemoHost, LABEL_TEXT};
use peekpop_core::{Clock, RuntimeHandle, NANOS_PER_MILLI};
use peekpop_foundation::{
    InputSurface, PeekAnimationStyle, PeekPopGestureRecognizer, PointerEvent,
};
use peekpop_ui_graphics::{Point, Rect, Size};
use std::rc::Rc;
use std::time::Duration;

/// Wall-clock time for driving the virtual runtime.
#[derive(Debug, Default, Clone, Copy)]
struct InstantClock;

impl Clock for InstantClock {
    type Instant = instant::Instant;

    fn now(&self) -> Self::Instant {
        instant::Instant::now()
    }

    fn elapsed_nanos(&self, since: Self::Instant) -> u64 {
        since.elapsed().as_nanos() as u64
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Press,
    Release,
    TapClose,
}

/// Scripted user interaction, in milliseconds from start.
const SCRIPT: &[(u64, Step)] = &[
    // Hold through the pop, then close the card.
    (0, Step::Press),
    (2_600, Step::Release),
    (3_200, Step::TapClose),
    // Too short to peek.
    (4_000, Step::Press),
    (4_200, Step::Release),
    // Peek, then let go before the pop.
    (5_000, Step::Press),
    (5_800, Step::Release),
];

const WINDOW: Size = Size::new(800.0, 600.0);
const LABEL_SIZE: Size = Size::new(160.0, 40.0);
const SETTLE_MILLIS: u64 = 600;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== PeekPop Desktop Example ===");
    println!("Scripted long presses on \"{LABEL_TEXT}\":");
    println!("  - hold past the pop delay, then close the card");
    println!("  - a short tap that never peeks");
    println!("  - a peek released before it pops");
    println!();

    let runtime = RuntimeHandle::new();
    let window = Rect::from_size(WINDOW);
    let centre = window.center();
    let label = Rect::new(
        centre.x - LABEL_SIZE.width / 2.0,
        centre.y - LABEL_SIZE.height / 2.0,
        LABEL_SIZE.width,
        LABEL_SIZE.height,
    );

    let surface = InputSurface::new(label);
    let recognizer = PeekPopGestureRecognizer::new(&runtime, &surface, PeekAnimationStyle::GrowIn);
    let host = Rc::new(DemoHost::new(window));
    host.bind(recognizer.clone());
    recognizer.set_delegate(&host);

    run_script(&runtime, &surface, &host, label.center())?;

    if !host.attached().is_empty() {
        bail!("preview still attached after the script: {:?}", host.attached());
    }
    println!();
    println!(
        "Done: {} layer updates, final phase {:?}",
        host.layer_updates(),
        recognizer.phase()
    );
    Ok(())
}

fn run_script(
    runtime: &RuntimeHandle,
    surface: &InputSurface,
    host: &DemoHost,
    press_at: Point,
) -> Result<()> {
    let clock = InstantClock;
    let start = clock.now();
    let end_millis = SCRIPT
        .last()
        .map(|(at, _)| at + SETTLE_MILLIS)
        .unwrap_or(SETTLE_MILLIS);
    let mut pointer = 0;
    let mut steps = SCRIPT.iter().peekable();

    loop {
        let elapsed = clock.elapsed_nanos(start);
        while let Some((at, step)) = steps.next_if(|(at, _)| at * NANOS_PER_MILLI <= elapsed) {
            runtime.advance_to(at * NANOS_PER_MILLI);
            log::info!("{at} ms: {step:?}");
            match step {
                Step::Press => {
                    pointer += 1;
                    surface.dispatch(PointerEvent::down(pointer, press_at));
                }
                Step::Release => surface.dispatch(PointerEvent::up(pointer, press_at)),
                Step::TapClose => host.tap_close(),
            }
        }
        runtime.advance_to(elapsed);

        if elapsed >= end_millis * NANOS_PER_MILLI {
            break;
        }
        std::thread::sleep(Duration::from_millis(16));
    }

    if runtime.has_frame_callbacks() {
        bail!("animations still running after {end_millis} ms");
    }
    Ok(())
}
