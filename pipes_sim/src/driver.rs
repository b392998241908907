// Driving loops: pacing and the render-sink seam.
//
// The session never waits. A driver calls `tick()`, hands every event to a
// `RenderSink`, and asks a `Pacer` to wait after each tick that placed a
// segment, which is how a pipe appears one piece at a time. Ticks that only
// reset the grid or skip an occupied start don't wait, so a nearly full grid
// drains its failed starts quickly instead of stalling the animation.
//
// Two loops cover the two policies:
// - `run()` ticks until a stop flag is raised or a tick limit is hit
//   (continuous screensaver mode).
// - `run_triggered()` queues one `StartGrowth` and ticks until the session
//   is waiting again (single-shot mode, one call per trigger).
//
// Stopping between ticks is always safe: the session has no partial state
// to clean up, and claimed cells stay valid.

use crate::command::SessionCommand;
use crate::config::GrowthPolicy;
use crate::event::SessionEvent;
use crate::session::GrowthSession;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Consumer of session events (instantiates visuals, prints, records).
pub trait RenderSink {
    fn handle(&mut self, event: &SessionEvent);
}

/// Collects events in memory.
impl RenderSink for Vec<SessionEvent> {
    fn handle(&mut self, event: &SessionEvent) {
        self.push(event.clone());
    }
}

/// Decides how long to wait between placed segments.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Real-time pacing with `std::thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Never waits.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self, _delay: Duration) {}
}

/// What a driving loop did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub placements: u64,
}

fn drive_tick<S: RenderSink, P: Pacer>(
    session: &mut GrowthSession,
    commands: &[SessionCommand],
    sink: &mut S,
    pacer: &mut P,
    summary: &mut RunSummary,
) {
    let delay = Duration::from_millis(session.config.step_delay_ms);
    let result = session.tick(commands);
    for event in &result.events {
        sink.handle(event);
    }
    let placed = result.placements() as u64;
    summary.ticks += 1;
    summary.placements += placed;
    if placed > 0 {
        pacer.pause(delay);
    }
}

/// Tick until `stop` is set or `max_ticks` ticks have run.
pub fn run<S: RenderSink, P: Pacer>(
    session: &mut GrowthSession,
    sink: &mut S,
    pacer: &mut P,
    stop: &AtomicBool,
    max_ticks: Option<u64>,
) -> RunSummary {
    let mut summary = RunSummary::default();
    while !stop.load(Ordering::Relaxed) {
        if max_ticks.is_some_and(|limit| summary.ticks >= limit) {
            break;
        }
        drive_tick(session, &[], sink, pacer, &mut summary);
    }
    summary
}

/// Fire one `StartGrowth` trigger and tick until the session is waiting
/// for the next one. Returns after a single tick for sessions that ignore
/// triggers, rather than spinning forever.
pub fn run_triggered<S: RenderSink, P: Pacer>(
    session: &mut GrowthSession,
    sink: &mut S,
    pacer: &mut P,
    stop: &AtomicBool,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let single_shot = matches!(session.config.policy, GrowthPolicy::SingleShot { .. });
    drive_tick(session, &[SessionCommand::StartGrowth], sink, pacer, &mut summary);
    while single_shot && !session.is_waiting() && !stop.load(Ordering::Relaxed) {
        drive_tick(session, &[], sink, pacer, &mut summary);
    }
    summary
}
