// Render sinks for the terminal.
//
// `TextSink` prints one readable line per event, with warnings prefixed so
// they stand out. `JsonLinesSink` writes each event as one serde_json line
// for piping into another program. Both wrap any `io::Write`.
//
// `RenderSink::handle` can't fail, so a write error is logged once and the
// sink goes quiet rather than panicking mid-animation.

use pipes_sim::driver::RenderSink;
use pipes_sim::event::{SessionEvent, SessionEventKind};
use std::io::Write;

fn describe(kind: &SessionEventKind) -> String {
    match kind {
        SessionEventKind::PathStarted { path_id, material } => match material {
            Some(m) => format!("{path_id} started ({m})"),
            None => format!("{path_id} started"),
        },
        SessionEventKind::SegmentPlaced {
            path_id, segment, ..
        } => match segment.heading {
            Some(dir) => format!("{path_id} #{} {} via {dir:?}", segment.step, segment.coord),
            None => format!("{path_id} #{} {}", segment.step, segment.coord),
        },
        SessionEventKind::StartSkipped { start } => format!("start {start} taken, skipped"),
        SessionEventKind::PathFinished {
            path_id,
            length,
            reason,
        } => format!("{path_id} finished: {reason:?}, {length} cells"),
        SessionEventKind::PathAbandoned { path_id, length } => {
            format!("{path_id} abandoned after {length} cells")
        }
        SessionEventKind::GridReset { resets } => format!("grid reset #{resets}"),
        SessionEventKind::MaterialPoolRefilled { palette_size } => {
            format!("warning: material pool exhausted, reusing {palette_size} materials")
        }
        SessionEventKind::MaterialPoolEmpty => "warning: no materials configured".to_string(),
    }
}

pub struct TextSink<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TextSink<W> {
    fn handle(&mut self, event: &SessionEvent) {
        if self.failed {
            return;
        }
        if let Err(e) = writeln!(self.out, "[{:>6}] {}", event.tick, describe(&event.kind)) {
            log::error!("output failed, dropping further events: {e}");
            self.failed = true;
        }
    }
}

pub struct JsonLinesSink<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for JsonLinesSink<W> {
    fn handle(&mut self, event: &SessionEvent) {
        if self.failed {
            return;
        }
        let written = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        if let Err(e) = written {
            log::error!("output failed, dropping further events: {e}");
            self.failed = true;
        }
    }
}
