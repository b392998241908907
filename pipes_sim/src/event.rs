// Events a growth session emits for its observer.
//
// The session never draws anything. A render sink rebuilds the picture from
// this stream alone: one `SegmentPlaced` per claimed cell in growth order,
// `GridReset` when everything should be cleared, and warnings it may surface
// however it likes. Each event carries the session tick it was produced on.
//
// See also: `session.rs` which produces them, `driver.rs` for the
// `RenderSink` trait that consumes them.

use crate::grower::{EndReason, PlacedSegment};
use crate::types::{CellCoord, MaterialId, PathId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub tick: u64,
    pub kind: SessionEventKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A path claimed its start cell and will begin placing segments.
    PathStarted {
        path_id: PathId,
        material: Option<MaterialId>,
    },
    /// One cell was claimed.
    SegmentPlaced {
        path_id: PathId,
        segment: PlacedSegment,
        material: Option<MaterialId>,
    },
    /// The randomly chosen start cell was already taken, so this cycle grew
    /// nothing. Not retried; the next cycle picks a new cell.
    StartSkipped { start: CellCoord },
    /// A path stopped growing.
    PathFinished {
        path_id: PathId,
        length: u32,
        reason: EndReason,
    },
    /// A growing path was dropped by `SessionCommand::AbandonPath` or a
    /// manual reset.
    PathAbandoned { path_id: PathId, length: u32 },
    /// Every cell was cleared.
    GridReset { resets: u64 },
    /// Warning: the material pool ran dry and was refilled, so colours will
    /// repeat from here on.
    MaterialPoolRefilled { palette_size: usize },
    /// Warning: the session was configured with no materials and will
    /// assign none.
    MaterialPoolEmpty,
}

impl SessionEventKind {
    /// Warnings are the events an observer may want to surface to a human.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            SessionEventKind::MaterialPoolRefilled { .. } | SessionEventKind::MaterialPoolEmpty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_classification() {
        assert!(SessionEventKind::MaterialPoolEmpty.is_warning());
        assert!(SessionEventKind::MaterialPoolRefilled { palette_size: 2 }.is_warning());
        assert!(!SessionEventKind::GridReset { resets: 1 }.is_warning());
    }

    #[test]
    fn segment_event_json_shape() {
        let event = SessionEvent {
            tick: 3,
            kind: SessionEventKind::SegmentPlaced {
                path_id: PathId(2),
                segment: PlacedSegment {
                    coord: CellCoord::new(1, 2, 3),
                    stamp: 2,
                    step: 0,
                    heading: None,
                },
                material: Some(MaterialId::new("red")),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        let placed = &json["kind"]["SegmentPlaced"];
        assert_eq!(placed["segment"]["coord"]["y"], 2);
        assert_eq!(placed["material"], "red");
        let back: SessionEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
