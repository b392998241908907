// Random-walk growth of a single pipe path.
//
// A `PathGrower` is an explicit step machine: each call to `step()` claims at
// most one grid cell and reports it, so the caller decides how fast a pipe
// appears on screen. The walk per step is:
//
//   1. (first step only) If the start cell is out of bounds or occupied,
//      end with `InvalidStart`, zero cells placed.
//   2. Stamp the current cell and report it.
//   3. If the configured maximum is reached, end with `MaxLength`.
//   4. Collect candidate directions: all six headings minus those leading
//      out of bounds, into an occupied cell, or straight back along the
//      current heading. None left → end with `Stuck`.
//   5. Pick a candidate uniformly, make it the heading, and recheck the
//      target cell (`Blocked` if the filter was somehow bypassed).
//   6. Advance.
//
// No preference for straight runs over turns is encoded; every candidate
// has the same weight. Because occupied cells are filtered, the path never
// revisits a cell, so the cell it just came from is always excluded anyway.
// The opposite-heading rule matters only for the first move, when the
// caller supplied an initial heading.
//
// `grow_path()` runs a grower to completion for callers that don't need
// pacing (tests, benches, the single-shot CLI preview).
//
// See also: `grid.rs` for the occupancy predicates, `session.rs` which drives
// one grower at a time, `types.rs` for `Direction`.
//
// **Critical constraint: determinism.** Candidates are collected in
// `Direction::ALL` order and one `PipeRng` draw is made per move.

use crate::grid::PipeGrid;
use crate::prng::PipeRng;
use crate::types::{CellCoord, Direction, PathId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// What value a grower writes into the cells it claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStamp {
    /// 1-based position of the cell within its path.
    StepIndex,
    /// The id of the owning path, same value for every cell.
    Path(PathId),
}

impl CellStamp {
    /// Stamp for the cell at 0-based `step`. Always nonzero.
    pub fn value(self, step: u32) -> u32 {
        match self {
            CellStamp::StepIndex => step.saturating_add(1),
            CellStamp::Path(id) => id.0,
        }
    }
}

/// Parameters for one growth run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowOptions {
    /// Upper bound on cells placed. Zero yields an empty path.
    pub max_length: u32,
    /// Heading the pipe is considered to be travelling in before its first
    /// move. The first move may not be the opposite of it.
    pub initial_heading: Option<Direction>,
    pub stamp: CellStamp,
}

/// Why a path stopped growing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Start cell was out of bounds or already occupied.
    InvalidStart,
    /// The configured maximum length was reached.
    MaxLength,
    /// No candidate direction was left.
    Stuck,
    /// The chosen next cell failed the bounds/occupancy recheck.
    Blocked,
}

/// Final summary of a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEnd {
    pub reason: EndReason,
    /// Number of cells placed.
    pub length: u32,
}

/// One claimed cell, in growth order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedSegment {
    pub coord: CellCoord,
    /// Value written into the grid.
    pub stamp: u32,
    /// 0-based index within the path.
    pub step: u32,
    /// Heading the pipe travelled to enter this cell. `None` for the first
    /// cell. A renderer compares consecutive headings to place elbows.
    pub heading: Option<Direction>,
}

/// Result of a single `PathGrower::step()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub placed: Option<PlacedSegment>,
    /// Set on the step that ends the path, and on every step after it.
    pub end: Option<PathEnd>,
}

/// Directions from `at` that lead to a free in-bounds cell and are not the
/// reverse of `heading`, in `Direction::ALL` order.
pub fn candidate_directions(
    grid: &PipeGrid,
    at: CellCoord,
    heading: Option<Direction>,
) -> SmallVec<[Direction; 6]> {
    let reverse = heading.map(Direction::opposite);
    Direction::ALL
        .into_iter()
        .filter(|&d| Some(d) != reverse && grid.is_free(at.step(d)))
        .collect()
}

/// Step machine for one path. Holds no borrow of the grid, so the owner can
/// keep both side by side and inspect the grid between steps.
#[derive(Clone, Debug)]
pub struct PathGrower {
    cursor: CellCoord,
    heading: Option<Direction>,
    /// Heading used to enter `cursor`; `None` until the first move.
    entered_with: Option<Direction>,
    placed: u32,
    options: GrowOptions,
    end: Option<PathEnd>,
}

impl PathGrower {
    pub fn new(start: CellCoord, options: GrowOptions) -> Self {
        Self {
            cursor: start,
            heading: options.initial_heading,
            entered_with: None,
            placed: 0,
            options,
            end: None,
        }
    }

    /// Cells placed so far.
    pub fn length(&self) -> u32 {
        self.placed
    }

    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    pub fn end(&self) -> Option<PathEnd> {
        self.end
    }

    pub fn is_finished(&self) -> bool {
        self.end.is_some()
    }

    fn finish(&mut self, reason: EndReason) -> PathEnd {
        let end = PathEnd {
            reason,
            length: self.placed,
        };
        self.end = Some(end);
        end
    }

    /// Advance by one cell. A finished grower keeps returning its end.
    pub fn step(&mut self, grid: &mut PipeGrid, rng: &mut PipeRng) -> StepOutcome {
        if let Some(end) = self.end {
            return StepOutcome {
                placed: None,
                end: Some(end),
            };
        }

        if self.placed == 0 {
            if !grid.is_free(self.cursor) {
                let end = self.finish(EndReason::InvalidStart);
                return StepOutcome {
                    placed: None,
                    end: Some(end),
                };
            }
            if self.options.max_length == 0 {
                let end = self.finish(EndReason::MaxLength);
                return StepOutcome {
                    placed: None,
                    end: Some(end),
                };
            }
        }

        let coord = self.cursor;
        let stamp = self.options.stamp.value(self.placed);
        grid.occupy(coord, stamp);
        let segment = PlacedSegment {
            coord,
            stamp,
            step: self.placed,
            heading: self.entered_with,
        };
        self.placed += 1;

        if self.placed >= self.options.max_length {
            let end = self.finish(EndReason::MaxLength);
            return StepOutcome {
                placed: Some(segment),
                end: Some(end),
            };
        }

        let candidates = candidate_directions(grid, coord, self.heading);
        let Some(&dir) = rng.choose(&candidates) else {
            let end = self.finish(EndReason::Stuck);
            return StepOutcome {
                placed: Some(segment),
                end: Some(end),
            };
        };
        self.heading = Some(dir);

        let next = coord.step(dir);
        if !grid.is_free(next) {
            let end = self.finish(EndReason::Blocked);
            return StepOutcome {
                placed: Some(segment),
                end: Some(end),
            };
        }
        self.cursor = next;
        self.entered_with = Some(dir);

        StepOutcome {
            placed: Some(segment),
            end: None,
        }
    }
}

/// A path grown to completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrownPath {
    pub segments: Vec<PlacedSegment>,
    pub end: PathEnd,
}

impl GrownPath {
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.segments.iter().map(|s| s.coord)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of moves between cells (one less than the cell count).
    pub fn moves(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }
}

/// Grow a path from `start` without pacing.
pub fn grow_path(
    grid: &mut PipeGrid,
    rng: &mut PipeRng,
    start: CellCoord,
    options: GrowOptions,
) -> GrownPath {
    let mut grower = PathGrower::new(start, options);
    let mut segments = Vec::new();
    loop {
        let outcome = grower.step(grid, rng);
        segments.extend(outcome.placed);
        if let Some(end) = outcome.end {
            return GrownPath { segments, end };
        }
    }
}
