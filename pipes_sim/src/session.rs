// Growth session: the lifetime of one pipe grid.
//
// `GrowthSession` owns the grid, the PRNG, the material pool and at most one
// active `PathGrower`. It is advanced by `tick()`, and every tick does exactly
// one unit of work so a driver can pace the animation:
//
//   Idle      → (continuous) grid full?  yes → Resetting
//                                        no  → pick a random start cell:
//                                              taken → StartSkipped, stay Idle
//                                              free  → draw material, start a
//                                                      path, place its first
//                                                      cell → Growing
//             → (single-shot) only on a pending StartGrowth trigger, same
//               start logic, never checks fullness.
//   Growing   → place one more cell; on the path's end → PathFinished, Idle.
//   Resetting → clear the grid, refill the pool → GridReset, Idle.
//
// The reset runs on the tick after fullness is observed, so the observer
// always gets to see the finished grid before it is wiped. A start cell that
// is already taken is not retried: skipping the cycle is what keeps a nearly
// full grid from filling instantly.
//
// Only one path grows at a time. A new cycle can't begin until the active
// path has reported `PathFinished` (or been abandoned), which is what makes
// the grid safe to mutate without any locking.
//
// Cell stamps: continuous sessions write the path id into each cell, single
// shot sessions write the step index.
//
// See also: `grower.rs` for the per-path walk, `material.rs` for the pool,
// `command.rs` / `event.rs` for the session's inputs and outputs,
// `driver.rs` for the loops that call `tick()`.
//
// **Critical constraint: determinism.** All randomness comes from `rng`.
// Start cells draw x, then y, then z; materials are drawn after the start
// cell is known to be free.

use crate::command::SessionCommand;
use crate::config::{GrowthPolicy, PipesConfig, validate_dims};
use crate::error::ConfigError;
use crate::event::{SessionEvent, SessionEventKind};
use crate::grid::PipeGrid;
use crate::grower::{CellStamp, GrowOptions, PathGrower};
use crate::material::MaterialPool;
use crate::prng::PipeRng;
use crate::types::{CellCoord, MaterialId, PathId};

/// Where the session is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Growing,
    Resetting,
}

#[derive(Clone, Debug)]
struct ActivePath {
    id: PathId,
    grower: PathGrower,
    material: Option<MaterialId>,
}

/// Events produced by one `tick()`.
#[derive(Clone, Debug, Default)]
pub struct TickResult {
    pub events: Vec<SessionEvent>,
}

impl TickResult {
    /// Number of cells claimed during the tick (0 or 1).
    pub fn placements(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, SessionEventKind::SegmentPlaced { .. }))
            .count()
    }
}

#[derive(Clone, Debug)]
pub struct GrowthSession {
    /// Ticks processed so far. Stamped on every event.
    pub tick: u64,

    /// The session's deterministic PRNG.
    pub rng: PipeRng,

    /// Configuration (immutable after construction).
    pub config: PipesConfig,

    grid: PipeGrid,
    pool: Option<MaterialPool>,
    phase: SessionPhase,
    active: Option<ActivePath>,
    next_path_id: PathId,
    trigger_pending: bool,
    resets: u64,
    paths_finished: u64,
    /// Events raised outside a tick (construction), flushed by the next one.
    deferred: Vec<SessionEventKind>,
}

impl GrowthSession {
    /// Create a session with an empty grid sized by the config.
    pub fn new(config: PipesConfig, seed: u64) -> Result<Self, ConfigError> {
        let (x, y, z) = config.grid_size.dims();
        Self::from_grid(config, seed, PipeGrid::new(x, y, z))
    }

    /// Create a session around an existing grid, e.g. one restored from a
    /// previous run. The grid's dimensions win over `config.grid_size`,
    /// which is not checked here.
    pub fn from_grid(config: PipesConfig, seed: u64, grid: PipeGrid) -> Result<Self, ConfigError> {
        config.policy.validate()?;
        validate_dims(grid.dims())?;

        let mut deferred = Vec::new();
        let pool = MaterialPool::new(config.materials.clone());
        if pool.is_none() && matches!(config.policy, GrowthPolicy::Continuous { .. }) {
            log::error!("material palette is empty; pipes will have no material");
            deferred.push(SessionEventKind::MaterialPoolEmpty);
        }

        Ok(Self {
            tick: 0,
            rng: PipeRng::new(seed),
            config,
            grid,
            pool,
            phase: SessionPhase::Idle,
            active: None,
            next_path_id: PathId::FIRST,
            trigger_pending: false,
            resets: 0,
            paths_finished: 0,
            deferred,
        })
    }

    pub fn grid(&self) -> &PipeGrid {
        &self.grid
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Id of the path currently growing, if any.
    pub fn active_path(&self) -> Option<PathId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Number of grid resets so far.
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Number of paths that reached `PathFinished`.
    pub fn paths_finished(&self) -> u64 {
        self.paths_finished
    }

    /// Materials left before the pool refills, `None` without a pool.
    pub fn materials_remaining(&self) -> Option<usize> {
        self.pool.as_ref().map(MaterialPool::remaining)
    }

    /// True when nothing happens until a command arrives: a single-shot
    /// session with no path growing and no trigger queued.
    pub fn is_waiting(&self) -> bool {
        matches!(self.config.policy, GrowthPolicy::SingleShot { .. })
            && self.phase == SessionPhase::Idle
            && !self.trigger_pending
    }

    /// Apply `commands`, then do one unit of work.
    pub fn tick(&mut self, commands: &[SessionCommand]) -> TickResult {
        self.tick += 1;
        let tick = self.tick;
        let mut events: Vec<SessionEvent> = self
            .deferred
            .drain(..)
            .map(|kind| SessionEvent { tick, kind })
            .collect();

        for &cmd in commands {
            self.apply_command(cmd, &mut events);
        }

        match self.phase {
            SessionPhase::Resetting => self.reset_grid(&mut events),
            SessionPhase::Growing => self.grow_step(&mut events),
            SessionPhase::Idle => match self.config.policy {
                GrowthPolicy::Continuous { .. } => {
                    if self.grid.is_full() {
                        log::debug!("grid full at tick {}, resetting next tick", self.tick);
                        self.phase = SessionPhase::Resetting;
                    } else {
                        self.start_cycle(&mut events);
                    }
                }
                GrowthPolicy::SingleShot { .. } => {
                    if self.trigger_pending {
                        self.trigger_pending = false;
                        self.start_cycle(&mut events);
                    }
                }
            },
        }

        TickResult { events }
    }

    fn emit(&self, events: &mut Vec<SessionEvent>, kind: SessionEventKind) {
        events.push(SessionEvent {
            tick: self.tick,
            kind,
        });
    }

    fn apply_command(&mut self, cmd: SessionCommand, events: &mut Vec<SessionEvent>) {
        match cmd {
            SessionCommand::StartGrowth => {
                let single_shot = matches!(self.config.policy, GrowthPolicy::SingleShot { .. });
                if single_shot && self.phase == SessionPhase::Idle {
                    self.trigger_pending = true;
                } else {
                    log::debug!("ignoring StartGrowth in phase {:?}", self.phase);
                }
            }
            SessionCommand::AbandonPath => self.abandon(events),
            SessionCommand::ResetGrid => {
                self.abandon(events);
                self.reset_grid(events);
            }
        }
    }

    fn abandon(&mut self, events: &mut Vec<SessionEvent>) {
        if let Some(active) = self.active.take() {
            log::debug!("abandoning {} after {} cells", active.id, active.grower.length());
            self.emit(
                events,
                SessionEventKind::PathAbandoned {
                    path_id: active.id,
                    length: active.grower.length(),
                },
            );
            self.phase = SessionPhase::Idle;
        }
    }

    fn reset_grid(&mut self, events: &mut Vec<SessionEvent>) {
        self.grid.reset();
        if let Some(pool) = &mut self.pool {
            pool.refill();
        }
        self.resets += 1;
        self.phase = SessionPhase::Idle;
        log::info!("grid reset #{} at tick {}", self.resets, self.tick);
        self.emit(
            events,
            SessionEventKind::GridReset {
                resets: self.resets,
            },
        );
    }

    fn random_cell(&mut self) -> CellCoord {
        let (sx, sy, sz) = self.grid.dims();
        let x = self.rng.below_u32(sx) as i32;
        let y = self.rng.below_u32(sy) as i32;
        let z = self.rng.below_u32(sz) as i32;
        CellCoord::new(x, y, z)
    }

    fn start_cycle(&mut self, events: &mut Vec<SessionEvent>) {
        let start = self.random_cell();
        if !self.grid.is_free(start) {
            log::trace!("start {start} taken, skipping cycle");
            self.emit(events, SessionEventKind::StartSkipped { start });
            return;
        }

        let id = self.next_path_id;
        self.next_path_id = id.next();

        let options = match self.config.policy {
            GrowthPolicy::Continuous { max_path_length } => GrowOptions {
                // Unbounded paths are still bounded by the grid volume.
                max_length: max_path_length
                    .unwrap_or_else(|| u32::try_from(self.grid.volume()).unwrap_or(u32::MAX)),
                initial_heading: None,
                stamp: CellStamp::Path(id),
            },
            GrowthPolicy::SingleShot { max_path_length } => GrowOptions {
                max_length: max_path_length,
                initial_heading: self.config.initial_heading,
                stamp: CellStamp::StepIndex,
            },
        };

        let mut refilled_from = None;
        let material = match self.config.policy {
            GrowthPolicy::Continuous { .. } => self.pool.as_mut().map(|pool| {
                let draw = pool.draw(&mut self.rng);
                if draw.refilled {
                    refilled_from = Some(pool.palette().len());
                }
                draw.material
            }),
            GrowthPolicy::SingleShot { .. } => None,
        };
        if let Some(palette_size) = refilled_from {
            log::warn!("material pool exhausted; reusing {palette_size} materials");
            self.emit(events, SessionEventKind::MaterialPoolRefilled { palette_size });
        }

        log::debug!("starting {id} at {start}");
        self.emit(
            events,
            SessionEventKind::PathStarted {
                path_id: id,
                material: material.clone(),
            },
        );
        self.active = Some(ActivePath {
            id,
            grower: PathGrower::new(start, options),
            material,
        });
        self.phase = SessionPhase::Growing;
        self.grow_step(events);
    }

    fn grow_step(&mut self, events: &mut Vec<SessionEvent>) {
        let Some(active) = self.active.as_mut() else {
            self.phase = SessionPhase::Idle;
            return;
        };
        let outcome = active.grower.step(&mut self.grid, &mut self.rng);
        let path_id = active.id;

        if let Some(segment) = outcome.placed {
            log::trace!("{path_id} placed {}", segment.coord);
            let material = active.material.clone();
            self.emit(
                events,
                SessionEventKind::SegmentPlaced {
                    path_id,
                    segment,
                    material,
                },
            );
        }

        if let Some(end) = outcome.end {
            log::debug!("{path_id} finished: {:?} after {} cells", end.reason, end.length);
            self.active = None;
            self.phase = SessionPhase::Idle;
            self.paths_finished += 1;
            self.emit(
                events,
                SessionEventKind::PathFinished {
                    path_id,
                    length: end.length,
                    reason: end.reason,
                },
            );
        }
    }
}
