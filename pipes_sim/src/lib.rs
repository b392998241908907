// pipes_sim: pure Rust core of the pipes screensaver.
//
// This crate grows pipes through a bounded 3D voxel grid by random walk and
// decides when a grid is finished and must be cleared. It knows nothing
// about rendering or wall-clock time: a driver steps the session, and a
// render sink consumes the events it produces.
//
// Module overview:
// - `types.rs`:    CellCoord, Direction, PathId, MaterialId.
// - `grid.rs`:     PipeGrid, the dense occupancy grid and its predicates.
// - `grower.rs`:   PathGrower, the step-by-step random walk for one path.
// - `material.rs`: MaterialPool, draw-without-replacement with refill.
// - `session.rs`:  GrowthSession, single-shot and continuous policies.
// - `command.rs`:  SessionCommand, the external inputs (trigger, abandon, reset).
// - `event.rs`:    SessionEvent, everything a render sink can observe.
// - `config.rs`:   PipesConfig, JSON-loadable tunables with defaults.
// - `error.rs`:    ConfigError.
// - `driver.rs`:   Pacer and RenderSink traits plus the driving loops.
// - `prng`:        Re-exported from `pipes_prng`.
//
// The `pipes_screensaver` binary wraps this library with a CLI, real sleeps
// and a printing sink.
//
// **Critical constraint: determinism.** Given a seed, a config and a
// command sequence, the produced event stream is fixed. All randomness comes
// from the session's `PipeRng`.

pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod grid;
pub mod grower;
pub mod material;
pub use pipes_prng as prng;
pub mod session;
pub mod types;
