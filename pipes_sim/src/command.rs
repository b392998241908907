// External inputs to a growth session.
//
// The session is a pure function `(state, commands) -> (new_state, events)`;
// commands are the only way outside code changes what it does. They are
// applied at the start of the tick they are passed to, before any growth.
//
// See also: `session.rs` for `GrowthSession::tick()` which applies them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCommand {
    /// Grow one path (single-shot policy). Ignored while a path is growing
    /// and by continuous sessions, which grow on their own.
    StartGrowth,
    /// Drop the path in progress. Cells it already claimed stay occupied.
    AbandonPath,
    /// Clear the grid now, abandoning any path in progress.
    ResetGrid,
}
