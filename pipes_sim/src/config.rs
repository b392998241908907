// Data-driven configuration for a pipes session.
//
// Every tunable lives in `PipesConfig`, loaded from JSON at startup and never
// mutated afterwards. Every field has a default, so a config file only needs
// to name what it changes (`{}` is a valid config).
//
// The grid size accepts either a single number for a cube or an `[x, y, z]`
// triple. The growth policy is an externally tagged enum:
//
//   "policy": { "Continuous": { "max_path_length": null } }
//   "policy": { "SingleShot": { "max_path_length": 10 } }
//
// See also: `session.rs` which reads the config at construction,
// `error.rs` for `ConfigError`.
//
// **Critical constraint: determinism.** With `seed` set, a config fully
// determines the session's output for a given command sequence.

use crate::error::ConfigError;
use crate::types::{Direction, MaterialId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid dimensions, cube or box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridSize {
    Cube(u32),
    Dims(u32, u32, u32),
}

impl GridSize {
    pub fn dims(self) -> (u32, u32, u32) {
        match self {
            GridSize::Cube(n) => (n, n, n),
            GridSize::Dims(x, y, z) => (x, y, z),
        }
    }
}

/// How the session decides when to grow and when to reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthPolicy {
    /// Grow one path per `StartGrowth` trigger, then wait. Cells are stamped
    /// with their step index, no materials are assigned, and the grid is
    /// never reset automatically.
    SingleShot { max_path_length: u32 },
    /// Grow paths back to back, resetting whenever the grid fills up. Cells
    /// are stamped with the path id. `None` grows each path until it is
    /// stuck.
    Continuous { max_path_length: Option<u32> },
}

impl GrowthPolicy {
    /// Rejects a zero length bound: such paths end before placing a cell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            GrowthPolicy::SingleShot { max_path_length: 0 }
            | GrowthPolicy::Continuous {
                max_path_length: Some(0),
            } => Err(ConfigError::ZeroPathLength),
            _ => Ok(()),
        }
    }
}

/// Top-level session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipesConfig {
    /// Grid dimensions in cells.
    pub grid_size: GridSize,

    pub policy: GrowthPolicy,

    /// Real-world delay between two placed segments. Only the driver reads
    /// this; the session itself has no notion of time.
    pub step_delay_ms: u64,

    /// Palette for the continuous policy. Each path takes one material,
    /// unique until the palette is exhausted.
    pub materials: Vec<MaterialId>,

    /// Heading a single-shot pipe starts with. Its first move may not be the
    /// reverse of this.
    pub initial_heading: Option<Direction>,

    /// PRNG seed. `None` lets the caller pick one (the CLI uses the clock).
    pub seed: Option<u64>,
}

impl Default for PipesConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::Cube(10),
            policy: GrowthPolicy::Continuous {
                max_path_length: None,
            },
            step_delay_ms: 100,
            materials: ["red", "green", "blue", "yellow", "cyan", "magenta", "white"]
                .into_iter()
                .map(MaterialId::new)
                .collect(),
            initial_heading: Some(Direction::PosX),
            seed: None,
        }
    }
}

impl PipesConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configs the session cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dims(self.grid_size.dims())?;
        self.policy.validate()
    }
}

/// Every axis must have at least one cell.
pub fn validate_dims((x, y, z): (u32, u32, u32)) -> Result<(), ConfigError> {
    for (axis, n) in [('x', x), ('y', y), ('z', z)] {
        if n == 0 {
            return Err(ConfigError::ZeroDimension { axis });
        }
    }
    Ok(())
}
