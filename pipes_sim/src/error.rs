// Error types for loading and validating a pipes configuration.
//
// Growth itself has no error path: an occupied start or a dead end is a
// normal way for a pipe to stop. Only configuration can be wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("grid dimension {axis} must be positive")]
    ZeroDimension { axis: char },

    #[error("max_path_length must be positive")]
    ZeroPathLength,
}
