use crate::pathfinding::Cell;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    // Grid setup errors
    #[error("Invalid grid configuration: {reason}")]
    Configuration { reason: String },

    #[error("Cell {cell} is outside the grid")]
    InvalidCell { cell: Cell },

    #[error("Invalid obstacle footprint: {reason}")]
    InvalidFootprint { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // Config file errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config validation failed: {reason}")]
    ConfigValidationFailed { reason: String },
}

impl GridError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

/// Result type alias for all grid operations
pub type GridResult<T> = Result<T, GridError>;
