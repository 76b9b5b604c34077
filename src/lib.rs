pub mod config;
pub mod errors;
pub mod pathfinding;
pub mod plugins;

// Selective re-exports for external consumers

// Plugins - apps need the pathfinding plugin and its components
pub use plugins::*;

pub use errors::{GridError, GridResult};

pub use crate::pathfinding::{Cell, GridBounds, GridFootprint, GridPath, Obstacle, PathService};
