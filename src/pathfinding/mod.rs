//! Dynamic grid pathfinding: cell index, obstacle refresh and A* queries

pub mod coordinates;
pub mod engine;
pub mod grid_index;
pub mod obstacles;
pub mod service;

pub use coordinates::*;
pub use engine::{PathfindingEngine, STEP_COST, SearchStats};
pub use grid_index::{GridIndex, Node, NodeState};
pub use obstacles::*;
pub use service::PathService;

/// Ordered cells from the step after the start up to and including the end.
/// Empty when no path exists.
pub type GridPath = Vec<Cell>;
