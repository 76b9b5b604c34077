//! Trait-based obstacle sources feeding grid walkability

use crate::errors::GridResult;
use crate::pathfinding::Cell;

pub mod footprint;
pub mod obstacle_registry;

pub use footprint::*;
pub use obstacle_registry::*;

/// Anything in the world that may occupy grid cells
pub trait Obstacle: Send + Sync {
    /// Whether this object currently blocks paths at all
    fn is_blocking_path(&self) -> bool {
        true
    }

    /// Cells this object occupies. Fails if the object's geometry is malformed.
    fn occupied_cells(&self) -> GridResult<Vec<Cell>>;
}

/// Type-erased obstacle for collections
pub type BoxedObstacle = Box<dyn Obstacle>;

impl<T: Obstacle + ?Sized> Obstacle for Box<T> {
    fn is_blocking_path(&self) -> bool {
        (**self).is_blocking_path()
    }

    fn occupied_cells(&self) -> GridResult<Vec<Cell>> {
        (**self).occupied_cells()
    }
}

/// Decides which obstacle sources take part in a refresh
pub type ObstacleFilter = Box<dyn Fn(&dyn Obstacle) -> bool + Send + Sync>;

/// Default filter: every source that reports itself as blocking
pub fn blocking_only() -> ObstacleFilter {
    Box::new(|obstacle: &dyn Obstacle| obstacle.is_blocking_path())
}

/// A bare set of cells, for callers that already know what is blocked
#[derive(Debug, Clone, Default)]
pub struct CellObstacle {
    pub cells: Vec<Cell>,
}

impl CellObstacle {
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }
}

impl Obstacle for CellObstacle {
    fn occupied_cells(&self) -> GridResult<Vec<Cell>> {
        Ok(self.cells.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_obstacle_reports_its_cells() {
        let obstacle = CellObstacle::new([Cell::new(1, 1), Cell::new(1, 2)]);
        assert!(obstacle.is_blocking_path());
        assert_eq!(
            obstacle.occupied_cells().unwrap(),
            vec![Cell::new(1, 1), Cell::new(1, 2)]
        );
    }

    #[test]
    fn test_default_filter_follows_blocking_flag() {
        let filter = blocking_only();
        let wall = GridFootprint::single(Cell::new(0, 0));
        let doorway = GridFootprint::single(Cell::new(1, 0)).passable();
        assert!(filter(&wall as &dyn Obstacle));
        assert!(!filter(&doorway as &dyn Obstacle));
    }

    #[test]
    fn test_boxed_obstacle_delegates() {
        let boxed: BoxedObstacle = Box::new(GridFootprint::single(Cell::new(2, 3)).passable());
        assert!(!boxed.is_blocking_path());
        assert_eq!(boxed.occupied_cells().unwrap(), vec![Cell::new(2, 3)]);
    }
}
