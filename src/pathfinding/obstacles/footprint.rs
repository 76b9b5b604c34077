//! Rectangular grid footprints for placed and movable world objects

use crate::errors::{GridError, GridResult};
use crate::pathfinding::obstacles::Obstacle;
use crate::pathfinding::{Cell, MAX_GRID_CELLS};
use bevy::prelude::*;

/// Component marking an entity as occupying a rectangle of cells
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct GridFootprint {
    /// Bottom-left occupied cell
    pub origin: Cell,
    /// Width and height in cells
    pub size: Cell,
    pub blocks_path: bool,
    /// Offset from `origin` of the cell agents stand on to use this object
    pub interaction_offset: Cell,
}

impl GridFootprint {
    pub fn new(origin: Cell, size: Cell) -> Self {
        Self {
            origin,
            size,
            blocks_path: true,
            interaction_offset: Cell::default(),
        }
    }

    /// One-cell footprint
    pub fn single(origin: Cell) -> Self {
        Self::new(origin, Cell::new(1, 1))
    }

    pub fn with_interaction_offset(mut self, offset: Cell) -> Self {
        self.interaction_offset = offset;
        self
    }

    /// Occupies cells without blocking paths
    pub fn passable(mut self) -> Self {
        self.blocks_path = false;
        self
    }

    pub fn set_blocking(&mut self, blocks_path: bool) {
        self.blocks_path = blocks_path;
    }

    /// Cell an agent walks to in order to use this object
    pub fn interaction_cell(&self) -> Cell {
        self.origin + self.interaction_offset
    }

    /// Top-right occupied cell (inclusive), or None for an empty or
    /// unrepresentable rectangle
    pub fn top_right(&self) -> Option<Cell> {
        if self.size.x <= 0 || self.size.y <= 0 {
            return None;
        }
        self.origin.checked_add(self.size - Cell::new(1, 1))
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let dx = i64::from(cell.x) - i64::from(self.origin.x);
        let dy = i64::from(cell.y) - i64::from(self.origin.y);
        (0..i64::from(self.size.x)).contains(&dx) && (0..i64::from(self.size.y)).contains(&dy)
    }
}

impl Obstacle for GridFootprint {
    fn is_blocking_path(&self) -> bool {
        self.blocks_path
    }

    fn occupied_cells(&self) -> GridResult<Vec<Cell>> {
        if self.size.x <= 0 || self.size.y <= 0 {
            return Err(GridError::InvalidFootprint {
                reason: format!("footprint at {} has non-positive size {}", self.origin, self.size),
            });
        }

        let count = self
            .size
            .x
            .checked_mul(self.size.y)
            .and_then(|count| usize::try_from(count).ok())
            .filter(|count| *count <= MAX_GRID_CELLS);
        let Some(count) = count else {
            return Err(GridError::InvalidFootprint {
                reason: format!(
                    "footprint at {} with size {} covers more than {MAX_GRID_CELLS} cells",
                    self.origin, self.size
                ),
            });
        };

        if self.top_right().is_none() {
            return Err(GridError::InvalidFootprint {
                reason: format!(
                    "footprint at {} with size {} extends past the coordinate range",
                    self.origin, self.size
                ),
            });
        }

        let mut cells = Vec::with_capacity(count);
        for dy in 0..self.size.y {
            for dx in 0..self.size.x {
                cells.push(self.origin + Cell::new(dx, dy));
            }
        }
        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_occupies_every_cell() {
        let footprint = GridFootprint::new(Cell::new(2, 3), Cell::new(2, 3));
        let cells = footprint.occupied_cells().unwrap();

        assert_eq!(cells.len(), 6);
        assert_eq!(cells.first(), Some(&Cell::new(2, 3)));
        assert_eq!(cells.last(), Some(&Cell::new(3, 5)));
        assert_eq!(footprint.top_right(), Some(Cell::new(3, 5)));
        assert!(cells.iter().all(|cell| footprint.contains(*cell)));
        assert!(!footprint.contains(Cell::new(4, 3)));
    }

    #[test]
    fn test_zero_size_is_malformed() {
        let footprint = GridFootprint::new(Cell::new(0, 0), Cell::new(0, 2));
        assert!(matches!(
            footprint.occupied_cells(),
            Err(GridError::InvalidFootprint { .. })
        ));
    }

    #[test]
    fn test_oversized_footprint_is_malformed() {
        let huge = GridFootprint::new(Cell::new(0, 0), Cell::new(100_000, 100_000));
        assert!(matches!(
            huge.occupied_cells(),
            Err(GridError::InvalidFootprint { .. })
        ));

        let too_many = GridFootprint::new(Cell::new(0, 0), Cell::new(4097, 4096));
        assert!(too_many.occupied_cells().is_err());
    }

    #[test]
    fn test_footprint_at_coordinate_limit() {
        let edge = GridFootprint::new(Cell::new(i32::MAX - 1, 0), Cell::new(2, 1));
        assert_eq!(
            edge.occupied_cells().unwrap(),
            vec![Cell::new(i32::MAX - 1, 0), Cell::new(i32::MAX, 0)]
        );
        assert!(edge.contains(Cell::new(i32::MAX, 0)));

        let past = GridFootprint::new(Cell::new(i32::MAX - 1, 0), Cell::new(3, 1));
        assert_eq!(past.top_right(), None);
        assert!(matches!(
            past.occupied_cells(),
            Err(GridError::InvalidFootprint { .. })
        ));
        assert!(!past.contains(Cell::new(i32::MIN, 0)));
    }

    #[test]
    fn test_interaction_cell_uses_offset() {
        let table = GridFootprint::new(Cell::new(5, 5), Cell::new(2, 1))
            .with_interaction_offset(Cell::new(0, -1));
        assert_eq!(table.interaction_cell(), Cell::new(5, 4));
        assert!(!table.contains(table.interaction_cell()));
    }

    #[test]
    fn test_blocking_toggle() {
        let mut crate_footprint = GridFootprint::single(Cell::new(1, 1));
        assert!(crate_footprint.is_blocking_path());
        crate_footprint.set_blocking(false);
        assert!(!crate_footprint.is_blocking_path());
        assert!(!GridFootprint::single(Cell::new(0, 0)).passable().is_blocking_path());
    }
}
