//! Integer cell coordinates and grid bounds

use crate::errors::{GridError, GridResult};
use derive_more::{Add, Display, From, Sub};
use serde::{Deserialize, Serialize};

/// Path cost type. Wide enough for any grid accepted by [`GridBounds::validate`].
pub type Cost = i32;

/// Largest grid the index will allocate (4096 x 4096)
pub const MAX_GRID_CELLS: usize = 4096 * 4096;

/// A single addressable grid cell
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Add,
    Sub,
    Display,
    From,
    Serialize,
    Deserialize,
)]
#[display("({x}, {y})")]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const NORTH: Cell = Cell { x: 0, y: 1 };
    pub const EAST: Cell = Cell { x: 1, y: 0 };
    pub const SOUTH: Cell = Cell { x: 0, y: -1 };
    pub const WEST: Cell = Cell { x: -1, y: 0 };

    /// Orthogonal directions in neighbor enumeration order
    pub const CARDINALS: [Cell; 4] = [Self::NORTH, Self::EAST, Self::SOUTH, Self::WEST];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the A* heuristic on a 4-connected grid
    pub fn manhattan_distance(self, other: Cell) -> Cost {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// `self + other`, or None if either axis leaves the `i32` range
    pub fn checked_add(self, other: Cell) -> Option<Cell> {
        Some(Cell::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
        ))
    }

    /// The orthogonal neighbors in N, E, S, W order. Neighbors past the
    /// `i32` range are skipped.
    pub fn cardinal_neighbors(self) -> impl Iterator<Item = Cell> {
        Self::CARDINALS
            .into_iter()
            .filter_map(move |dir| self.checked_add(dir))
    }

    /// True if `other` is exactly one orthogonal step away
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Axis-aligned cell rectangle, `min` inclusive and `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: Cell,
    pub max: Cell,
}

impl GridBounds {
    pub fn new(min: Cell, max: Cell) -> Self {
        Self { min, max }
    }

    /// Bounds anchored at the origin
    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(Cell::new(0, 0), Cell::new(width, height))
    }

    /// Span along x, widened so any pair of `i32` corners fits
    pub fn width(&self) -> i64 {
        i64::from(self.max.x) - i64::from(self.min.x)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.max.y) - i64::from(self.min.y)
    }

    /// Number of cells covered; zero for degenerate bounds, saturating at
    /// `usize::MAX`
    pub fn cell_count(&self) -> usize {
        if self.width() <= 0 || self.height() <= 0 {
            return 0;
        }
        self.width()
            .checked_mul(self.height())
            .and_then(|count| usize::try_from(count).ok())
            .unwrap_or(usize::MAX)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.min.x && cell.x < self.max.x && cell.y >= self.min.y && cell.y < self.max.y
    }

    /// Reject empty spans and grids too large to index
    pub fn validate(&self) -> GridResult<()> {
        if self.width() <= 0 || self.height() <= 0 {
            return Err(GridError::configuration(format!(
                "bounds {} .. {} have an empty span",
                self.min, self.max
            )));
        }

        if self.cell_count() > MAX_GRID_CELLS {
            return Err(GridError::configuration(format!(
                "bounds {} .. {} cover {} cells, limit is {MAX_GRID_CELLS}",
                self.min,
                self.max,
                self.cell_count()
            )));
        }

        Ok(())
    }

    /// Row-major iteration over every cell
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.min.y..self.max.y)
            .flat_map(move |y| (self.min.x..self.max.x).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_arithmetic() {
        let cell = Cell::new(3, 4);
        assert_eq!(cell + Cell::EAST, Cell::new(4, 4));
        assert_eq!(cell - Cell::NORTH, Cell::new(3, 3));
        assert_eq!(Cell::from((1, 2)), Cell::new(1, 2));
        assert_eq!(cell.to_string(), "(3, 4)");
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Cell::new(0, 0);
        let b = Cell::new(3, -4);
        assert_eq!(a.manhattan_distance(b), 7);
        assert_eq!(b.manhattan_distance(a), 7);
        assert_eq!(a.manhattan_distance(a), 0);
    }

    #[test]
    fn test_cardinal_neighbor_order() {
        let neighbors: Vec<Cell> = Cell::new(5, 5).cardinal_neighbors().collect();
        assert_eq!(
            neighbors,
            vec![
                Cell::new(5, 6),
                Cell::new(6, 5),
                Cell::new(5, 4),
                Cell::new(4, 5)
            ]
        );
        assert!(neighbors.iter().all(|n| n.is_adjacent(Cell::new(5, 5))));
    }

    #[test]
    fn test_bounds_are_half_open() {
        let bounds = GridBounds::new(Cell::new(-2, 1), Cell::new(3, 4));
        assert_eq!(bounds.width(), 5);
        assert_eq!(bounds.height(), 3);
        assert_eq!(bounds.cell_count(), 15);
        assert!(bounds.contains(Cell::new(-2, 1)));
        assert!(bounds.contains(Cell::new(2, 3)));
        assert!(!bounds.contains(Cell::new(3, 3)));
        assert!(!bounds.contains(Cell::new(2, 4)));
        assert_eq!(bounds.cells().count(), 15);
        assert_eq!(bounds.cells().next(), Some(Cell::new(-2, 1)));
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        assert!(GridBounds::from_size(0, 5).validate().is_err());
        assert!(GridBounds::from_size(5, 0).validate().is_err());
        assert!(
            GridBounds::new(Cell::new(4, 4), Cell::new(2, 8))
                .validate()
                .is_err()
        );
        assert!(GridBounds::from_size(5000, 5000).validate().is_err());
        assert!(GridBounds::from_size(5, 5).validate().is_ok());
    }

    #[test]
    fn test_wide_bounds_rejected_without_overflow() {
        let bounds = GridBounds::new(Cell::new(-2_000_000_000, 0), Cell::new(2_000_000_000, 1));
        assert_eq!(bounds.width(), 4_000_000_000);
        assert!(matches!(
            bounds.validate(),
            Err(GridError::Configuration { .. })
        ));

        let everything = GridBounds::new(Cell::new(i32::MIN, i32::MIN), Cell::new(i32::MAX, i32::MAX));
        assert_eq!(everything.cell_count(), usize::MAX);
        assert!(everything.validate().is_err());
    }

    #[test]
    fn test_neighbors_at_i32_limits() {
        let low: Vec<Cell> = Cell::new(i32::MIN, 0).cardinal_neighbors().collect();
        assert_eq!(
            low,
            vec![Cell::new(i32::MIN, 1), Cell::new(i32::MIN + 1, 0), Cell::new(i32::MIN, -1)]
        );

        let high: Vec<Cell> = Cell::new(i32::MAX, i32::MAX).cardinal_neighbors().collect();
        assert_eq!(
            high,
            vec![Cell::new(i32::MAX, i32::MAX - 1), Cell::new(i32::MAX - 1, i32::MAX)]
        );
        assert_eq!(Cell::new(i32::MAX, 0).checked_add(Cell::EAST), None);
    }

    #[test]
    fn test_bounds_at_i32_limits_are_usable() {
        let bounds = GridBounds::new(Cell::new(i32::MIN, 0), Cell::new(i32::MIN + 3, 3));
        assert!(bounds.validate().is_ok());
        assert_eq!(bounds.cell_count(), 9);

        let bounds = GridBounds::new(Cell::new(i32::MAX - 3, i32::MAX - 2), Cell::new(i32::MAX, i32::MAX));
        assert!(bounds.validate().is_ok());
        assert_eq!(bounds.cell_count(), 6);
    }
}
