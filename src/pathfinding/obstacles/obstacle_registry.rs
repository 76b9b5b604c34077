//! Periodic, authoritative rebuild of grid walkability from obstacle sources

use crate::errors::GridResult;
use crate::pathfinding::grid_index::GridIndex;
use crate::pathfinding::obstacles::{Obstacle, ObstacleFilter, blocking_only};
use crate::pathfinding::Cell;
use bevy::prelude::*;
use std::collections::HashSet;
use std::fmt;

/// Summary of one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshStats {
    pub sources_scanned: usize,
    pub sources_blocking: usize,
    /// Distinct cells reported by blocking sources
    pub obstacle_cells: usize,
    /// Reported cells that fall outside the grid and were ignored
    pub out_of_bounds_cells: usize,
}

/// Rebuilds the obstacle set from scratch on every refresh and publishes it
/// to the grid as one complete walkability mask.
pub struct ObstacleRegistry {
    filter: ObstacleFilter,
    last_obstacles: HashSet<Cell>,
    refresh_count: u64,
}

impl Default for ObstacleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObstacleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObstacleRegistry")
            .field("last_obstacles", &self.last_obstacles.len())
            .field("refresh_count", &self.refresh_count)
            .finish_non_exhaustive()
    }
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::with_filter(blocking_only())
    }

    /// Registry that only considers sources accepted by `filter`
    pub fn with_filter(filter: ObstacleFilter) -> Self {
        Self {
            filter,
            last_obstacles: HashSet::new(),
            refresh_count: 0,
        }
    }

    pub fn set_filter(&mut self, filter: ObstacleFilter) {
        self.filter = filter;
    }

    /// Obstacle set published by the last successful refresh
    pub fn last_obstacles(&self) -> &HashSet<Cell> {
        &self.last_obstacles
    }

    /// Number of successful refreshes
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    /// Rescan `obstacles` and rewrite every cell's walkability.
    ///
    /// If any accepted source fails to report its cells the grid keeps its
    /// previous state, the failure is logged and the error is returned.
    pub fn refresh<'a, O, I>(&mut self, grid: &mut GridIndex, obstacles: I) -> GridResult<RefreshStats>
    where
        O: Obstacle + 'a,
        I: IntoIterator<Item = &'a O>,
    {
        self.rebuild(grid, obstacles).inspect_err(|err| {
            warn!("Obstacle refresh failed, keeping previous walkability: {err}");
        })
    }

    fn rebuild<'a, O, I>(&mut self, grid: &mut GridIndex, obstacles: I) -> GridResult<RefreshStats>
    where
        O: Obstacle + 'a,
        I: IntoIterator<Item = &'a O>,
    {
        let (obstacle_set, mut stats) = self.collect(obstacles)?;

        let mut mask = vec![true; grid.len()];
        for cell in &obstacle_set {
            match grid.index_of(*cell) {
                Some(index) => mask[index] = false,
                None => stats.out_of_bounds_cells += 1,
            }
        }

        grid.replace_walkability(mask)?;
        self.last_obstacles = obstacle_set;
        self.refresh_count += 1;

        debug!(
            "Obstacle refresh #{}: {}/{} sources blocking, {} cells blocked, {} outside grid",
            self.refresh_count,
            stats.sources_blocking,
            stats.sources_scanned,
            stats.obstacle_cells - stats.out_of_bounds_cells,
            stats.out_of_bounds_cells
        );

        Ok(stats)
    }

    fn collect<'a, O, I>(&self, obstacles: I) -> GridResult<(HashSet<Cell>, RefreshStats)>
    where
        O: Obstacle + 'a,
        I: IntoIterator<Item = &'a O>,
    {
        let mut obstacle_set = HashSet::new();
        let mut stats = RefreshStats::default();

        for obstacle in obstacles {
            stats.sources_scanned += 1;
            if !(self.filter)(obstacle as &dyn Obstacle) {
                continue;
            }
            stats.sources_blocking += 1;
            obstacle_set.extend(obstacle.occupied_cells()?);
        }

        stats.obstacle_cells = obstacle_set.len();
        Ok((obstacle_set, stats))
    }
}
