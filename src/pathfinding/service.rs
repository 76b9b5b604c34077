//! Pathfinding facade: grid ownership, refresh schedule and queries

use crate::config::PathfindingConfig;
use crate::errors::{GridError, GridResult};
use crate::pathfinding::engine::{PathfindingEngine, SearchStats};
use crate::pathfinding::grid_index::GridIndex;
use crate::pathfinding::obstacles::{Obstacle, ObstacleFilter, ObstacleRegistry, RefreshStats};
use crate::pathfinding::{Cell, GridBounds, GridPath};
use bevy::prelude::*;
use std::time::Duration;

/// Single entry point for pathfinding. Construct it explicitly and hand it
/// to whoever needs paths; inside a Bevy app it lives as a resource.
#[derive(Resource, Debug)]
pub struct PathService {
    config: PathfindingConfig,
    grid: Option<GridIndex>,
    registry: ObstacleRegistry,
    engine: PathfindingEngine,
    refresh_timer: Timer,
    running: bool,
    refresh_pending: bool,
}

impl PathService {
    /// Validate `config` without building the grid yet
    pub fn new(config: PathfindingConfig) -> GridResult<Self> {
        config.check()?;

        let refresh_timer = Timer::from_seconds(config.refresh_interval_secs, TimerMode::Repeating);
        Ok(Self {
            config,
            grid: None,
            registry: ObstacleRegistry::new(),
            engine: PathfindingEngine::new(),
            refresh_timer,
            running: false,
            refresh_pending: false,
        })
    }

    /// Validate `config` and, if it carries bounds, build the grid
    pub fn from_config(config: PathfindingConfig) -> GridResult<Self> {
        let bounds = config.bounds;
        let mut service = Self::new(config)?;
        if let Some(bounds) = bounds {
            service.initialize(bounds)?;
        }
        Ok(service)
    }

    /// Build the grid. May only happen once.
    pub fn initialize(&mut self, bounds: GridBounds) -> GridResult<()> {
        if let Some(grid) = &self.grid {
            return Err(GridError::configuration(format!(
                "grid already initialized with bounds {} .. {}",
                grid.bounds().min,
                grid.bounds().max
            )));
        }

        self.grid = Some(GridIndex::build(bounds)?);
        self.config.bounds = Some(bounds);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.grid.is_some()
    }

    pub fn config(&self) -> &PathfindingConfig {
        &self.config
    }

    pub fn grid(&self) -> Option<&GridIndex> {
        self.grid.as_ref()
    }

    pub fn bounds(&self) -> Option<GridBounds> {
        self.grid.as_ref().map(GridIndex::bounds)
    }

    pub fn registry(&self) -> &ObstacleRegistry {
        &self.registry
    }

    /// Replace the predicate deciding which sources count as obstacles
    pub fn set_obstacle_filter(&mut self, filter: ObstacleFilter) {
        self.registry.set_filter(filter);
    }

    /// Arm the refresh schedule; the next tick refreshes immediately
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.refresh_pending = true;
        self.refresh_timer.reset();
        info!(
            "Path service started, refreshing obstacles every {:.2}s",
            self.config.refresh_interval_secs
        );
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.refresh_pending = false;
        info!("Path service stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the refresh schedule by `delta`; true when a refresh is due
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.running {
            return false;
        }

        self.refresh_timer.tick(delta);
        let due = self.refresh_pending || self.refresh_timer.just_finished();
        self.refresh_pending = false;
        due
    }

    /// Rebuild walkability from `obstacles`. A failed refresh leaves the
    /// previous walkability in place.
    pub fn refresh<'a, O, I>(&mut self, obstacles: I) -> GridResult<RefreshStats>
    where
        O: Obstacle + 'a,
        I: IntoIterator<Item = &'a O>,
    {
        let grid = self.grid.as_mut().ok_or_else(not_initialized)?;
        self.registry.refresh(grid, obstacles)
    }

    /// Shortest path from `start` to `end`, excluding `start`.
    /// Empty when no path exists.
    pub fn find_path(&mut self, start: Cell, end: Cell) -> GridResult<GridPath> {
        let grid = self.grid.as_mut().ok_or_else(not_initialized)?;
        self.engine.find_path(grid, start, end)
    }

    /// First cell to step onto when walking from `start` to `end`
    pub fn next_step(&mut self, start: Cell, end: Cell) -> GridResult<Option<Cell>> {
        Ok(self.find_path(start, end)?.first().copied())
    }

    pub fn is_walkable(&self, cell: Cell) -> GridResult<bool> {
        let grid = self.grid.as_ref().ok_or_else(not_initialized)?;
        if !grid.contains(cell) {
            return Err(GridError::InvalidCell { cell });
        }
        Ok(grid.is_walkable(cell))
    }

    pub fn last_search_stats(&self) -> SearchStats {
        self.engine.last_stats()
    }
}

fn not_initialized() -> GridError {
    GridError::configuration("grid not initialized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::obstacles::GridFootprint;

    fn service_5x5() -> PathService {
        PathService::from_config(PathfindingConfig::with_bounds(GridBounds::from_size(5, 5))).unwrap()
    }

    #[test]
    fn test_two_phase_initialization() {
        let mut service = PathService::new(PathfindingConfig::default()).unwrap();
        assert!(!service.is_initialized());

        let err = service.find_path(Cell::new(0, 0), Cell::new(1, 0)).unwrap_err();
        assert!(matches!(err, GridError::Configuration { .. }));

        service.initialize(GridBounds::from_size(5, 5)).unwrap();
        assert_eq!(service.bounds(), Some(GridBounds::from_size(5, 5)));
        assert_eq!(service.find_path(Cell::new(0, 0), Cell::new(1, 0)).unwrap().len(), 1);

        // Grid coverage never changes
        assert!(service.initialize(GridBounds::from_size(9, 9)).is_err());
        assert_eq!(service.bounds(), Some(GridBounds::from_size(5, 5)));
    }

    #[test]
    fn test_degenerate_bounds_fail_initialization() {
        let mut service = PathService::new(PathfindingConfig::default()).unwrap();
        let err = service
            .initialize(GridBounds::new(Cell::new(3, 0), Cell::new(3, 5)))
            .unwrap_err();
        assert!(matches!(err, GridError::Configuration { .. }));
        assert!(!service.is_initialized());
    }

    #[test]
    fn test_refresh_before_initialize_fails() {
        let mut service = PathService::new(PathfindingConfig::default()).unwrap();
        let footprints: Vec<GridFootprint> = Vec::new();
        assert!(service.refresh(&footprints).is_err());
    }

    #[test]
    fn test_schedule_refreshes_immediately_then_on_interval() {
        let mut service = service_5x5();
        assert!(!service.tick(Duration::from_secs(5)));

        service.start();
        assert!(service.is_running());
        assert!(service.tick(Duration::ZERO));
        assert!(!service.tick(Duration::from_millis(400)));
        assert!(!service.tick(Duration::from_millis(400)));
        assert!(service.tick(Duration::from_millis(400)));

        service.stop();
        assert!(!service.tick(Duration::from_secs(3)));
    }

    #[test]
    fn test_wall_gap_scenario() {
        let mut service = service_5x5();
        let wall: Vec<GridFootprint> = (0..5)
            .filter(|y| *y != 2)
            .map(|y| GridFootprint::single(Cell::new(2, y)))
            .collect();
        service.refresh(&wall).unwrap();

        let path = service.find_path(Cell::new(0, 0), Cell::new(4, 4)).unwrap();
        assert!(path.contains(&Cell::new(2, 2)));
        assert_eq!(path.last(), Some(&Cell::new(4, 4)));
    }

    #[test]
    fn test_requery_after_world_change() {
        let mut service = service_5x5();
        let mut door = GridFootprint::new(Cell::new(0, 2), Cell::new(5, 1));
        service.refresh([&door]).unwrap();
        assert!(service.find_path(Cell::new(0, 0), Cell::new(0, 4)).unwrap().is_empty());

        door.set_blocking(false);
        service.refresh([&door]).unwrap();
        let path = service.find_path(Cell::new(0, 0), Cell::new(0, 4)).unwrap();
        assert_eq!(path.len(), 4);
        assert!(service.is_walkable(Cell::new(0, 2)).unwrap());
    }

    #[test]
    fn test_swapped_obstacle_filter_applies_on_next_refresh() {
        let mut service = service_5x5();
        let footprints = vec![
            GridFootprint::single(Cell::new(1, 1)),
            GridFootprint::new(Cell::new(3, 3), Cell::new(2, 2)).passable(),
        ];

        service.refresh(&footprints).unwrap();
        assert!(!service.is_walkable(Cell::new(1, 1)).unwrap());
        assert!(service.is_walkable(Cell::new(3, 3)).unwrap());

        // Everything blocks, even passable objects
        service.set_obstacle_filter(Box::new(|_: &dyn Obstacle| true));
        let stats = service.refresh(&footprints).unwrap();
        assert_eq!(stats.sources_blocking, 2);
        assert!(!service.is_walkable(Cell::new(4, 4)).unwrap());
        assert_eq!(service.registry().last_obstacles().len(), 5);
    }

    #[test]
    fn test_runaway_footprint_keeps_previous_grid() {
        let mut service = service_5x5();
        service.refresh([&GridFootprint::single(Cell::new(2, 2))]).unwrap();

        let runaway = GridFootprint::new(Cell::new(0, 0), Cell::new(100_000, 100_000));
        assert!(matches!(
            service.refresh([&runaway]),
            Err(GridError::InvalidFootprint { .. })
        ));
        assert!(!service.is_walkable(Cell::new(2, 2)).unwrap());
        assert_eq!(service.find_path(Cell::new(0, 0), Cell::new(4, 4)).unwrap().len(), 8);
    }

    #[test]
    fn test_query_on_grid_at_i32_edge() {
        let bounds = GridBounds::new(Cell::new(i32::MIN, 0), Cell::new(i32::MIN + 3, 3));
        let mut service = PathService::from_config(PathfindingConfig::with_bounds(bounds)).unwrap();
        let path = service
            .find_path(Cell::new(i32::MIN, 0), Cell::new(i32::MIN + 2, 2))
            .unwrap();
        assert_eq!(path.last(), Some(&Cell::new(i32::MIN + 2, 2)));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_next_step() {
        let mut service = service_5x5();
        assert_eq!(
            service.next_step(Cell::new(0, 0), Cell::new(0, 3)).unwrap(),
            Some(Cell::new(0, 1))
        );
        assert_eq!(service.next_step(Cell::new(2, 2), Cell::new(2, 2)).unwrap(), None);
        assert!(service.next_step(Cell::new(0, 0), Cell::new(7, 7)).is_err());
    }

    #[test]
    fn test_is_walkable_rejects_unknown_cells() {
        let service = service_5x5();
        assert!(service.is_walkable(Cell::new(4, 4)).unwrap());
        assert!(matches!(
            service.is_walkable(Cell::new(5, 4)),
            Err(GridError::InvalidCell { .. })
        ));
    }
}
