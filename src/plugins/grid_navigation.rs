use crate::config::PathfindingConfig;
use crate::pathfinding::{Cell, GridFootprint, PathService};
use bevy::prelude::*;

/// Inserts a [`PathService`] and keeps its grid in sync with every
/// [`GridFootprint`] in the world.
pub struct PathfindingPlugin {
    pub config: PathfindingConfig,
}

impl PathfindingPlugin {
    pub fn new(config: PathfindingConfig) -> Self {
        Self { config }
    }
}

impl Plugin for PathfindingPlugin {
    fn build(&self, app: &mut App) {
        match PathService::from_config(self.config.clone()) {
            Ok(mut service) => {
                if self.config.autostart {
                    service.start();
                }
                app.insert_resource(service);
            }
            Err(err) => error!("Pathfinding disabled, invalid configuration: {err}"),
        }

        app.add_event::<PathBlocked>()
            .add_event::<DestinationReached>()
            .add_systems(Update, (refresh_obstacle_grid, advance_grid_walkers).chain());
    }
}

/// Moves an entity across the grid one cell at a time
#[derive(Component, Debug, Clone)]
pub struct GridWalker {
    pub cell: Cell,
    pub destination: Option<Cell>,
    step_timer: Timer,
}

impl GridWalker {
    pub fn new(cell: Cell, step_secs: f32) -> Self {
        Self {
            cell,
            destination: None,
            step_timer: Timer::from_seconds(step_secs, TimerMode::Repeating),
        }
    }

    pub fn from_config(cell: Cell, config: &PathfindingConfig) -> Self {
        Self::new(cell, config.walker_step_secs)
    }

    pub fn walk_to(&mut self, destination: Cell) {
        self.destination = Some(destination);
        self.step_timer.reset();
    }

    pub fn stop(&mut self) {
        self.destination = None;
    }

    pub fn is_moving(&self) -> bool {
        self.destination.is_some()
    }
}

/// A walker gave up because its destination could not be reached
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct PathBlocked {
    pub entity: Entity,
    pub from: Cell,
    pub to: Cell,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct DestinationReached {
    pub entity: Entity,
    pub cell: Cell,
}

/// Rebuild walkability from all footprints whenever the schedule says so
pub fn refresh_obstacle_grid(
    time: Res<Time>,
    service: Option<ResMut<PathService>>,
    footprints: Query<&GridFootprint>,
) {
    let Some(mut service) = service else {
        return;
    };
    if !service.is_initialized() || !service.tick(time.delta()) {
        return;
    }

    // The registry logs every failed cycle; the grid keeps its last state
    let _ = service.refresh(footprints.iter());
}

/// Step walkers toward their destinations, re-querying every step so they
/// react to obstacles that appeared mid-route
pub fn advance_grid_walkers(
    time: Res<Time>,
    service: Option<ResMut<PathService>>,
    mut walkers: Query<(Entity, &mut GridWalker, Option<&mut GridFootprint>)>,
    mut blocked: EventWriter<PathBlocked>,
    mut reached: EventWriter<DestinationReached>,
) {
    let Some(mut service) = service else {
        return;
    };
    if !service.is_initialized() {
        return;
    }

    for (entity, mut walker, footprint) in &mut walkers {
        let Some(destination) = walker.destination else {
            continue;
        };

        if walker.cell == destination {
            walker.destination = None;
            reached.write(DestinationReached {
                entity,
                cell: destination,
            });
            continue;
        }

        walker.step_timer.tick(time.delta());
        if !walker.step_timer.just_finished() {
            continue;
        }

        let from = walker.cell;
        match service.next_step(from, destination) {
            Ok(Some(step)) => {
                walker.cell = step;
                if let Some(mut footprint) = footprint {
                    footprint.origin = step;
                }
                if step == destination {
                    walker.destination = None;
                    reached.write(DestinationReached { entity, cell: step });
                }
            }
            Ok(None) => {
                debug!("Walker {entity:?} has no path from {from} to {destination}");
                walker.destination = None;
                blocked.write(PathBlocked {
                    entity,
                    from,
                    to: destination,
                });
            }
            Err(err) => {
                warn!("Walker {entity:?} cannot path from {from} to {destination}: {err}");
                walker.destination = None;
                blocked.write(PathBlocked {
                    entity,
                    from,
                    to: destination,
                });
            }
        }
    }
}
