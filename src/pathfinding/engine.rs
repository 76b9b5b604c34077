//! A* search over a [`GridIndex`]

use crate::errors::{GridError, GridResult};
use crate::pathfinding::grid_index::{GridIndex, NodeState};
use crate::pathfinding::{Cell, Cost, GridPath};
use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Uniform cost of one orthogonal move
pub const STEP_COST: Cost = 1;

/// Counters from the most recent query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Nodes moved from open to closed
    pub expanded: usize,
    pub path_len: usize,
    pub found: bool,
}

/// Open-set entry. Ordered as a min-heap on f, then h, then insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f_cost: Cost,
    h_cost: Cost,
    g_cost: Cost,
    seq: u64,
    index: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for BinaryHeap's max-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable A* engine. The heap allocation survives between queries, its
/// contents never do.
#[derive(Debug, Default)]
pub struct PathfindingEngine {
    open: BinaryHeap<OpenEntry>,
    /// Neighbor cells and slots of the node being expanded
    neighbors: Vec<(Cell, usize)>,
    next_seq: u64,
    last_stats: SearchStats,
}

impl PathfindingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Shortest 4-connected path from `start` to `end`.
    ///
    /// The result excludes `start` and ends with `end`. An empty path means
    /// `end` is unreachable (or equal to `start`); that is not an error.
    /// `start` itself may be unwalkable so an agent can leave its own cell.
    pub fn find_path(&mut self, grid: &mut GridIndex, start: Cell, end: Cell) -> GridResult<GridPath> {
        let start_index = grid
            .index_of(start)
            .ok_or(GridError::InvalidCell { cell: start })?;
        let end_index = grid.index_of(end).ok_or(GridError::InvalidCell { cell: end })?;

        grid.reset_search_state();
        self.open.clear();
        self.next_seq = 0;
        self.last_stats = SearchStats::default();

        if start != end && !grid.node_at(end_index).walkable {
            debug!("Pathfinding: target {end} is blocked, no path from {start}");
            return Ok(Vec::new());
        }

        let start_h = start.manhattan_distance(end);
        grid.open_node(start_index, 0, start_h, None);
        self.push(start_index, 0, start_h);

        while let Some(entry) = self.open.pop() {
            let node = grid.node_at(entry.index);
            if node.state != NodeState::Open || node.g_cost != entry.g_cost {
                continue; // superseded entry
            }

            grid.close_node(entry.index);
            self.last_stats.expanded += 1;
            let current = grid.cell_at(entry.index);

            if entry.index == end_index {
                let path = Self::retrace(grid, start, end);
                self.last_stats.found = true;
                self.last_stats.path_len = path.len();
                debug!(
                    "Pathfinding: {start} -> {end} found {} steps, expanded {} nodes",
                    path.len(),
                    self.last_stats.expanded
                );
                return Ok(path);
            }

            self.neighbors.clear();
            self.neighbors.extend(
                grid.neighbors_of(current)
                    .filter_map(|neighbor| grid.index_of(neighbor).map(|index| (neighbor, index))),
            );

            for i in 0..self.neighbors.len() {
                let (neighbor, neighbor_index) = self.neighbors[i];
                let neighbor_node = grid.node_at(neighbor_index);
                if !neighbor_node.walkable || neighbor_node.state == NodeState::Closed {
                    continue;
                }

                let candidate_g = entry.g_cost + STEP_COST;
                if neighbor_node.state == NodeState::Open && neighbor_node.g_cost <= candidate_g {
                    continue;
                }

                let h_cost = neighbor.manhattan_distance(end);
                grid.open_node(neighbor_index, candidate_g, h_cost, Some(current));
                self.push(neighbor_index, candidate_g, h_cost);
            }
        }

        debug!(
            "Pathfinding: {start} -> {end} unreachable, expanded {} nodes",
            self.last_stats.expanded
        );
        Ok(Vec::new())
    }

    fn push(&mut self, index: usize, g_cost: Cost, h_cost: Cost) {
        self.open.push(OpenEntry {
            f_cost: g_cost + h_cost,
            h_cost,
            g_cost,
            seq: self.next_seq,
            index,
        });
        self.next_seq += 1;
    }

    /// Follow parent links back from `end`, excluding `start`
    fn retrace(grid: &GridIndex, start: Cell, end: Cell) -> GridPath {
        let mut path = Vec::new();
        let mut current = end;

        while current != start {
            path.push(current);
            match grid.node(current).and_then(|node| node.parent) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        path.reverse();
        path
    }
}
