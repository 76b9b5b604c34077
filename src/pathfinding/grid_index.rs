//! Fixed-bounds cell index with per-cell walkability and search records

use crate::errors::{GridError, GridResult};
use crate::pathfinding::{Cell, Cost, GridBounds};
use bevy::prelude::*;

/// Search membership of a node during a single query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// Per-cell record. Cost fields are only meaningful for nodes the current
/// search has touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub walkable: bool,
    pub g_cost: Cost,
    pub h_cost: Cost,
    pub parent: Option<Cell>,
    pub state: NodeState,
}

impl Node {
    fn new_walkable() -> Self {
        Self {
            walkable: true,
            g_cost: 0,
            h_cost: 0,
            parent: None,
            state: NodeState::Unvisited,
        }
    }

    pub fn f_cost(&self) -> Cost {
        self.g_cost + self.h_cost
    }

    fn clear_search(&mut self) {
        self.g_cost = 0;
        self.h_cost = 0;
        self.parent = None;
        self.state = NodeState::Unvisited;
    }
}

/// Dense row-major grid over [`GridBounds`]. The cell set never changes
/// after [`GridIndex::build`].
#[derive(Debug, Clone)]
pub struct GridIndex {
    bounds: GridBounds,
    nodes: Vec<Node>,
    /// Slots written by the current or previous search
    touched: Vec<usize>,
}

impl GridIndex {
    /// Allocate one walkable node per cell in `bounds`
    pub fn build(bounds: GridBounds) -> GridResult<Self> {
        bounds.validate()?;

        let nodes = vec![Node::new_walkable(); bounds.cell_count()];
        info!(
            "Built grid index {}x{} at {} ({} cells)",
            bounds.width(),
            bounds.height(),
            bounds.min,
            nodes.len()
        );

        Ok(Self {
            bounds,
            nodes,
            touched: Vec::new(),
        })
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.bounds.contains(cell)
    }

    /// Slot of `cell`, or None if it is not indexed
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let local_x = (cell.x - self.bounds.min.x) as usize;
        let local_y = (cell.y - self.bounds.min.y) as usize;
        Some(local_y * self.bounds.width() as usize + local_x)
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        let width = self.bounds.width() as usize;
        Cell::new(
            self.bounds.min.x + (index % width) as i32,
            self.bounds.min.y + (index / width) as i32,
        )
    }

    pub fn node(&self, cell: Cell) -> Option<&Node> {
        self.index_of(cell).map(|index| &self.nodes[index])
    }

    pub(crate) fn node_at(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Out-of-grid cells are never walkable
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.node(cell).is_some_and(|node| node.walkable)
    }

    /// No-op for cells outside the index
    pub fn set_walkable(&mut self, cell: Cell, walkable: bool) {
        if let Some(index) = self.index_of(cell) {
            self.nodes[index].walkable = walkable;
        }
    }

    /// Orthogonal neighbors (N, E, S, W) that exist in the index
    pub fn neighbors_of(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.cardinal_neighbors()
            .filter(move |neighbor| self.contains(*neighbor))
    }

    pub fn blocked_count(&self) -> usize {
        self.nodes.iter().filter(|node| !node.walkable).count()
    }

    /// Publish a complete walkability mask in one pass. A mask of the wrong
    /// length is rejected and leaves the grid untouched.
    pub fn replace_walkability(&mut self, mask: Vec<bool>) -> GridResult<()> {
        if mask.len() != self.nodes.len() {
            return Err(GridError::configuration(format!(
                "walkability mask has {} entries, grid has {}",
                mask.len(),
                self.nodes.len()
            )));
        }

        for (node, walkable) in self.nodes.iter_mut().zip(mask) {
            node.walkable = walkable;
        }
        Ok(())
    }

    /// Record a search visit on `index`, remembering it for the next reset
    pub(crate) fn open_node(&mut self, index: usize, g_cost: Cost, h_cost: Cost, parent: Option<Cell>) {
        let node = &mut self.nodes[index];
        if node.state == NodeState::Unvisited {
            self.touched.push(index);
        }
        node.g_cost = g_cost;
        node.h_cost = h_cost;
        node.parent = parent;
        node.state = NodeState::Open;
    }

    pub(crate) fn close_node(&mut self, index: usize) {
        self.nodes[index].state = NodeState::Closed;
    }

    /// Clear cost, parent and membership on every node a prior search touched
    pub fn reset_search_state(&mut self) {
        for index in self.touched.drain(..) {
            self.nodes[index].clear_search();
        }
    }

    /// Number of nodes holding search state from the last query
    pub fn touched_count(&self) -> usize {
        self.touched.len()
    }
}
