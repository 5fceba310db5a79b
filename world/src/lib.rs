#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative pathfinding state for a loaded arena map.
//!
//! A [`PathfindingState`] is created once per map by [`load`]. The game loop
//! then calls [`update_target_box`] whenever the tracked target moves and
//! answers movement validation through the [`query`] functions. Steering
//! systems read the state immutably.

mod navigation;
mod queue;

use arena_core::{GeometryError, MapDescription, Point, Rect};
use thiserror::Error;

pub use navigation::{GraphNode, Predecessor, VisibilityGraph};
pub use queue::PriorityQueue;

/// Errors raised while loading a map description.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum MapError {
    /// A node references an index outside the graph.
    #[error("node {node} references neighbour {neighbor} but the graph has {len} nodes")]
    DanglingEdge {
        /// Node owning the edge.
        node: usize,
        /// Referenced neighbour index.
        neighbor: usize,
        /// Number of nodes in the graph.
        len: usize,
    },
    /// A node lists itself as a neighbour.
    #[error("node {node} lists itself as a neighbour")]
    SelfLoop {
        /// Offending node.
        node: usize,
    },
    /// A node lists the same neighbour twice.
    #[error("node {node} lists neighbour {neighbor} more than once")]
    DuplicateEdge {
        /// Node owning the edge.
        node: usize,
        /// Repeated neighbour index.
        neighbor: usize,
    },
    /// An edge is recorded on one endpoint only.
    #[error("edge {node} -> {neighbor} has no matching edge {neighbor} -> {node}")]
    AsymmetricEdge {
        /// Node owning the edge.
        node: usize,
        /// Neighbour missing the reverse edge.
        neighbor: usize,
    },
    /// The map area has invalid dimensions.
    #[error("invalid map area: {0}")]
    Area(#[from] GeometryError),
}

/// Navigation state owned by a single game session.
#[derive(Clone, Debug)]
pub struct PathfindingState {
    graph: VisibilityGraph,
    obstacles: Vec<Rect>,
    area: Rect,
    primary_spawn: Point,
    secondary_spawns: Vec<Point>,
    target_box: Rect,
}

/// Loads a map description and computes the initial shortest-path tree.
pub fn load(map: MapDescription, target_box: Rect) -> Result<PathfindingState, MapError> {
    let area = map.area()?;
    let graph = VisibilityGraph::from_records(&map.graph)?;
    log::debug!(
        "loaded map {}x{} with {} obstacles and {} nodes",
        area.width(),
        area.height(),
        map.bounds.len(),
        graph.len()
    );

    let mut state = PathfindingState {
        graph,
        obstacles: map.bounds,
        area,
        primary_spawn: map.primary_spawn,
        secondary_spawns: map.secondary_spawns,
        target_box,
    };
    let _ = update_target_box(&mut state, target_box);
    Ok(state)
}

/// Records the tracked target's new hitbox and reroots the graph when needed.
///
/// The shortest-path tree is recomputed only when the closest node with line
/// of sight to the target changes. When no node can see the target the cached
/// root is kept. Returns `true` when the root changed.
pub fn update_target_box(state: &mut PathfindingState, target_box: Rect) -> bool {
    state.target_box = target_box;

    let Some(root) = state
        .graph
        .nearest_visible(target_box.center(), &state.obstacles)
    else {
        return false;
    };

    if state.graph.root() == Some(root) {
        return false;
    }

    log::debug!("rerooting visibility graph at node {root}");
    state.graph.recompute_from(root);
    true
}

/// Query functions that provide read-only access to the pathfinding state.
pub mod query {
    use arena_core::{has_line_of_sight, Point, Rect};

    use super::{GraphNode, PathfindingState, VisibilityGraph};

    /// Reports whether `rect` overlaps no obstacle.
    #[must_use]
    pub fn is_valid_box_location(state: &PathfindingState, rect: &Rect) -> bool {
        !state
            .obstacles
            .iter()
            .any(|obstacle| obstacle.intersects(rect))
    }

    /// Reports whether `rect` lies fully inside the map area.
    #[must_use]
    pub fn within_bounds(state: &PathfindingState, rect: &Rect) -> bool {
        state.area.contains_rect(rect)
    }

    /// Reports whether the segment between two points avoids every obstacle.
    #[must_use]
    pub fn line_of_sight(state: &PathfindingState, from: Point, to: Point) -> bool {
        has_line_of_sight(&state.obstacles, from, to)
    }

    /// Closest node with line of sight to `point`.
    #[must_use]
    pub fn nearest_visible_node(state: &PathfindingState, point: Point) -> Option<usize> {
        state.graph.nearest_visible(point, &state.obstacles)
    }

    /// Most recent hitbox of the tracked target.
    #[must_use]
    pub fn target_box(state: &PathfindingState) -> Rect {
        state.target_box
    }

    /// Point agents steer toward when they can see the target.
    #[must_use]
    pub fn target_position(state: &PathfindingState) -> Point {
        state.target_box.center()
    }

    /// Node currently standing in for the target, if any node can see it.
    #[must_use]
    pub fn root(state: &PathfindingState) -> Option<usize> {
        state.graph.root()
    }

    /// Node stored at `index`.
    #[must_use]
    pub fn node(state: &PathfindingState, index: usize) -> Option<&GraphNode> {
        state.graph.node(index)
    }

    /// The loaded visibility graph.
    #[must_use]
    pub fn graph(state: &PathfindingState) -> &VisibilityGraph {
        &state.graph
    }

    /// Node indices from `start` to the root along the shortest-path tree.
    #[must_use]
    pub fn route(state: &PathfindingState, start: usize) -> Vec<usize> {
        state.graph.route(start)
    }

    /// Solid obstacle rectangles.
    #[must_use]
    pub fn obstacles(state: &PathfindingState) -> &[Rect] {
        &state.obstacles
    }

    /// Rectangle spanning the traversable area.
    #[must_use]
    pub fn area(state: &PathfindingState) -> Rect {
        state.area
    }

    /// Spawn point of the tracked target.
    #[must_use]
    pub fn primary_spawn(state: &PathfindingState) -> Point {
        state.primary_spawn
    }

    /// Spawn points available to hostile agents.
    #[must_use]
    pub fn secondary_spawns(state: &PathfindingState) -> &[Point] {
        &state.secondary_spawns
    }
}
