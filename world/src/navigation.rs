//! Visibility graph and the shortest-path tree seeded at the current root.

use arena_core::{has_line_of_sight, NodeRecord, Point, Rect};

use crate::{queue::PriorityQueue, MapError};

/// Link from a node toward the tracked target along the shortest-path tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predecessor {
    /// The node has not been reached from the current root.
    Unreached,
    /// The node is the root itself; the next hop is the tracked target.
    Target,
    /// The next hop is the node with the provided index.
    Node(usize),
}

/// Single node of the visibility graph together with its search state.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    position: Point,
    edges: Vec<usize>,
    distance: f64,
    predecessor: Predecessor,
}

impl GraphNode {
    /// Position of the node in map units.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Indices of adjacent nodes.
    #[must_use]
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// Path cost from the root, or `f64::INFINITY` when unreached.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Next hop toward the tracked target.
    #[must_use]
    pub const fn predecessor(&self) -> Predecessor {
        self.predecessor
    }
}

/// Flat node arena whose adjacency is stored as indices.
///
/// Edges are fixed once built. Only the per-node distance and predecessor
/// change, and only when [`VisibilityGraph::recompute_from`] runs for a new root.
#[derive(Clone, Debug, Default)]
pub struct VisibilityGraph {
    nodes: Vec<GraphNode>,
    root: Option<usize>,
}

impl VisibilityGraph {
    /// Validates serialized nodes and builds the arena.
    ///
    /// Adjacency must be undirected, free of duplicates and self-loops, and
    /// reference existing nodes only.
    pub fn from_records(records: &[NodeRecord]) -> Result<Self, MapError> {
        let len = records.len();

        for (node, record) in records.iter().enumerate() {
            for (slot, &neighbor) in record.edges.iter().enumerate() {
                if neighbor >= len {
                    return Err(MapError::DanglingEdge {
                        node,
                        neighbor,
                        len,
                    });
                }
                if neighbor == node {
                    return Err(MapError::SelfLoop { node });
                }
                if record.edges[..slot].contains(&neighbor) {
                    return Err(MapError::DuplicateEdge { node, neighbor });
                }
                if !records[neighbor].edges.contains(&node) {
                    return Err(MapError::AsymmetricEdge { node, neighbor });
                }
            }
        }

        let nodes = records
            .iter()
            .map(|record| GraphNode {
                position: record.position(),
                edges: record.edges.clone(),
                distance: f64::INFINITY,
                predecessor: Predecessor::Unreached,
            })
            .collect();

        Ok(Self { nodes, root: None })
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node stored at `index`, if any.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    /// All nodes in index order.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Node currently seeding the shortest-path tree.
    #[must_use]
    pub const fn root(&self) -> Option<usize> {
        self.root
    }

    /// Closest node to `point` that has an unobstructed line to it.
    ///
    /// Nodes hidden behind an obstacle are skipped even when numerically
    /// closer. Ties resolve to the lowest index.
    #[must_use]
    pub fn nearest_visible(&self, point: Point, obstacles: &[Rect]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (index, node) in self.nodes.iter().enumerate() {
            let distance = node.position.distance_squared(point);
            if best.is_some_and(|(_, closest)| distance >= closest) {
                continue;
            }
            if !has_line_of_sight(obstacles, node.position, point) {
                continue;
            }
            best = Some((index, distance));
        }

        best.map(|(index, _)| index)
    }

    /// Reruns Dijkstra from `root`, weighting each edge by squared length.
    ///
    /// Out-of-range roots leave the graph untouched.
    pub fn recompute_from(&mut self, root: usize) {
        if root >= self.nodes.len() {
            return;
        }

        for node in &mut self.nodes {
            node.distance = f64::INFINITY;
            node.predecessor = Predecessor::Unreached;
        }
        self.nodes[root].distance = 0.0;
        self.nodes[root].predecessor = Predecessor::Target;
        self.root = Some(root);

        let mut queue = PriorityQueue::new(0..self.nodes.len(), |&index| {
            self.nodes[index].distance
        });

        while let Some((current, distance)) = queue.extract_min() {
            if !distance.is_finite() {
                break;
            }

            let origin = self.nodes[current].position;
            for slot in 0..self.nodes[current].edges.len() {
                let neighbor = self.nodes[current].edges[slot];
                let candidate = distance + origin.distance_squared(self.nodes[neighbor].position);
                if candidate >= self.nodes[neighbor].distance {
                    continue;
                }

                self.nodes[neighbor].distance = candidate;
                self.nodes[neighbor].predecessor = Predecessor::Node(current);
                let _ = queue.notify_priority_changed(neighbor, candidate);
            }
        }
    }

    /// Node indices from `start` to the root following predecessors.
    ///
    /// Empty when `start` is out of range or unreached.
    #[must_use]
    pub fn route(&self, start: usize) -> Vec<usize> {
        let mut route = Vec::new();
        let mut current = start;

        while route.len() < self.nodes.len() {
            let Some(node) = self.nodes.get(current) else {
                return Vec::new();
            };
            route.push(current);
            match node.predecessor {
                Predecessor::Target => return route,
                Predecessor::Node(next) => current = next,
                Predecessor::Unreached => return Vec::new(),
            }
        }

        Vec::new()
    }
}
