//! Serializable map description exchanged between the builder and the runtime.

use serde::{Deserialize, Serialize};

use crate::{GeometryError, Point, Rect};

/// Snapshot emitted by the offline builder and loaded once per map.
///
/// Keys are serialized in camelCase so the file matches the wire layout
/// `{ width, height, primarySpawn, secondarySpawns, bounds, graph }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDescription {
    /// Width of the traversable area in map units.
    pub width: f64,
    /// Height of the traversable area in map units.
    pub height: f64,
    /// Spawn location of the tracked target.
    pub primary_spawn: Point,
    /// Spawn locations for hostile agents.
    pub secondary_spawns: Vec<Point>,
    /// Solid obstacle rectangles.
    pub bounds: Vec<Rect>,
    /// Visibility graph nodes with undirected adjacency by index.
    pub graph: Vec<NodeRecord>,
}

impl MapDescription {
    /// Rectangle spanning the whole traversable area.
    pub fn area(&self) -> Result<Rect, GeometryError> {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Number of undirected edges stored in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.iter().map(|node| node.edges.len()).sum::<usize>() / 2
    }

    /// Rescales every coordinate, e.g. when the arena is drawn at a different size.
    ///
    /// Non-finite or negative factors surface as a [`GeometryError`] from the
    /// rescaled rectangles instead of producing an inverted map.
    pub fn scaled(&self, sx: f64, sy: f64) -> Result<Self, GeometryError> {
        let bounds = self
            .bounds
            .iter()
            .map(|rect| {
                Rect::new(
                    rect.x() * sx,
                    rect.y() * sy,
                    rect.width() * sx,
                    rect.height() * sy,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let area = Rect::new(0.0, 0.0, self.width * sx, self.height * sy)?;

        Ok(Self {
            width: area.width(),
            height: area.height(),
            primary_spawn: self.primary_spawn.scaled(sx, sy),
            secondary_spawns: self
                .secondary_spawns
                .iter()
                .map(|spawn| spawn.scaled(sx, sy))
                .collect(),
            bounds,
            graph: self
                .graph
                .iter()
                .map(|node| NodeRecord {
                    x: node.x * sx,
                    y: node.y * sy,
                    edges: node.edges.clone(),
                })
                .collect(),
        })
    }
}

/// Serialized graph node: a position plus the indices of its neighbours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Horizontal position of the node.
    pub x: f64,
    /// Vertical position of the node.
    pub y: f64,
    /// Indices of adjacent nodes, nearest first.
    pub edges: Vec<usize>,
}

impl NodeRecord {
    /// Position of the node as a [`Point`].
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
