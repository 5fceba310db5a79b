#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Offline builder that turns an obstacle bitmap into a navigable map description.
//!
//! The builder runs once per map, outside the game loop. It covers obstacle
//! pixels with rectangles, seeds graph nodes until every walkable pixel is
//! visible from some node, grows the graph with reproducible random samples
//! until every node has enough neighbours, prunes over-connected nodes, and
//! finally checks that the result is connected.

mod decompose;
mod graph;
mod raster;

use arena_core::{GeometryError, MapDescription, Point};
use thiserror::Error;

pub use raster::{MalformedInputError, Pixel, Raster};

const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;
const DEFAULT_MIN_SEPARATION: f64 = 4.0;
const DEFAULT_MIN_DEGREE: usize = 3;
const DEFAULT_MAX_DEGREE: usize = 5;
const DEFAULT_MAX_ITERATIONS: u64 = 200_000;

/// Errors that abort a build.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BuildError {
    /// The source bitmap was rejected.
    #[error(transparent)]
    Malformed(#[from] MalformedInputError),
    /// An obstacle rectangle could not be represented.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Random growth gave up before every node reached the minimum degree.
    #[error("graph growth exceeded {iterations} samples with {nodes} nodes placed")]
    GraphConstructionTimeout {
        /// Samples drawn before giving up.
        iterations: u64,
        /// Nodes placed at that point.
        nodes: usize,
    },
    /// Some nodes cannot be reached from the first node.
    #[error("graph is disconnected: {reachable} of {total} nodes reachable from node 0")]
    Disconnected {
        /// Nodes reachable from node 0.
        reachable: usize,
        /// Total nodes in the graph.
        total: usize,
    },
}

/// Tuning parameters for graph construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    seed: u64,
    min_separation: f64,
    min_degree: usize,
    max_degree: usize,
    max_iterations: u64,
}

impl Config {
    /// Creates a configuration with the default tuning.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seed: DEFAULT_SEED,
            min_separation: DEFAULT_MIN_SEPARATION,
            min_degree: DEFAULT_MIN_DEGREE,
            max_degree: DEFAULT_MAX_DEGREE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Overrides the seed of the sampling generator.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the minimum distance between a sampled node and existing nodes.
    #[must_use]
    pub const fn with_min_separation(mut self, min_separation: f64) -> Self {
        self.min_separation = min_separation;
        self
    }

    /// Overrides the number of samples drawn before growth times out.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Overrides the degree every node must reach during growth.
    #[must_use]
    pub const fn with_min_degree(mut self, min_degree: usize) -> Self {
        self.min_degree = min_degree;
        self
    }

    /// Overrides the degree above which pruning removes edges.
    #[must_use]
    pub const fn with_max_degree(mut self, max_degree: usize) -> Self {
        self.max_degree = max_degree;
        self
    }

    /// Seed of the sampling generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Minimum distance between nodes placed during growth.
    #[must_use]
    pub const fn min_separation(&self) -> f64 {
        self.min_separation
    }

    /// Degree every node must reach during growth.
    #[must_use]
    pub const fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Degree above which pruning removes edges.
    #[must_use]
    pub const fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Samples drawn before growth times out.
    #[must_use]
    pub const fn max_iterations(&self) -> u64 {
        self.max_iterations
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Offline system that converts rasters into map descriptions.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    config: Config,
}

impl GraphBuilder {
    /// Creates a builder using the supplied tuning.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Tuning used by this builder.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Decodes a binary PPM file and builds its map description.
    pub fn build_ppm(&self, bytes: &[u8]) -> Result<MapDescription, BuildError> {
        let raster = Raster::parse_ppm(bytes)?;
        self.build(&raster)
    }

    /// Builds the map description for a classified raster.
    pub fn build(&self, raster: &Raster) -> Result<MapDescription, BuildError> {
        let bounds = decompose::decompose(raster)?;
        log::info!(
            "covered {}x{} bitmap obstacles with {} rectangles",
            raster.width(),
            raster.height(),
            bounds.len()
        );

        let mut draft = graph::GraphDraft::default();
        graph::seed_coverage(raster, &bounds, &mut draft);
        let seeds = draft.len();
        log::info!("seeded {seeds} nodes covering every walkable pixel");

        let iterations = graph::grow(raster, &bounds, &self.config, &mut draft)?;
        log::info!(
            "grew graph to {} nodes in {iterations} samples",
            draft.len()
        );

        let pruned = graph::prune(&self.config, &mut draft);
        log::debug!("pruned {pruned} edges above degree {}", self.config.max_degree);

        let total = draft.len();
        let reachable = graph::reachable_from_first(&draft);
        if reachable != total {
            return Err(BuildError::Disconnected { reachable, total });
        }

        let (spawn_x, spawn_y) = raster.primary_spawn();
        Ok(MapDescription {
            width: raster.width() as f64,
            height: raster.height() as f64,
            primary_spawn: Point::new(spawn_x as f64, spawn_y as f64),
            secondary_spawns: raster
                .secondary_spawns()
                .iter()
                .map(|&(x, y)| Point::new(x as f64, y as f64))
                .collect(),
            bounds,
            graph: draft.into_records(),
        })
    }
}
