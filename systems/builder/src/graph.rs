//! Visibility graph construction over the walkable pixels of a raster.

use std::collections::VecDeque;

use arena_core::{has_line_of_sight, NodeRecord, Point, Rect};

use crate::{raster::Raster, BuildError, Config};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Nodes and undirected adjacency under construction.
#[derive(Clone, Debug, Default)]
pub(crate) struct GraphDraft {
    positions: Vec<Point>,
    adjacency: Vec<Vec<usize>>,
}

impl GraphDraft {
    /// Number of nodes added so far.
    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    fn push(&mut self, position: Point) -> usize {
        self.positions.push(position);
        self.adjacency.push(Vec::new());
        self.positions.len() - 1
    }

    fn connect(&mut self, a: usize, b: usize) {
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    fn disconnect(&mut self, a: usize, b: usize) {
        self.adjacency[a].retain(|&neighbor| neighbor != b);
        self.adjacency[b].retain(|&neighbor| neighbor != a);
    }

    fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    fn length_squared(&self, a: usize, b: usize) -> f64 {
        self.positions[a].distance_squared(self.positions[b])
    }

    /// Serializable node list, neighbours sorted nearest first.
    pub(crate) fn into_records(mut self) -> Vec<NodeRecord> {
        for node in 0..self.adjacency.len() {
            let mut edges = std::mem::take(&mut self.adjacency[node]);
            edges.sort_by(|&a, &b| {
                self.length_squared(node, a)
                    .total_cmp(&self.length_squared(node, b))
                    .then(a.cmp(&b))
            });
            self.adjacency[node] = edges;
        }

        self.positions
            .into_iter()
            .zip(self.adjacency)
            .map(|(position, edges)| NodeRecord {
                x: position.x,
                y: position.y,
                edges,
            })
            .collect()
    }
}

/// Seeds nodes until every walkable pixel is visible from at least one node.
///
/// Seeds are chosen in raster order among pixels no node can see yet.
pub(crate) fn seed_coverage(raster: &Raster, obstacles: &[Rect], draft: &mut GraphDraft) {
    let mut covered: Vec<bool> = raster
        .pixels()
        .iter()
        .map(|pixel| !pixel.is_walkable())
        .collect();

    for seed in 0..covered.len() {
        if covered[seed] {
            continue;
        }

        let position = raster.center_of(seed);
        let _ = draft.push(position);
        covered[seed] = true;

        for other in seed + 1..covered.len() {
            if !covered[other] && has_line_of_sight(obstacles, position, raster.center_of(other))
            {
                covered[other] = true;
            }
        }
    }
}

/// Adds randomly sampled nodes until every node reaches the minimum degree.
///
/// Candidates on obstacles or closer than the minimum separation to an
/// existing node are rejected. Accepted candidates connect to every node they
/// can see. Returns the number of samples drawn.
pub(crate) fn grow(
    raster: &Raster,
    obstacles: &[Rect],
    config: &Config,
    draft: &mut GraphDraft,
) -> Result<u64, BuildError> {
    let mut rng = Lcg::new(config.seed());
    let separation_squared = config.min_separation() * config.min_separation();
    let mut iterations = 0_u64;

    while (0..draft.len()).any(|node| draft.degree(node) < config.min_degree()) {
        if iterations >= config.max_iterations() {
            return Err(BuildError::GraphConstructionTimeout {
                iterations,
                nodes: draft.len(),
            });
        }
        iterations += 1;

        let index = rng.next_index(raster.len());
        if !raster.pixels()[index].is_walkable() {
            continue;
        }

        let candidate = raster.center_of(index);
        if draft
            .positions
            .iter()
            .any(|position| position.distance_squared(candidate) < separation_squared)
        {
            continue;
        }

        let visible: Vec<usize> = draft
            .positions
            .iter()
            .enumerate()
            .filter(|&(_, &position)| has_line_of_sight(obstacles, position, candidate))
            .map(|(node, _)| node)
            .collect();

        let node = draft.push(candidate);
        for neighbor in visible {
            draft.connect(node, neighbor);
        }
    }

    Ok(iterations)
}

/// Drops the longest edges of over-connected nodes.
///
/// An edge is only removed when both endpoints exceed the maximum degree, so
/// pruning never pushes a node below it. Returns the number of edges removed.
pub(crate) fn prune(config: &Config, draft: &mut GraphDraft) -> usize {
    let max_degree = config.max_degree();
    let mut removed = 0;

    for node in 0..draft.len() {
        if draft.degree(node) <= max_degree {
            continue;
        }

        let mut longest_first = draft.adjacency[node].clone();
        longest_first.sort_by(|&a, &b| {
            draft
                .length_squared(node, b)
                .total_cmp(&draft.length_squared(node, a))
                .then(b.cmp(&a))
        });

        for neighbor in longest_first {
            if draft.degree(node) <= max_degree {
                break;
            }
            if draft.degree(neighbor) <= max_degree {
                continue;
            }
            draft.disconnect(node, neighbor);
            removed += 1;
        }
    }

    removed
}

/// Number of nodes reachable from node 0.
pub(crate) fn reachable_from_first(draft: &GraphDraft) -> usize {
    if draft.len() == 0 {
        return 0;
    }

    let mut visited = vec![false; draft.len()];
    let mut queue = VecDeque::from([0]);
    visited[0] = true;
    let mut count = 1;

    while let Some(node) = queue.pop_front() {
        for &neighbor in &draft.adjacency[node] {
            if visited[neighbor] {
                continue;
            }
            visited[neighbor] = true;
            count += 1;
            queue.push_back(neighbor);
        }
    }

    count
}

/// Fixed-seed linear congruential generator so builds are reproducible.
#[derive(Clone, Copy, Debug)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.state = self
            .state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        ((self.state >> 33) % len.max(1) as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decompose::decompose, raster::Pixel};

    fn draft_with(positions: &[(f64, f64)], edges: &[(usize, usize)]) -> GraphDraft {
        let mut draft = GraphDraft::default();
        for &(x, y) in positions {
            let _ = draft.push(Point::new(x, y));
        }
        for &(a, b) in edges {
            draft.connect(a, b);
        }
        draft
    }

    fn open_raster(width: usize, height: usize) -> Raster {
        let mut pixels = vec![Pixel::Background; width * height];
        pixels[0] = Pixel::PrimarySpawn;
        pixels[width * height - 1] = Pixel::SecondarySpawn;
        Raster::from_pixels(width, height, pixels).expect("valid raster")
    }

    #[test]
    fn open_raster_needs_a_single_seed() {
        let mut draft = GraphDraft::default();
        seed_coverage(&open_raster(12, 8), &[], &mut draft);
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.positions[0], Point::new(0.5, 0.5));
    }

    #[test]
    fn wall_forces_seed_on_hidden_side() {
        let rows = ["P...#....", "....#....", "....#....", "....#....", "........S"];
        let pixels = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|symbol| match symbol {
                '#' => Pixel::Obstacle,
                'P' => Pixel::PrimarySpawn,
                'S' => Pixel::SecondarySpawn,
                _ => Pixel::Background,
            })
            .collect();
        let raster = Raster::from_pixels(9, 5, pixels).expect("valid raster");
        let wall = decompose(&raster).expect("valid obstacles");
        assert_eq!(wall, vec![Rect::new(4.0, 0.0, 1.0, 4.0).expect("valid rect")]);
        let mut draft = GraphDraft::default();
        seed_coverage(&raster, &wall, &mut draft);

        assert!(draft.len() >= 2, "one seed cannot see behind the wall");
        let seen_behind = draft.positions.iter().any(|p| p.x > 5.0);
        let seen_front = draft.positions.iter().any(|p| p.x < 4.0);
        assert!(seen_behind && seen_front);
    }

    #[test]
    fn prune_keeps_low_degree_endpoints() {
        // hub 0 connects to six spokes; spokes 5 and 6 are themselves saturated
        let mut positions = vec![(0.0, 0.0)];
        positions.extend((1..=6).map(|i| (f64::from(i), 0.0)));
        positions.extend((0..6).map(|i| (100.0 + f64::from(i), 50.0)));
        let mut edges: Vec<(usize, usize)> = (1..=6).map(|spoke| (0, spoke)).collect();
        for extra in 7..13 {
            edges.push((6, extra));
            edges.push((5, extra));
        }
        let mut draft = draft_with(&positions, &edges);
        let config = Config::default();

        let removed = prune(&config, &mut draft);

        assert!(removed >= 1);
        assert!(draft.degree(0) <= config.max_degree());
        assert!(!draft.adjacency[0].contains(&6), "longest saturated edge dropped");
        assert!(draft.adjacency[0].contains(&1), "low-degree spoke kept");
        for node in 0..draft.len() {
            let before = edges.iter().filter(|(a, b)| *a == node || *b == node).count();
            assert!(
                draft.degree(node) >= before.min(config.max_degree()),
                "node {node} pruned below the maximum"
            );
        }
    }

    #[test]
    fn records_sort_neighbours_nearest_first() {
        let draft = draft_with(
            &[(0.0, 0.0), (9.0, 0.0), (1.0, 0.0), (0.0, 4.0)],
            &[(0, 1), (0, 2), (0, 3)],
        );
        let records = draft.into_records();
        assert_eq!(records[0].edges, vec![2, 3, 1]);
        assert_eq!(records[1].edges, vec![0]);
    }

    #[test]
    fn reachability_counts_connected_component() {
        let draft = draft_with(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (9.0, 9.0)], &[(0, 1), (1, 2)]);
        assert_eq!(reachable_from_first(&draft), 3);
        assert_eq!(reachable_from_first(&GraphDraft::default()), 0);
    }

    #[test]
    fn lcg_is_reproducible() {
        let mut first = Lcg::new(7);
        let mut second = Lcg::new(7);
        let a: Vec<usize> = (0..16).map(|_| first.next_index(100)).collect();
        let b: Vec<usize> = (0..16).map(|_| second.next_index(100)).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|&index| index < 100));
    }
}
