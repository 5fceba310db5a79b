#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic steering system that picks a cardinal step for each agent.
//!
//! Steering never mutates the pathfinding state. Every pseudo-random choice is
//! derived from the tick counter and the agent identifier, so replaying the
//! same inputs always yields the same directions.

use arena_core::{AgentId, Direction, Point, Rect, Steer, Tick};
use arena_world::{query, PathfindingState, Predecessor};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1_442_695_040_888_963_407;
const ROLL_ROUNDS: usize = 3;
const AXIS_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

const DEFAULT_STEP_LENGTH: f64 = 1.0;
const DEFAULT_JITTER_WINDOW: u64 = 16;
const DEFAULT_BEELINE_WANDER_ODDS: u64 = 16;
const DEFAULT_BLIND_WANDER_ODDS: u64 = 4;

/// Tuning parameters for steering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    step_length: f64,
    jitter_window: u64,
    beeline_wander_odds: u64,
    blind_wander_odds: u64,
}

impl Config {
    /// Creates a configuration with the default tuning.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step_length: DEFAULT_STEP_LENGTH,
            jitter_window: DEFAULT_JITTER_WINDOW,
            beeline_wander_odds: DEFAULT_BEELINE_WANDER_ODDS,
            blind_wander_odds: DEFAULT_BLIND_WANDER_ODDS,
        }
    }

    /// Overrides the distance an agent covers in one step.
    #[must_use]
    pub const fn with_step_length(mut self, step_length: f64) -> Self {
        self.step_length = step_length;
        self
    }

    /// Overrides the number of ticks that share a single wander decision.
    #[must_use]
    pub const fn with_jitter_window(mut self, jitter_window: u64) -> Self {
        self.jitter_window = jitter_window;
        self
    }

    /// Overrides the wander odds (one in `odds` windows) used while the agent
    /// can see the target and while it cannot. Zero disables wandering.
    #[must_use]
    pub const fn with_wander_odds(mut self, beeline: u64, blind: u64) -> Self {
        self.beeline_wander_odds = beeline;
        self.blind_wander_odds = blind;
        self
    }

    /// Disables wandering entirely.
    #[must_use]
    pub const fn without_jitter(self) -> Self {
        self.with_wander_odds(0, 0)
    }

    /// Distance covered by one step.
    #[must_use]
    pub const fn step_length(&self) -> f64 {
        self.step_length
    }

    /// Ticks that share a single wander decision.
    #[must_use]
    pub const fn jitter_window(&self) -> u64 {
        self.jitter_window
    }

    /// Wander odds while the target is in sight.
    #[must_use]
    pub const fn beeline_wander_odds(&self) -> u64 {
        self.beeline_wander_odds
    }

    /// Wander odds while the target is out of sight.
    #[must_use]
    pub const fn blind_wander_odds(&self) -> u64 {
        self.blind_wander_odds
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure system that answers per-tick steering queries.
#[derive(Clone, Debug, Default)]
pub struct Steering {
    config: Config,
}

impl Steering {
    /// Creates a steering system using the supplied tuning.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Tuning used by this system.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Chooses the direction `agent_box` should step during `tick`.
    ///
    /// Returns [`Steer::Blocked`] when every cardinal step would overlap an
    /// obstacle or leave the map.
    #[must_use]
    pub fn travel_direction(
        &self,
        state: &PathfindingState,
        agent_box: &Rect,
        agent_id: AgentId,
        tick: Tick,
    ) -> Steer {
        let target = query::target_position(state);
        let beeline = sees_from_every_corner(state, agent_box, target);
        let goal = if beeline {
            target
        } else {
            waypoint(state, agent_box.center(), target)
        };

        if let Some(direction) = self.wander(state, agent_box, agent_id, tick, beeline) {
            return Steer::Move(direction);
        }

        let center = agent_box.center();
        let dx = goal.x - center.x;
        let dy = goal.y - center.y;
        let horizontal = if dx < 0.0 {
            Direction::West
        } else {
            Direction::East
        };
        let vertical = if dy < 0.0 {
            Direction::North
        } else {
            Direction::South
        };

        let threshold = unit_interval(roll(tick.get() ^ AXIS_SALT, agent_id));
        let (primary, secondary) = if threshold * (dx.abs() + dy.abs()) < dx.abs() {
            (horizontal, vertical)
        } else {
            (vertical, horizontal)
        };

        let mut fallback = None;
        for direction in [
            primary,
            secondary,
            primary.opposite(),
            secondary.opposite(),
        ] {
            let moved = self.stepped(agent_box, direction);
            if !is_legal(state, &moved) {
                continue;
            }
            if sees_from_every_corner(state, &moved, goal) {
                return Steer::Move(direction);
            }
            if fallback.is_none() {
                fallback = Some(direction);
            }
        }

        fallback.map_or(Steer::Blocked, Steer::Move)
    }

    /// Point the agent is currently heading for.
    ///
    /// This is the tracked target when every corner of the agent sees it, and
    /// otherwise the nearest visible graph node or the next hop after it.
    #[must_use]
    pub fn navigation_target(&self, state: &PathfindingState, agent_box: &Rect) -> Point {
        let target = query::target_position(state);
        if sees_from_every_corner(state, agent_box, target) {
            target
        } else {
            waypoint(state, agent_box.center(), target)
        }
    }

    fn wander(
        &self,
        state: &PathfindingState,
        agent_box: &Rect,
        agent_id: AgentId,
        tick: Tick,
        beeline: bool,
    ) -> Option<Direction> {
        let odds = if beeline {
            self.config.beeline_wander_odds
        } else {
            self.config.blind_wander_odds
        };
        if odds == 0 {
            return None;
        }

        let window = tick.get() / self.config.jitter_window.max(1);
        let value = roll(window, agent_id);
        if u64::from(value) % odds != 0 {
            return None;
        }

        let direction = Direction::ALL[(value >> 30) as usize];
        is_legal(state, &self.stepped(agent_box, direction)).then_some(direction)
    }

    fn stepped(&self, agent_box: &Rect, direction: Direction) -> Rect {
        let step = self.config.step_length;
        agent_box.translated(direction.unit().scaled(step, step))
    }
}

/// Next point to walk toward when the target itself is out of sight.
fn waypoint(state: &PathfindingState, center: Point, target: Point) -> Point {
    let Some(node) =
        query::nearest_visible_node(state, center).and_then(|index| query::node(state, index))
    else {
        return target;
    };

    let next_hop = match node.predecessor() {
        Predecessor::Node(next) => query::node(state, next).map(|next| next.position()),
        Predecessor::Target => Some(target),
        Predecessor::Unreached => None,
    };

    match next_hop {
        Some(next) if query::line_of_sight(state, center, next) => next,
        _ => node.position(),
    }
}

fn sees_from_every_corner(state: &PathfindingState, rect: &Rect, point: Point) -> bool {
    rect.corners()
        .into_iter()
        .all(|corner| query::line_of_sight(state, corner, point))
}

fn is_legal(state: &PathfindingState, rect: &Rect) -> bool {
    query::within_bounds(state, rect) && query::is_valid_box_location(state, rect)
}

/// Pure pseudo-random value for an epoch and agent.
fn roll(epoch: u64, agent_id: AgentId) -> u32 {
    let mut value = epoch ^ u64::from(agent_id.get()).rotate_left(32);
    for _ in 0..ROLL_ROUNDS {
        value = value
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
    }
    (value >> 32) as u32
}

fn unit_interval(value: u32) -> f64 {
    f64::from(value) / (f64::from(u32::MAX) + 1.0)
}
