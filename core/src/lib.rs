#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the arena navigation engine.
//!
//! This crate defines the value types that connect the offline graph builder,
//! the authoritative pathfinding state, and the pure steering systems. The
//! builder emits a [`MapDescription`], the world crate loads it once per map,
//! and systems answer per-tick queries with [`Steer`] values derived purely
//! from their inputs.

mod geometry;
mod map;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

pub use geometry::{has_line_of_sight, GeometryError, Rect};
pub use map::{MapDescription, NodeRecord};

/// Two-dimensional coordinate expressed in map units (pixels of the source bitmap).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downward.
    pub y: f64,
}

impl Point {
    /// Creates a new point from its cartesian components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance between two points.
    #[must_use]
    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Multiplies both components by the provided factors.
    #[must_use]
    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing `y`.
    North,
    /// Movement toward increasing `x`.
    East,
    /// Movement toward increasing `y`.
    South,
    /// Movement toward decreasing `x`.
    West,
}

impl Direction {
    /// Every direction in a fixed order, used when a value selects one deterministically.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset travelled when moving one unit in this direction.
    #[must_use]
    pub const fn unit(self) -> Point {
        match self {
            Self::North => Point::new(0.0, -1.0),
            Self::East => Point::new(1.0, 0.0),
            Self::South => Point::new(0.0, 1.0),
            Self::West => Point::new(-1.0, 0.0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Outcome of a per-tick steering query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Steer {
    /// The agent should advance in the provided direction.
    Move(Direction),
    /// No legal move exists for the agent during this tick.
    Blocked,
}

/// Unique identifier assigned to an agent steered by the navigation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Monotonic simulation tick counter supplied explicitly by the game loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tick(u64);

impl Tick {
    /// Creates a tick counter with the provided value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric tick value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Tick immediately following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Allegiance tag carried by every agent, compared by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The tracked target and anything fighting alongside it.
    Player,
    /// Agents steered toward the tracked target.
    Hostile,
}

impl Faction {
    /// Reports whether an agent of this faction treats `other` as an enemy.
    #[must_use]
    pub const fn is_hostile_to(self, other: Faction) -> bool {
        !matches!(
            (self, other),
            (Faction::Player, Faction::Player) | (Faction::Hostile, Faction::Hostile)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Faction, Point, Tick};

    #[test]
    fn distance_matches_expectation() {
        let origin = Point::new(1.0, 1.0);
        let destination = Point::new(4.0, 5.0);
        assert!((origin.distance_squared(destination) - 25.0).abs() < f64::EPSILON);
        assert!((destination.distance(origin) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn opposite_directions_cancel() {
        for direction in Direction::ALL {
            let sum = direction.unit() + direction.opposite().unit();
            assert_eq!(sum, Point::new(0.0, 0.0), "{direction:?} does not cancel");
        }
    }

    #[test]
    fn factions_are_hostile_only_across_sides() {
        assert!(Faction::Hostile.is_hostile_to(Faction::Player));
        assert!(Faction::Player.is_hostile_to(Faction::Hostile));
        assert!(!Faction::Hostile.is_hostile_to(Faction::Hostile));
        assert!(!Faction::Player.is_hostile_to(Faction::Player));
    }

    #[test]
    fn tick_wraps_instead_of_overflowing() {
        assert_eq!(Tick::new(u64::MAX).next(), Tick::new(0));
        assert_eq!(Tick::new(4).next().get(), 5);
    }
}
