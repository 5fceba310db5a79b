#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that schedules hostile agents from elapsed time.

use std::time::Duration;

use arena_core::{AgentId, Faction, Point};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Spawn cadence and generator seed.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    interval: Duration,
    seed: u64,
}

impl Config {
    /// Spawns one agent every `interval`, choosing spawn points from `seed`.
    #[must_use]
    pub const fn new(interval: Duration, seed: u64) -> Self {
        Self { interval, seed }
    }

    /// Time between consecutive spawns.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

/// Request for the game loop to place a new agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    /// Identifier the new agent should carry.
    pub id: AgentId,
    /// Spawn point the agent appears at.
    pub point: Point,
    /// Allegiance of the new agent.
    pub faction: Faction,
}

/// Scheduler that turns explicitly supplied elapsed time into spawn requests.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    pending: Duration,
    state: u64,
    issued: u32,
}

impl Spawning {
    /// Creates a scheduler with nothing pending and no agents issued.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pending: Duration::ZERO,
            state: config.seed,
            issued: 0,
        }
    }

    /// Advances the schedule by `dt` and emits one request per elapsed interval.
    ///
    /// Leftover time carries over to the next call. Nothing is emitted and
    /// time does not accumulate while no spawn point is available.
    pub fn handle(&mut self, dt: Duration, spawners: &[Point], out: &mut Vec<SpawnRequest>) {
        if self.config.interval.is_zero() || spawners.is_empty() {
            return;
        }

        self.pending = self.pending.saturating_add(dt);
        while let Some(rest) = self.pending.checked_sub(self.config.interval) {
            self.pending = rest;
            out.push(self.next_request(spawners));
        }
    }

    /// Drops any partially elapsed interval, e.g. when the round restarts.
    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }

    /// Time accumulated toward the next spawn.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.pending
    }

    /// Number of requests emitted so far.
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.issued
    }

    fn next_request(&mut self, spawners: &[Point]) -> SpawnRequest {
        self.state = self
            .state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        let slot = ((self.state >> 33) % spawners.len() as u64) as usize;

        let request = SpawnRequest {
            id: AgentId::new(self.issued),
            point: spawners[slot],
            faction: Faction::Hostile,
        };
        self.issued = self.issued.wrapping_add(1);
        request
    }
}
