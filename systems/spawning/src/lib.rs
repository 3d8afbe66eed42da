#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded spawning system responsible for emitting balloon spawn commands.

use std::time::Duration;

use balloon_pop_core::{BalloonSkin, Command, Event, Phase, DEFAULT_SPAWN_INTERVAL, FIELD_SPAN};
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }

    /// Creates a configuration using the standard cadence and the provided seed.
    #[must_use]
    pub const fn with_seed(rng_seed: u64) -> Self {
        Self::new(DEFAULT_SPAWN_INTERVAL, rng_seed)
    }
}

/// Pure system that releases balloons on a fixed cadence while a round is active.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the current phase to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], phase: Phase, out: &mut Vec<Command>) {
        if phase != Phase::Active {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.spawn_interval.is_zero() {
            return;
        }

        for event in events {
            match event {
                Event::RoundStarted => self.accumulator = Duration::ZERO,
                Event::TimeAdvanced { dt } => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                }
                _ => {}
            }
        }

        let spawn_attempts = self.resolve_spawn_attempts();
        for _ in 0..spawn_attempts {
            let horizontal_position = self.rng.gen_range(0..=FIELD_SPAN);
            let skin = self.next_skin();
            trace!("releasing {skin:?} balloon at {horizontal_position}");
            out.push(Command::SpawnBalloon {
                horizontal_position,
                skin,
            });
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }

    fn next_skin(&mut self) -> BalloonSkin {
        let index = self.rng.gen_range(0..BalloonSkin::ALL.len());
        BalloonSkin::ALL[index]
    }
}
