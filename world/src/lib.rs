#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state management for Balloon Popper.
//!
//! The [`World`] owns the round clock, the score counters and the set of
//! balloons still crossing the play-field. It is mutated exclusively through
//! [`apply`], which reports every observable change as an [`Event`].

use balloon_pop_core::{
    Balloon, BalloonId, BalloonSkin, Command, Event, Phase, RoundSummary, SpeedRamp, FIELD_SPAN,
    POP_REWARD, ROUND_LENGTH_SECS, WELCOME_BANNER,
};
use log::{debug, info};

const INITIAL_SPEED_FACTOR: f64 = 1.0;

/// Represents the authoritative Balloon Popper round state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    phase: Phase,
    time_remaining: u32,
    score: u32,
    popped: u32,
    missed: u32,
    misses_pending: u32,
    spawned: u32,
    balloons: Vec<Balloon>,
    speed_ramp: SpeedRamp,
    speed_factor: f64,
    next_balloon_id: u32,
}

impl World {
    /// Creates a new world on the splash screen using the default speed ramp.
    #[must_use]
    pub fn new() -> Self {
        Self::with_speed_ramp(SpeedRamp::default())
    }

    /// Creates a new world on the splash screen using the provided speed ramp.
    #[must_use]
    pub fn with_speed_ramp(speed_ramp: SpeedRamp) -> Self {
        Self {
            banner: WELCOME_BANNER,
            phase: Phase::Idle,
            time_remaining: ROUND_LENGTH_SECS,
            score: 0,
            popped: 0,
            missed: 0,
            misses_pending: 0,
            spawned: 0,
            balloons: Vec::new(),
            speed_ramp,
            speed_factor: INITIAL_SPEED_FACTOR,
            next_balloon_id: 0,
        }
    }

    fn reset_round(&mut self) {
        self.time_remaining = ROUND_LENGTH_SECS;
        self.score = 0;
        self.popped = 0;
        self.missed = 0;
        self.misses_pending = 0;
        self.spawned = 0;
        self.balloons.clear();
        self.speed_factor = INITIAL_SPEED_FACTOR;
    }

    // Balloon ids keep counting across rounds so stale timeouts never alias.
    fn allocate_balloon_id(&mut self) -> BalloonId {
        let id = BalloonId::new(self.next_balloon_id);
        self.next_balloon_id = self.next_balloon_id.wrapping_add(1);
        id
    }

    fn remove_balloon(&mut self, balloon: BalloonId) -> Option<Balloon> {
        let index = self.balloons.iter().position(|item| item.id() == balloon)?;
        Some(self.balloons.remove(index))
    }

    fn spawn_balloon(&mut self, horizontal_position: u32, skin: BalloonSkin) -> Balloon {
        let id = self.allocate_balloon_id();
        let travel_duration = self.speed_ramp.travel_duration(self.speed_factor);
        self.speed_factor *= self.speed_ramp.growth();
        self.spawned = self.spawned.saturating_add(1);

        let balloon = Balloon::new(
            id,
            horizontal_position.min(FIELD_SPAN),
            skin,
            travel_duration,
        );
        self.balloons.push(balloon);
        balloon
    }

    fn finish_round(&mut self, out_events: &mut Vec<Event>) {
        self.phase = Phase::Over;
        self.missed = self.missed.saturating_add(self.misses_pending);
        self.misses_pending = 0;

        let summary = self.summary();
        info!(
            "round over: score {} popped {} missed {}",
            summary.score, summary.popped, summary.missed
        );
        out_events.push(Event::RoundEnded { summary });
    }

    fn summary(&self) -> RoundSummary {
        RoundSummary {
            score: self.score,
            popped: self.popped,
            missed: self.missed,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that are not valid in the current phase are silently ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartRound => {
            if world.phase == Phase::Active {
                debug!("ignoring start request while a round is active");
                return;
            }
            world.reset_round();
            world.phase = Phase::Active;
            info!("round started");
            out_events.push(Event::RoundStarted);
        }
        Command::AdvanceTime { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::Tick => {
            if world.phase != Phase::Active {
                return;
            }
            world.time_remaining = world.time_remaining.saturating_sub(1);
            out_events.push(Event::ClockTicked {
                time_remaining: world.time_remaining,
            });
            if world.time_remaining == 0 {
                world.finish_round(out_events);
            }
        }
        Command::SpawnBalloon {
            horizontal_position,
            skin,
        } => {
            if world.phase != Phase::Active {
                return;
            }
            let balloon = world.spawn_balloon(horizontal_position, skin);
            out_events.push(Event::BalloonSpawned { balloon });
        }
        Command::PopBalloon { balloon } => {
            if world.phase != Phase::Active {
                return;
            }
            if world.remove_balloon(balloon).is_none() {
                debug!("pop ignored for absent balloon {}", balloon.get());
                return;
            }
            world.score = world.score.saturating_add(POP_REWARD);
            world.popped = world.popped.saturating_add(1);
            out_events.push(Event::BalloonPopped {
                balloon,
                score: world.score,
            });
        }
        Command::TimeOutBalloon { balloon } => {
            if world.phase != Phase::Active {
                debug!("timeout dropped for balloon {} outside play", balloon.get());
                return;
            }
            if world.remove_balloon(balloon).is_none() {
                return;
            }
            world.misses_pending = world.misses_pending.saturating_add(1);
            out_events.push(Event::BalloonMissed { balloon });
        }
        Command::EndRound => {
            if world.phase != Phase::Active {
                return;
            }
            world.finish_round(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use balloon_pop_core::{format_clock, Balloon, Phase, RoundSummary};

    use super::World;

    /// Retrieves the title that adapters display on the splash screen.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports the current phase of the round.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Whole seconds left on the round clock.
    #[must_use]
    pub fn time_remaining(world: &World) -> u32 {
        world.time_remaining
    }

    /// Balloons still crossing the play-field, ordered by spawn.
    #[must_use]
    pub fn balloons(world: &World) -> &[Balloon] {
        &world.balloons
    }

    /// Current counters expressed as a summary. `missed` only includes
    /// balloons folded in at the end of the round.
    #[must_use]
    pub fn summary(world: &World) -> RoundSummary {
        world.summary()
    }

    /// Captures the read model consumed by presentation adapters.
    #[must_use]
    pub fn round_view(world: &World) -> RoundView {
        RoundView {
            phase: world.phase,
            time_remaining: world.time_remaining,
            clock_label: format_clock(world.time_remaining),
            score: world.score,
            popped: world.popped,
            missed: world.missed,
            misses_pending: world.misses_pending,
            spawned: world.spawned,
            balloons: world.balloons.clone(),
        }
    }

    /// Read-only snapshot of a round.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RoundView {
        /// Current phase.
        pub phase: Phase,
        /// Whole seconds left on the clock.
        pub time_remaining: u32,
        /// Clock rendered as `M:SS`.
        pub clock_label: String,
        /// Points earned this round.
        pub score: u32,
        /// Balloons popped this round.
        pub popped: u32,
        /// Escaped balloons folded in when the round ended.
        pub missed: u32,
        /// Balloons that escaped during play and await the end-of-round fold.
        pub misses_pending: u32,
        /// Balloons released this round.
        pub spawned: u32,
        /// Balloons still crossing the play-field.
        pub balloons: Vec<Balloon>,
    }
}
