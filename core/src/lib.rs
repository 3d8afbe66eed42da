#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Balloon Popper engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative round state, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and respond
//! exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical title shown on the splash screen.
pub const WELCOME_BANNER: &str = "Balloon Popper";

/// Length of a single round measured in whole seconds.
pub const ROUND_LENGTH_SECS: u32 = 120;

/// Score awarded for every popped balloon.
pub const POP_REWARD: u32 = 2;

/// Largest horizontal offset a balloon may spawn at. Offsets span `0..=FIELD_SPAN`.
pub const FIELD_SPAN: u32 = 300;

/// Simulated time represented by one round-clock tick.
pub const CLOCK_QUANTUM: Duration = Duration::from_secs(1);

/// Milliseconds between two balloon releases while a round is active.
pub const DEFAULT_SPAWN_INTERVAL_MS: u64 = 500;

/// Cadence at which balloons are released while a round is active.
pub const DEFAULT_SPAWN_INTERVAL: Duration = Duration::from_millis(DEFAULT_SPAWN_INTERVAL_MS);

/// Lifecycle of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Splash screen before the first round.
    #[default]
    Idle,
    /// Round in progress: the clock runs and balloons spawn.
    Active,
    /// Round finished, summary on screen.
    Over,
}

/// Commands that express all permissible round mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh round from the splash or summary screen.
    StartRound,
    /// Forwards elapsed host time to the systems.
    AdvanceTime {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Advances the round clock by one second.
    Tick,
    /// Releases a new balloon into the play-field.
    SpawnBalloon {
        /// Horizontal offset within `0..=FIELD_SPAN`.
        horizontal_position: u32,
        /// Cosmetic variant applied to the balloon.
        skin: BalloonSkin,
    },
    /// Player tapped a balloon.
    PopBalloon {
        /// Identifier of the balloon that was tapped.
        balloon: BalloonId,
    },
    /// A balloon finished crossing the play-field without being popped.
    TimeOutBalloon {
        /// Identifier of the balloon whose traversal elapsed.
        balloon: BalloonId,
    },
    /// Ends the active round immediately.
    EndRound,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that host time advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the frame.
        dt: Duration,
    },
    /// A new round began with every counter reset.
    RoundStarted,
    /// The round clock advanced by one second.
    ClockTicked {
        /// Whole seconds left after the tick.
        time_remaining: u32,
    },
    /// A balloon entered the play-field.
    BalloonSpawned {
        /// Snapshot of the spawned balloon.
        balloon: Balloon,
    },
    /// A balloon was popped by the player.
    BalloonPopped {
        /// Identifier of the popped balloon.
        balloon: BalloonId,
        /// Score after the reward was applied.
        score: u32,
    },
    /// A balloon escaped during play.
    BalloonMissed {
        /// Identifier of the escaped balloon.
        balloon: BalloonId,
    },
    /// The round transitioned to [`Phase::Over`].
    RoundEnded {
        /// Final counters of the round.
        summary: RoundSummary,
    },
}

/// Unique identifier assigned to a balloon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BalloonId(u32);

impl BalloonId {
    /// Creates a new balloon identifier with the provided numeric value.
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

/// Cosmetic balloon variants. Skins have no gameplay effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalloonSkin {
    /// Blue balloon.
    Blue,
    /// Red balloon.
    Red,
    /// Purple balloon.
    Purple,
    /// Yellow balloon.
    Yellow,
    /// Green balloon.
    Green,
}

impl BalloonSkin {
    /// Every skin, in catalogue order.
    pub const ALL: [BalloonSkin; 5] = [
        Self::Blue,
        Self::Red,
        Self::Purple,
        Self::Yellow,
        Self::Green,
    ];
}

/// Immutable description of a spawned balloon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Balloon {
    id: BalloonId,
    horizontal_position: u32,
    skin: BalloonSkin,
    travel_duration: Duration,
}

impl Balloon {
    /// Creates a new balloon descriptor.
    #[must_use]
    pub const fn new(
        id: BalloonId,
        horizontal_position: u32,
        skin: BalloonSkin,
        travel_duration: Duration,
    ) -> Self {
        Self {
            id,
            horizontal_position,
            skin,
            travel_duration,
        }
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> BalloonId {
        self.id
    }

    /// Horizontal offset within `0..=FIELD_SPAN`.
    #[must_use]
    pub const fn horizontal_position(&self) -> u32 {
        self.horizontal_position
    }

    /// Cosmetic variant.
    #[must_use]
    pub const fn skin(&self) -> BalloonSkin {
        self.skin
    }

    /// Time the balloon takes to cross the play-field.
    #[must_use]
    pub const fn travel_duration(&self) -> Duration {
        self.travel_duration
    }
}

/// Final counters reported when a round ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Points earned during the round.
    pub score: u32,
    /// Balloons popped by the player.
    pub popped: u32,
    /// Balloons that escaped.
    pub missed: u32,
}

/// Accelerating spawn rate: each balloon travels faster than the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedRamp {
    base_travel: Duration,
    growth: f64,
}

impl SpeedRamp {
    /// Travel duration of the first balloon of a round.
    pub const DEFAULT_BASE_TRAVEL: Duration = Duration::from_millis(Self::DEFAULT_BASE_TRAVEL_MS);
    /// Travel duration of the first balloon of a round, in milliseconds.
    pub const DEFAULT_BASE_TRAVEL_MS: u64 = 2000;
    /// Factor applied to the speed after every spawn.
    pub const DEFAULT_GROWTH: f64 = 1.2;

    /// Creates a ramp from a base travel duration and a growth factor.
    ///
    /// Growth factors below `1.0` would slow balloons down over time and are
    /// clamped to `1.0`.
    #[must_use]
    pub fn new(base_travel: Duration, growth: f64) -> Self {
        let growth = if growth.is_finite() && growth >= 1.0 {
            growth
        } else {
            1.0
        };
        Self {
            base_travel,
            growth,
        }
    }

    /// Travel duration of the first balloon of a round.
    #[must_use]
    pub const fn base_travel(&self) -> Duration {
        self.base_travel
    }

    /// Factor applied to the speed after every spawn.
    #[must_use]
    pub const fn growth(&self) -> f64 {
        self.growth
    }

    /// Travel duration for a balloon released at the provided speed factor.
    #[must_use]
    pub fn travel_duration(&self, speed_factor: f64) -> Duration {
        if !speed_factor.is_finite() || speed_factor <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.base_travel.as_secs_f64() / speed_factor)
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for SpeedRamp {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_TRAVEL, Self::DEFAULT_GROWTH)
    }
}

/// Formats whole seconds as the `M:SS` clock label.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
