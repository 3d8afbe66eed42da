#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round clock system that converts elapsed time into whole-second ticks.

use std::time::Duration;

use balloon_pop_core::{Command, Event, Phase, CLOCK_QUANTUM};
use log::trace;

/// Pure system that emits one [`Command::Tick`] per elapsed round second.
#[derive(Debug)]
pub struct Clock {
    quantum: Duration,
    accumulator: Duration,
}

impl Clock {
    /// Creates a clock that ticks once per second.
    #[must_use]
    pub fn new() -> Self {
        Self::with_quantum(CLOCK_QUANTUM)
    }

    /// Creates a clock that ticks once per provided quantum.
    #[must_use]
    pub fn with_quantum(quantum: Duration) -> Self {
        Self {
            quantum,
            accumulator: Duration::ZERO,
        }
    }

    /// Time accumulated toward the next tick.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Consumes events and the current phase to emit tick commands.
    pub fn handle(&mut self, events: &[Event], phase: Phase, out: &mut Vec<Command>) {
        if phase != Phase::Active || self.quantum.is_zero() {
            self.accumulator = Duration::ZERO;
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

        while self.accumulator >= self.quantum {
            self.accumulator -= self.quantum;
            trace!("round clock tick");
            out.push(Command::Tick);
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
