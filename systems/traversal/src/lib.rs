#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Traversal timers that report balloons escaping the play-field.
//!
//! Every spawned balloon receives an independent timer sized by its travel
//! duration. Timers keep running after a round ends so in-flight balloons
//! still deliver their timeout; the world decides whether it still counts.

use std::time::Duration;

use balloon_pop_core::{BalloonId, Command, Event};
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TraversalTimer {
    balloon: BalloonId,
    travel: Duration,
    elapsed: Duration,
}

impl TraversalTimer {
    fn progress(&self) -> f32 {
        if self.travel.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.travel.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Pure system tracking the vertical traversal of every in-flight balloon.
#[derive(Debug, Default)]
pub struct Traversal {
    timers: Vec<TraversalTimer>,
}

impl Traversal {
    /// Creates a traversal system without in-flight balloons.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of balloons whose traversal has not completed yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.timers.len()
    }

    /// Fraction of the play-field the balloon has crossed, if still in flight.
    #[must_use]
    pub fn progress(&self, balloon: BalloonId) -> Option<f32> {
        self.timers
            .iter()
            .find(|timer| timer.balloon == balloon)
            .map(TraversalTimer::progress)
    }

    /// Consumes world events and emits timeout commands for elapsed traversals.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RoundStarted => self.timers.clear(),
                Event::BalloonSpawned { balloon } => self.timers.push(TraversalTimer {
                    balloon: balloon.id(),
                    travel: balloon.travel_duration(),
                    elapsed: Duration::ZERO,
                }),
                Event::BalloonPopped { balloon, .. } | Event::BalloonMissed { balloon } => {
                    self.forget(*balloon);
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                Event::ClockTicked { .. } | Event::RoundEnded { .. } => {}
            }
        }
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        self.timers.retain_mut(|timer| {
            timer.elapsed = timer.elapsed.saturating_add(dt);
            if timer.elapsed < timer.travel {
                return true;
            }
            trace!("balloon {} finished traversal", timer.balloon.get());
            out.push(Command::TimeOutBalloon {
                balloon: timer.balloon,
            });
            false
        });
    }

    fn forget(&mut self, balloon: BalloonId) {
        self.timers.retain(|timer| timer.balloon != balloon);
    }
}
