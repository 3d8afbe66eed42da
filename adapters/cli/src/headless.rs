//! Window-less driver that plays rounds with a seeded autoplayer.

use std::time::Duration;

use anyhow::{ensure, Result};
use balloon_pop_core::{Phase, RoundSummary, ROUND_LENGTH_SECS};
use balloon_pop_rendering::{FrameInput, PlayField};
use balloon_pop_world::query;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::simulation::Simulation;

const FRAME: Duration = Duration::from_nanos(1_000_000_000 / 30);
const TAP_PROBABILITY: f64 = 0.2;

/// Plays the requested number of rounds without opening a window.
pub(crate) fn run(mut simulation: Simulation, rounds: u32, seed: u64) -> Result<Vec<RoundSummary>> {
    let mut player = ChaCha8Rng::seed_from_u64(seed.rotate_left(17));
    let mut scene = simulation.scene(PlayField::standard());
    let frame_cap = u64::from(ROUND_LENGTH_SECS + 1) * 30;
    let mut summaries = Vec::new();

    for round in 1..=rounds {
        simulation.handle_frame(
            Duration::ZERO,
            FrameInput {
                tap: None,
                start_requested: true,
            },
            &mut scene,
        );

        let mut frames = 0_u64;
        while query::phase(simulation.world()) == Phase::Active {
            ensure!(
                frames < frame_cap,
                "round {round} did not finish within {frame_cap} frames"
            );
            let tap = if !scene.balloons.is_empty() && player.gen_bool(TAP_PROBABILITY) {
                let index = player.gen_range(0..scene.balloons.len());
                let bounds = scene.balloons[index].bounds(&scene.field);
                Some((bounds.min + bounds.max) * 0.5)
            } else {
                None
            };
            simulation.handle_frame(
                FRAME,
                FrameInput {
                    tap,
                    start_requested: false,
                },
                &mut scene,
            );
            frames += 1;
        }

        let summary = query::summary(simulation.world());
        info!(
            "round {round}: score {} popped {} missed {}",
            summary.score, summary.popped, summary.missed
        );
        summaries.push(summary);
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_pop_core::{SpeedRamp, DEFAULT_SPAWN_INTERVAL};

    fn simulation(seed: u64) -> Simulation {
        Simulation::new(DEFAULT_SPAWN_INTERVAL, SpeedRamp::default(), seed)
    }

    #[test]
    fn plays_every_requested_round() {
        let summaries = run(simulation(3), 2, 3).expect("rounds finish");
        assert_eq!(summaries.len(), 2);
        for summary in &summaries {
            assert_eq!(summary.score, summary.popped * 2);
            assert!(summary.popped > 0);
        }
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let first = run(simulation(11), 1, 11).expect("round finishes");
        let second = run(simulation(11), 1, 11).expect("round finishes");
        assert_eq!(first, second);
    }

    #[test]
    fn zero_rounds_yields_no_summaries() {
        let summaries = run(simulation(5), 0, 5).expect("nothing to play");
        assert!(summaries.is_empty());
    }
}
