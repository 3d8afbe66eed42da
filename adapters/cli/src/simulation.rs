//! Wires the world and its systems into a frame-driven simulation.

use std::time::Duration;

use balloon_pop_core::{Command, Event, Phase, SpeedRamp, CLOCK_QUANTUM};
use balloon_pop_rendering::{BalloonPresentation, FrameInput, Hud, PlayField, Scene, Screen};
use balloon_pop_system_clock::Clock;
use balloon_pop_system_spawning::{Config as SpawningConfig, Spawning};
use balloon_pop_system_traversal::Traversal;
use balloon_pop_world::{self as world, query, World};
use log::debug;

/// Owns the authoritative world together with the systems reacting to it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    clock: Clock,
    spawning: Spawning,
    traversal: Traversal,
    max_step: Duration,
}

impl Simulation {
    /// Creates a simulation on the splash screen.
    pub(crate) fn new(spawn_interval: Duration, speed_ramp: SpeedRamp, seed: u64) -> Self {
        Self {
            world: World::with_speed_ramp(speed_ramp),
            clock: Clock::new(),
            spawning: Spawning::new(SpawningConfig::new(spawn_interval, seed)),
            traversal: Traversal::new(),
            max_step: [spawn_interval, CLOCK_QUANTUM]
                .into_iter()
                .filter(|step| !step.is_zero())
                .min()
                .unwrap_or(CLOCK_QUANTUM),
        }
    }

    /// Read-only access to the world for queries.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies a command and routes the resulting events through every system
    /// until no further commands are produced. Returns every emitted event.
    pub(crate) fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            let phase = query::phase(&self.world);
            let mut commands = Vec::new();
            // Timeouts precede ticks so a balloon escaping in the final second still counts,
            // and ticks precede spawns so nothing is released once the clock runs out.
            self.traversal.handle(&events, &mut commands);
            self.clock.handle(&events, phase, &mut commands);
            self.spawning.handle(&events, phase, &mut commands);

            log.append(&mut events);
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        log
    }

    /// Advances the simulation by one rendered frame and refreshes the scene.
    pub(crate) fn handle_frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        let phase = query::phase(&self.world);
        if input.start_requested && phase != Phase::Active {
            let _ = self.submit(Command::StartRound);
        }

        if let Some(tap) = input.tap {
            if query::phase(&self.world) == Phase::Active {
                match scene.balloon_at(tap) {
                    Some(balloon) => {
                        let _ = self.submit(Command::PopBalloon { balloon });
                    }
                    None => debug!("tap at {tap:?} missed every balloon"),
                }
            }
        }

        // Long frames are replayed in slices no longer than one spawn or clock step.
        let mut remaining = dt;
        while !remaining.is_zero() {
            let step = remaining.min(self.max_step);
            let _ = self.submit(Command::AdvanceTime { dt: step });
            remaining -= step;
        }
        self.populate_scene(scene);
    }

    /// Builds a fresh scene on the provided play-field.
    pub(crate) fn scene(&self, field: PlayField) -> Scene {
        let mut scene = Scene::new(field, Screen::Playing, Hud::default(), Vec::new());
        self.populate_scene(&mut scene);
        scene
    }

    fn populate_scene(&self, scene: &mut Scene) {
        let view = query::round_view(&self.world);

        scene.screen = match view.phase {
            Phase::Idle => Screen::Splash {
                title: query::welcome_banner(&self.world).to_string(),
            },
            Phase::Active => Screen::Playing,
            Phase::Over => Screen::Summary {
                final_score: view.score,
            },
        };
        scene.hud = Hud {
            clock_label: view.clock_label,
            score: view.score,
            missed: view.missed,
            popped: view.popped,
        };

        // After the round ends, leftover balloons settle at the top behind the summary.
        let settled = (view.phase == Phase::Over).then_some(1.0);
        scene.balloons.clear();
        scene
            .balloons
            .extend(view.balloons.iter().filter_map(|balloon| {
                let progress = self.traversal.progress(balloon.id()).or(settled)?;
                Some(BalloonPresentation::new(
                    balloon.id(),
                    balloon.horizontal_position(),
                    balloon.skin(),
                    progress,
                ))
            }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_pop_core::{BalloonSkin, DEFAULT_SPAWN_INTERVAL, ROUND_LENGTH_SECS};
    use glam::Vec2;

    const FRAME: Duration = Duration::from_millis(50);

    fn simulation() -> Simulation {
        Simulation::new(DEFAULT_SPAWN_INTERVAL, SpeedRamp::default(), 7)
    }

    fn start(simulation: &mut Simulation, scene: &mut Scene) {
        simulation.handle_frame(
            Duration::ZERO,
            FrameInput {
                tap: None,
                start_requested: true,
            },
            scene,
        );
    }

    fn center_of(scene: &Scene, index: usize) -> Vec2 {
        let bounds = scene.balloons[index].bounds(&scene.field);
        (bounds.min + bounds.max) * 0.5
    }

    #[test]
    fn fresh_simulation_shows_splash() {
        let simulation = simulation();
        let scene = simulation.scene(PlayField::standard());
        assert_eq!(
            scene.screen,
            Screen::Splash {
                title: "Balloon Popper".to_string()
            }
        );
        assert_eq!(scene.hud.clock_label, "2:00");
        assert!(scene.balloons.is_empty());
    }

    #[test]
    fn untouched_round_misses_every_escaped_balloon() {
        let mut simulation = simulation();
        let mut scene = simulation.scene(PlayField::standard());
        start(&mut simulation, &mut scene);

        let frames = (u64::from(ROUND_LENGTH_SECS) * 1_000) / 50 + 1;
        for _ in 0..frames {
            simulation.handle_frame(FRAME, FrameInput::default(), &mut scene);
        }

        let view = query::round_view(simulation.world());
        assert_eq!(view.phase, Phase::Over);
        assert_eq!(view.time_remaining, 0);
        assert_eq!(view.popped, 0);
        assert_eq!(view.score, 0);
        assert_eq!(view.misses_pending, 0);
        assert!(view.missed > 0);
        assert!(view.missed <= view.spawned);
        assert_eq!(scene.screen, Screen::Summary { final_score: 0 });
    }

    #[test]
    fn tapping_a_balloon_pops_it() {
        let mut simulation = simulation();
        let mut scene = simulation.scene(PlayField::standard());
        start(&mut simulation, &mut scene);

        while scene.balloons.is_empty() {
            simulation.handle_frame(FRAME, FrameInput::default(), &mut scene);
        }
        let target = scene.balloons[0].id;
        let tap = center_of(&scene, 0);

        simulation.handle_frame(
            Duration::ZERO,
            FrameInput {
                tap: Some(tap),
                start_requested: false,
            },
            &mut scene,
        );

        assert!(scene.balloons.iter().all(|balloon| balloon.id != target));
        assert_eq!(scene.hud.score, 2);
        assert_eq!(scene.hud.popped, 1);
    }

    #[test]
    fn tap_on_empty_sky_changes_nothing() {
        let mut simulation = simulation();
        let mut scene = simulation.scene(PlayField::standard());
        start(&mut simulation, &mut scene);

        simulation.handle_frame(
            Duration::ZERO,
            FrameInput {
                tap: Some(Vec2::new(1.0, 1.0)),
                start_requested: false,
            },
            &mut scene,
        );

        assert_eq!(scene.hud.score, 0);
        assert_eq!(scene.hud.popped, 0);
    }

    #[test]
    fn start_request_during_play_is_ignored() {
        let mut simulation = simulation();
        let mut scene = simulation.scene(PlayField::standard());
        start(&mut simulation, &mut scene);
        for _ in 0..40 {
            simulation.handle_frame(FRAME, FrameInput::default(), &mut scene);
        }
        let before = query::round_view(simulation.world());

        start(&mut simulation, &mut scene);

        let after = query::round_view(simulation.world());
        assert_eq!(after.time_remaining, before.time_remaining);
        assert_eq!(after.spawned, before.spawned);
    }

    #[test]
    fn play_again_resets_the_round() {
        let mut simulation = simulation();
        let mut scene = simulation.scene(PlayField::standard());
        start(&mut simulation, &mut scene);
        for _ in 0..60 {
            simulation.handle_frame(FRAME, FrameInput::default(), &mut scene);
        }
        let _ = simulation.submit(Command::EndRound);
        simulation.handle_frame(Duration::ZERO, FrameInput::default(), &mut scene);
        assert!(matches!(scene.screen, Screen::Summary { .. }));

        start(&mut simulation, &mut scene);

        let view = query::round_view(simulation.world());
        assert_eq!(view.phase, Phase::Active);
        assert_eq!(view.time_remaining, ROUND_LENGTH_SECS);
        assert_eq!((view.score, view.popped, view.missed), (0, 0, 0));
        assert!(view.balloons.is_empty());
        assert!(scene.balloons.is_empty());
        assert_eq!(scene.screen, Screen::Playing);
    }

    #[test]
    fn clock_counts_down_once_per_second() {
        let mut simulation = simulation();
        let mut scene = simulation.scene(PlayField::standard());
        start(&mut simulation, &mut scene);

        let events = simulation.submit(Command::AdvanceTime {
            dt: Duration::from_millis(2_500),
        });

        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::ClockTicked { .. }))
            .count();
        assert_eq!(ticks, 2);
        assert_eq!(query::time_remaining(simulation.world()), ROUND_LENGTH_SECS - 2);
        simulation.handle_frame(Duration::ZERO, FrameInput::default(), &mut scene);
        assert_eq!(scene.hud.clock_label, "1:58");
    }

    #[test]
    fn stalled_frame_stops_spawning_when_the_clock_runs_out() {
        let mut simulation = simulation();
        let mut scene = simulation.scene(PlayField::standard());
        start(&mut simulation, &mut scene);
        for _ in 0..ROUND_LENGTH_SECS - 1 {
            simulation.handle_frame(Duration::from_secs(1), FrameInput::default(), &mut scene);
        }
        let before = query::round_view(simulation.world());
        assert_eq!(before.time_remaining, 1);

        simulation.handle_frame(Duration::from_secs(3), FrameInput::default(), &mut scene);

        let after = query::round_view(simulation.world());
        assert_eq!(after.phase, Phase::Over);
        assert_eq!(after.time_remaining, 0);
        assert_eq!(after.spawned - before.spawned, 1, "only the release at 119.5s");
    }

    #[test]
    fn balloon_escaping_in_the_final_second_is_missed() {
        let mut simulation = Simulation::new(Duration::ZERO, SpeedRamp::default(), 7);
        let mut scene = simulation.scene(PlayField::standard());
        start(&mut simulation, &mut scene);

        let _ = simulation.submit(Command::AdvanceTime {
            dt: Duration::from_secs(u64::from(ROUND_LENGTH_SECS) - 2),
        });
        let _ = simulation.submit(Command::SpawnBalloon {
            horizontal_position: 120,
            skin: BalloonSkin::Red,
        });
        let _ = simulation.submit(Command::AdvanceTime {
            dt: Duration::from_secs(2),
        });

        let view = query::round_view(simulation.world());
        assert_eq!(view.phase, Phase::Over);
        assert_eq!(view.time_remaining, 0);
        assert_eq!(view.spawned, 1);
        assert_eq!(view.missed, 1);
        assert_eq!(view.misses_pending, 0);
    }

    #[test]
    fn scoreboard_invariants_hold_every_frame() {
        let mut simulation = simulation();
        let mut scene = simulation.scene(PlayField::standard());
        start(&mut simulation, &mut scene);

        for frame in 0..600 {
            let tap = (frame % 7 == 0 && !scene.balloons.is_empty()).then(|| center_of(&scene, 0));
            simulation.handle_frame(
                FRAME,
                FrameInput {
                    tap,
                    start_requested: false,
                },
                &mut scene,
            );

            let view = query::round_view(simulation.world());
            assert_eq!(view.score, view.popped * 2);
            assert!(view.popped + view.missed + view.misses_pending <= view.spawned);
            assert_eq!(
                view.popped + view.missed + view.misses_pending + view.balloons.len() as u32,
                view.spawned
            );
        }
    }
}
