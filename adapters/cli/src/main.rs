#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Balloon Popper experience.

mod config;
mod headless;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use balloon_pop_rendering::{palette, PlayField, Presentation, RenderingBackend};
use balloon_pop_rendering_macroquad::MacroquadBackend;
use clap::{ArgAction, Parser};
use log::info;

use crate::{config::GameConfig, simulation::Simulation};

/// Command-line arguments accepted by the Balloon Popper binary.
#[derive(Debug, Parser)]
#[command(name = "balloon-pop", about = "Pop rising balloons before the clock runs out")]
struct CliArgs {
    /// Optional TOML file overriding window and spawn settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for balloon placement; overrides the configuration file.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    vsync: bool,
    /// Log frame-rate statistics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Play with a seeded autoplayer instead of opening a window.
    #[arg(long)]
    headless: bool,
    /// Number of rounds the autoplayer completes.
    #[arg(long, default_value_t = 1)]
    rounds: u32,
}

/// Entry point for the Balloon Popper command-line interface.
fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => GameConfig::default(),
    };

    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(rand::random::<u64>);
    info!("spawner seed {seed}");

    let simulation = Simulation::new(
        config.spawn.interval(),
        config.spawn.speed_ramp(),
        seed,
    );

    if args.headless {
        let summaries = headless::run(simulation, args.rounds, seed)?;
        for (index, summary) in summaries.iter().enumerate() {
            println!(
                "round {}: score {} popped {} missed {}",
                index + 1,
                summary.score,
                summary.popped,
                summary.missed
            );
        }
        return Ok(());
    }

    run_windowed(simulation, &config, &args)
}

fn run_windowed(mut simulation: Simulation, config: &GameConfig, args: &CliArgs) -> Result<()> {
    let scene = simulation.scene(PlayField::standard());
    let presentation = Presentation::new(
        config.window.title.clone(),
        palette::BACKGROUND,
        scene,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_window_size(config.window.width, config.window.height);

    backend.run(presentation, move |dt, input, scene| {
        simulation.handle_frame(dt, input, scene);
    })
}
