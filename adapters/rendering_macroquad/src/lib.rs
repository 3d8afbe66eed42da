#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Balloon Popper.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Overlay screens (splash and summary) live in the local `ui` module.

mod ui;

use anyhow::Result;
use balloon_pop_rendering::{
    palette, BalloonPresentation, Color, FrameInput, Hud, Presentation, RenderingBackend, Scene,
};
use glam::Vec2;
use log::info;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use self::ui::{draw_overlay, start_button_bounds};

const HEADER_HEIGHT: f32 = 120.0;
const DEFAULT_WINDOW_WIDTH: i32 = 480;
const DEFAULT_WINDOW_HEIGHT: i32 = 820;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Enter` or `Space` starts a round from the splash or summary screen.
    start_pressed: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let start_pressed = is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::Space);

        Self {
            quit_requested,
            start_pressed,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_width: i32,
    window_height: i32,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures the initial window size in physical pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = i32::try_from(width).unwrap_or(DEFAULT_WINDOW_WIDTH);
        self.window_height = i32::try_from(height).unwrap_or(DEFAULT_WINDOW_HEIGHT);
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration, render: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            0.0
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = self.render_accum / self.frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;

        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_width,
            window_height,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    info!("quit requested");
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before = FieldMetrics::from_scene(&scene, screen_width, screen_height);
                let frame_input = gather_frame_input(&scene, &metrics_before, keyboard);

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = FieldMetrics::from_scene(&scene, screen_width, screen_height);

                let render_start = Instant::now();
                draw_field(&metrics);
                draw_balloons(&scene, &metrics);
                draw_header(&scene.hud, screen_width);
                draw_overlay(&scene, screen_width, screen_height);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(frame_dt, render_duration);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            "FPS: {:.2} (10s avg: {:.2}) | render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Mapping between play-field units and screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FieldMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    width_scaled: f32,
    height_scaled: f32,
}

impl FieldMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let field = scene.field;
        let available_height = (screen_height - HEADER_HEIGHT).max(0.0);
        let scale = if field.width <= f32::EPSILON || field.height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / field.width).min(available_height / field.height)
        };

        let width_scaled = field.width * scale;
        let height_scaled = field.height * scale;
        let offset_x = ((screen_width - width_scaled) * 0.5).max(0.0);
        let offset_y = HEADER_HEIGHT + ((available_height - height_scaled) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            width_scaled,
            height_scaled,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn to_field(&self, position: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let inside = position.x >= self.offset_x
            && position.x <= self.offset_x + self.width_scaled
            && position.y >= self.offset_y
            && position.y <= self.offset_y + self.height_scaled;
        if !inside {
            return None;
        }
        Some(Vec2::new(
            (position.x - self.offset_x) / self.scale,
            (position.y - self.offset_y) / self.scale,
        ))
    }
}

fn gather_frame_input(
    scene: &Scene,
    metrics: &FieldMetrics,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let click = is_mouse_button_pressed(MouseButton::Left);
    let start_button = start_button_bounds(
        macroquad::window::screen_width(),
        macroquad::window::screen_height(),
    );
    gather_frame_input_from_observations(
        scene,
        metrics,
        Vec2::new(cursor_x, cursor_y),
        click,
        keyboard.start_pressed,
        start_button,
    )
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    metrics: &FieldMetrics,
    cursor_position: Vec2,
    click: bool,
    start_pressed: bool,
    start_button: (Vec2, Vec2),
) -> FrameInput {
    let mut input = FrameInput::default();

    if scene.offers_start() {
        let (min, max) = start_button;
        let on_button = cursor_position.cmpge(min).all() && cursor_position.cmple(max).all();
        input.start_requested = start_pressed || (click && on_button);
        return input;
    }

    if click {
        input.tap = metrics.to_field(cursor_position);
    }

    input
}

fn draw_field(metrics: &FieldMetrics) {
    macroquad::shapes::draw_rectangle_lines(
        metrics.offset_x,
        metrics.offset_y,
        metrics.width_scaled,
        metrics.height_scaled,
        2.0,
        to_macroquad_color(palette::HEADER),
    );
}

fn draw_balloons(scene: &Scene, metrics: &FieldMetrics) {
    for balloon in &scene.balloons {
        draw_balloon(balloon, scene, metrics);
    }
}

fn draw_balloon(balloon: &BalloonPresentation, scene: &Scene, metrics: &FieldMetrics) {
    let bounds = balloon.bounds(&scene.field);
    let top_left = metrics.to_screen(bounds.min);
    let size = bounds.size() * metrics.scale;
    if size.x <= f32::EPSILON {
        return;
    }

    let radius = size.x * 0.5;
    let center_x = top_left.x + radius;
    let body = to_macroquad_color(balloon.color);
    let highlight = to_macroquad_color(balloon.color.lighten(0.45));
    let string = to_macroquad_color(Color::from_rgb_u8(0xee, 0xee, 0xee));

    // Two stacked circles give the body its oval shape.
    let upper_center = top_left.y + radius;
    let lower_center = upper_center + radius * 0.45;
    macroquad::shapes::draw_circle(center_x, upper_center, radius, body);
    macroquad::shapes::draw_circle(center_x, lower_center, radius * 0.9, body);
    macroquad::shapes::draw_circle(
        center_x - radius * 0.35,
        upper_center - radius * 0.3,
        radius * 0.2,
        highlight,
    );

    let knot_top = lower_center + radius * 0.85;
    let knot_size = radius * 0.2;
    macroquad::shapes::draw_triangle(
        macroquad::math::Vec2::new(center_x, knot_top),
        macroquad::math::Vec2::new(center_x - knot_size, knot_top + knot_size * 1.5),
        macroquad::math::Vec2::new(center_x + knot_size, knot_top + knot_size * 1.5),
        body,
    );
    macroquad::shapes::draw_line(
        center_x,
        knot_top + knot_size * 1.5,
        center_x,
        top_left.y + size.y,
        1.5,
        string,
    );
}

fn draw_header(hud: &Hud, screen_width: f32) {
    macroquad::shapes::draw_rectangle(
        0.0,
        0.0,
        screen_width,
        HEADER_HEIGHT,
        to_macroquad_color(palette::HEADER),
    );

    let clock = format!("Time Left: {}", hud.clock_label);
    ui::draw_card(clock.as_str(), screen_width * 0.5, 36.0);

    let cards = [
        format!("Score: {}", hud.score),
        format!("Missed: {}", hud.missed),
        format!("Popped: {}", hud.popped),
    ];
    let spacing = screen_width / cards.len() as f32;
    for (index, label) in cards.iter().enumerate() {
        let center_x = spacing * (index as f32 + 0.5);
        ui::draw_card(label.as_str(), center_x, 88.0);
    }
}

pub(crate) fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
