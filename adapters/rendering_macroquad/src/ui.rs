//! Overlay screens for the Macroquad rendering backend.
//!
//! The splash and summary screens share one centred panel with a single
//! start control; its bounds are exposed so input gathering can hit-test it.

use balloon_pop_rendering::{palette, Scene, Screen};
use glam::Vec2;
use macroquad::text::{draw_text, measure_text};

use crate::to_macroquad_color;

const BUTTON_SIZE: Vec2 = Vec2::new(200.0, 56.0);
const TITLE_FONT_SIZE: u16 = 44;
const BODY_FONT_SIZE: u16 = 28;
const CARD_PADDING: Vec2 = Vec2::new(12.0, 10.0);

/// Bounds of the start / play-again button in screen pixels.
pub(crate) fn start_button_bounds(screen_width: f32, screen_height: f32) -> (Vec2, Vec2) {
    let min = Vec2::new(
        (screen_width - BUTTON_SIZE.x) * 0.5,
        screen_height * 0.5 + 40.0,
    );
    (min, min + BUTTON_SIZE)
}

/// Draws the splash or summary panel when the scene requests one.
pub(crate) fn draw_overlay(scene: &Scene, screen_width: f32, screen_height: f32) {
    let (title, subtitle, button_label) = match &scene.screen {
        Screen::Playing => return,
        Screen::Splash { title } => (title.clone(), None, "Start"),
        Screen::Summary { final_score } => (
            "Game Over".to_string(),
            Some(format!("Final Score: {final_score}")),
            "Play Again",
        ),
    };

    let shade = macroquad::color::Color::new(0.0, 0.0, 0.0, 0.45);
    macroquad::shapes::draw_rectangle(0.0, 0.0, screen_width, screen_height, shade);

    let center_x = screen_width * 0.5;
    let center_y = screen_height * 0.5;
    draw_centered(title.as_str(), center_x, center_y - 60.0, TITLE_FONT_SIZE);
    if let Some(subtitle) = subtitle {
        draw_centered(subtitle.as_str(), center_x, center_y, BODY_FONT_SIZE);
    }

    let (min, max) = start_button_bounds(screen_width, screen_height);
    let size = max - min;
    macroquad::shapes::draw_rectangle(
        min.x,
        min.y,
        size.x,
        size.y,
        to_macroquad_color(palette::ACCENT),
    );
    draw_centered(button_label, center_x, min.y + size.y * 0.5, BODY_FONT_SIZE);
}

/// Draws a label on an accent card centred at the provided position.
pub(crate) fn draw_card(label: &str, center_x: f32, center_y: f32) {
    let dimensions = measure_text(label, None, BODY_FONT_SIZE, 1.0);
    let size = Vec2::new(dimensions.width, dimensions.height) + CARD_PADDING * 2.0;
    macroquad::shapes::draw_rectangle(
        center_x - size.x * 0.5,
        center_y - size.y * 0.5,
        size.x,
        size.y,
        to_macroquad_color(palette::ACCENT),
    );
    draw_centered(label, center_x, center_y, BODY_FONT_SIZE);
}

fn draw_centered(label: &str, center_x: f32, center_y: f32, font_size: u16) {
    let dimensions = measure_text(label, None, font_size, 1.0);
    let _ = draw_text(
        label,
        center_x - dimensions.width * 0.5,
        center_y + dimensions.height * 0.5,
        f32::from(font_size),
        to_macroquad_color(palette::TEXT),
    );
}
