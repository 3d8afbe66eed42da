#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Balloon Popper adapters.

use anyhow::Result as AnyResult;
use balloon_pop_core::{BalloonId, BalloonSkin};
use glam::Vec2;
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Palette used by the presentation layer.
pub mod palette {
    use super::Color;
    use balloon_pop_core::BalloonSkin;

    /// Background behind the play-field.
    pub const BACKGROUND: Color = Color::from_rgb_u8(0x75, 0x63, 0x94);
    /// Header strip hosting the scoreboard.
    pub const HEADER: Color = Color::from_rgb_u8(0x38, 0x29, 0x55);
    /// Cards and buttons.
    pub const ACCENT: Color = Color::from_rgb_u8(0xff, 0x98, 0x00);
    /// Text drawn on cards and buttons.
    pub const TEXT: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

    /// Fill color for a balloon skin.
    #[must_use]
    pub const fn skin(skin: BalloonSkin) -> Color {
        match skin {
            BalloonSkin::Blue => Color::from_rgb_u8(0x1e, 0x88, 0xe5),
            BalloonSkin::Red => Color::from_rgb_u8(0xe5, 0x39, 0x35),
            BalloonSkin::Purple => Color::from_rgb_u8(0x8e, 0x24, 0xaa),
            BalloonSkin::Yellow => Color::from_rgb_u8(0xfd, 0xd8, 0x35),
            BalloonSkin::Green => Color::from_rgb_u8(0x43, 0xa0, 0x47),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Tap position expressed in play-field units, if the player tapped this frame.
    pub tap: Option<Vec2>,
    /// Whether the player activated the start or play-again control.
    pub start_requested: bool,
}

/// Geometry of the area balloons rise through.
///
/// Play-field units grow rightwards and downwards from the top-left corner.
/// Balloons start with their bottom edge on the bottom of the field and rise
/// by [`PlayField::rise`] units over their travel duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayField {
    /// Width of the field.
    pub width: f32,
    /// Height of the field.
    pub height: f32,
    /// Vertical distance covered by a balloon over its whole traversal.
    pub rise: f32,
    /// Footprint of a single balloon.
    pub balloon_size: Vec2,
}

impl PlayField {
    /// Footprint of the balloon artwork.
    pub const DEFAULT_BALLOON_SIZE: Vec2 = Vec2::new(60.0, 130.0);
    /// Vertical distance covered by a balloon.
    pub const DEFAULT_RISE: f32 = 450.0;

    /// Field sized so a balloon at the widest spawn offset stays inside it.
    #[must_use]
    pub fn standard() -> Self {
        let span = balloon_pop_core::FIELD_SPAN as f32;
        Self {
            width: span + Self::DEFAULT_BALLOON_SIZE.x,
            height: Self::DEFAULT_RISE + Self::DEFAULT_BALLOON_SIZE.y,
            rise: Self::DEFAULT_RISE,
            balloon_size: Self::DEFAULT_BALLOON_SIZE,
        }
    }
}

impl Default for PlayField {
    fn default() -> Self {
        Self::standard()
    }
}

/// Axis-aligned rectangle expressed in play-field units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Bounds {
    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Presentation of a single rising balloon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BalloonPresentation {
    /// Identifier forwarded back to the simulation when tapped.
    pub id: BalloonId,
    /// Horizontal offset of the balloon's left edge.
    pub horizontal_position: f32,
    /// Fraction of the traversal completed, 0.0..=1.0.
    pub progress: f32,
    /// Fill color derived from the balloon skin.
    pub color: Color,
}

impl BalloonPresentation {
    /// Creates a balloon presentation from its skin and traversal progress.
    #[must_use]
    pub fn new(id: BalloonId, horizontal_position: u32, skin: BalloonSkin, progress: f32) -> Self {
        Self {
            id,
            horizontal_position: horizontal_position as f32,
            progress: progress.clamp(0.0, 1.0),
            color: palette::skin(skin),
        }
    }

    /// Rectangle covered by the balloon within the field.
    #[must_use]
    pub fn bounds(&self, field: &PlayField) -> Bounds {
        let bottom = field.height - self.progress * field.rise;
        let min = Vec2::new(self.horizontal_position, bottom - field.balloon_size.y);
        Bounds {
            min,
            max: min + field.balloon_size,
        }
    }
}

/// Scoreboard content shown above the field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Remaining time rendered as `M:SS`.
    pub clock_label: String,
    /// Points earned this round.
    pub score: u32,
    /// Balloons that escaped.
    pub missed: u32,
    /// Balloons popped.
    pub popped: u32,
}

/// Screen currently displayed by the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Start screen shown before the first round.
    Splash {
        /// Title of the game.
        title: String,
    },
    /// Live round with scoreboard and balloons.
    Playing,
    /// Round summary with a restart control.
    Summary {
        /// Score achieved in the finished round.
        final_score: u32,
    },
}

/// Scene description combining the play-field, scoreboard and balloons.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Geometry of the play-field.
    pub field: PlayField,
    /// Screen currently displayed.
    pub screen: Screen,
    /// Scoreboard contents.
    pub hud: Hud,
    /// Balloons in draw order; later entries are drawn on top.
    pub balloons: Vec<BalloonPresentation>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(field: PlayField, screen: Screen, hud: Hud, balloons: Vec<BalloonPresentation>) -> Self {
        Self {
            field,
            screen,
            hud,
            balloons,
        }
    }

    /// Topmost balloon under the provided play-field position, if any.
    #[must_use]
    pub fn balloon_at(&self, point: Vec2) -> Option<BalloonId> {
        self.balloons
            .iter()
            .rev()
            .find(|balloon| balloon.bounds(&self.field).contains(point))
            .map(|balloon| balloon.id)
    }

    /// Reports whether the start or play-again control should be shown.
    #[must_use]
    pub fn offers_start(&self) -> bool {
        !matches!(self.screen, Screen::Playing)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Balloon Popper scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}
