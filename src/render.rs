//! Platform-agnostic render commands for the pendulum view.
//!
//! The simulation produces a list of [`RenderCommand`]s per frame; a
//! backend implementing [`Surface`] executes them. The terminal binary paints
//! them onto a ratatui canvas, tests record them.
//!
//! # Screen mapping
//!
//! Physical positions are mapped with a fixed affine transform:
//!
//! ```text
//! px = round(x · (width − radius))
//! py = round(height − radius − y · height + radius)
//! ```
//!
//! Screen y grows downward. Nothing is clamped.

use serde::{Deserialize, Serialize};

use crate::config::DisplayConfig;
use crate::engine::ring::Advance;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const BOB: Self = Self::rgb(235, 244, 123);
}

/// Integer pixel on the display surface. May lie off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    /// Create a pixel.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Map a physical position to a display pixel.
#[must_use]
pub fn to_screen(x: f64, y: f64, radius: f64, width: f64, height: f64) -> Pixel {
    let px = (x * (width - radius)).round();
    let py = (height - radius - y * height + radius).round();
    Pixel::new(px as i32, py as i32)
}

/// Pixels covered by a filled disc, row by row.
#[must_use]
pub fn disc(center: Pixel, radius: u32) -> Vec<Pixel> {
    let r = i32::try_from(radius).unwrap_or(i32::MAX / 2);
    let r_sq = i64::from(r) * i64::from(r);
    let mut pixels = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy) <= r_sq {
                pixels.push(Pixel::new(center.x + dx, center.y + dy));
            }
        }
    }
    pixels
}

/// Platform-agnostic render command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Clear the screen.
    Clear { color: Color },

    /// Draw a line.
    DrawLine { from: Pixel, to: Pixel, color: Color },

    /// Draw a circle (bob).
    DrawCircle {
        center: Pixel,
        radius: u32,
        color: Color,
        filled: bool,
    },

    /// Draw text with its top-left corner at `at`.
    DrawText { at: Pixel, text: String, color: Color },
}

/// Drawing backend consumed by the core.
pub trait Surface {
    /// Fill the whole surface.
    fn clear(&mut self, color: Color);

    /// Draw a straight line between two pixels.
    fn draw_line(&mut self, from: Pixel, to: Pixel, color: Color);

    /// Draw a circle, filled or outlined.
    fn draw_circle(&mut self, center: Pixel, radius: u32, color: Color, filled: bool);

    /// Draw a single line of text.
    fn draw_text(&mut self, at: Pixel, text: &str, color: Color);
}

impl RenderCommand {
    /// Execute this command on a surface.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self {
            Self::Clear { color } => surface.clear(*color),
            Self::DrawLine { from, to, color } => surface.draw_line(*from, *to, *color),
            Self::DrawCircle {
                center,
                radius,
                color,
                filled,
            } => surface.draw_circle(*center, *radius, *color, *filled),
            Self::DrawText { at, text, color } => surface.draw_text(*at, text, *color),
        }
    }
}

/// Execute a frame's commands in order.
pub fn replay<S: Surface + ?Sized>(commands: &[RenderCommand], surface: &mut S) {
    for command in commands {
        command.apply(surface);
    }
}

/// The four numeric readouts of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readouts {
    pub velocity: f64,
    pub acceleration: f64,
    pub amplitude: f64,
    pub time: f64,
}

impl Readouts {
    /// Readouts of the sample a step started from, with the acceleration
    /// evaluated there.
    #[must_use]
    pub const fn from_advance(advance: &Advance) -> Self {
        Self {
            velocity: advance.previous.v,
            acceleration: advance.acceleration,
            amplitude: advance.previous.y,
            time: advance.previous.t,
        }
    }

    /// Text lines, top to bottom.
    #[must_use]
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Velocity: {:.2}", self.velocity),
            format!("Acceleration: {:.2}", self.acceleration),
            format!("Amplitude: {:.2}", self.amplitude),
            format!("Running time: {:.2}", self.time),
        ]
    }
}

/// Build the draw list for one frame.
///
/// Clear to black, rod from the anchor to the bob, filled bob, then the
/// readouts stacked at multiples of the font size.
#[must_use]
pub fn render_frame(advance: &Advance, display: &DisplayConfig) -> Vec<RenderCommand> {
    let bob = to_screen(
        advance.current.x,
        advance.current.y,
        f64::from(display.bob_radius),
        f64::from(display.width),
        f64::from(display.height),
    );
    let anchor = Pixel::new(display.anchor[0], display.anchor[1]);

    let mut commands = Vec::with_capacity(7);
    commands.push(RenderCommand::Clear {
        color: Color::BLACK,
    });
    commands.push(RenderCommand::DrawLine {
        from: anchor,
        to: bob,
        color: Color::WHITE,
    });
    commands.push(RenderCommand::DrawCircle {
        center: bob,
        radius: display.bob_radius,
        color: Color::BOB,
        filled: true,
    });

    let line_height = i32::try_from(display.font_size).unwrap_or(i32::MAX);
    for (row, text) in (0i32..).zip(Readouts::from_advance(advance).lines()) {
        commands.push(RenderCommand::DrawText {
            at: Pixel::new(0, row.saturating_mul(line_height)),
            text,
            color: Color::WHITE,
        });
    }

    commands
}
