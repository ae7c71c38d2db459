//! Render surface contract.
//!
//! The crate never rasterizes anything itself. Drawables describe what they
//! want drawn through a [`Canvas`]; a host backend (a GPU renderer, a
//! software rasterizer, or the [`RecordingCanvas`](super::RecordingCanvas)
//! used in tests) decides how.

use serde::{Deserialize, Serialize};

use crate::shapes::rect::IRect;

/// Linear RGBA color, each channel 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A cell in a texture atlas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteRef {
    /// Which atlas the sprite lives in.
    pub atlas: u32,
    pub col: f32,
    pub row: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
}

/// A drawing surface. Implemented by the host's rendering backend.
pub trait Canvas {
    /// Fill `rect` with a solid color.
    fn fill_rect(&mut self, rect: IRect, color: Color);

    /// Stretch an atlas sprite over `rect`.
    fn draw_sprite(&mut self, rect: IRect, sprite: SpriteRef);
}
