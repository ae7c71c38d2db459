use bytemuck::{Pod, Zeroable};

use super::traits::{Canvas, Color, SpriteRef};
use crate::shapes::rect::IRect;

/// One recorded draw call. 12 floats = 48 bytes stride, so a host can upload
/// the whole command list as a single vertex-instance buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawCommand {
    /// 0.0 = solid fill, 1.0 = sprite.
    pub kind: f32,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    pub atlas: f32,
    pub sprite_col: f32,
    pub atlas_row: f32,
}

impl DrawCommand {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const KIND_FILL: f32 = 0.0;
    pub const KIND_SPRITE: f32 = 1.0;

    fn with_rect(kind: f32, rect: IRect) -> Self {
        Self {
            kind,
            left: rect.min.x as f32,
            top: rect.min.y as f32,
            right: rect.max.x as f32,
            bottom: rect.max.y as f32,
            ..Default::default()
        }
    }

    /// The target rectangle this command draws into.
    pub fn rect(&self) -> IRect {
        IRect::new(
            self.left as i32,
            self.top as i32,
            self.right as i32,
            self.bottom as i32,
        )
    }

    pub fn is_sprite(&self) -> bool {
        self.kind == Self::KIND_SPRITE
    }
}

/// Canvas that records every draw call instead of rasterizing.
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Command list as raw floats for upload.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.commands)
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: IRect, color: Color) {
        let mut cmd = DrawCommand::with_rect(DrawCommand::KIND_FILL, rect);
        cmd.r = color.r;
        cmd.g = color.g;
        cmd.b = color.b;
        cmd.a = color.a;
        self.commands.push(cmd);
    }

    fn draw_sprite(&mut self, rect: IRect, sprite: SpriteRef) {
        let mut cmd = DrawCommand::with_rect(DrawCommand::KIND_SPRITE, rect);
        cmd.r = 1.0;
        cmd.g = 1.0;
        cmd.b = 1.0;
        cmd.a = sprite.alpha;
        cmd.atlas = sprite.atlas as f32;
        cmd.sprite_col = sprite.col;
        cmd.atlas_row = sprite.row;
        self.commands.push(cmd);
    }
}
