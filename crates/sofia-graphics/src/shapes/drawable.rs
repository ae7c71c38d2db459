//! Drawable-backed shapes: a shape that renders an external resource into
//! its current bounds.

use std::cell::Ref;
use std::ops::Deref;

use crate::renderer::traits::{Canvas, Color, SpriteRef};
use crate::shapes::rect::{IRect, Rect};
use crate::shapes::shape::Shape;

/// A render resource that draws itself into a pixel rectangle.
///
/// Callers set the bounds immediately before every `draw`, so implementors
/// only need to remember the last rectangle they were given.
pub trait Drawable {
    fn set_bounds(&mut self, bounds: IRect);

    fn bounds(&self) -> IRect;

    fn draw(&self, canvas: &mut dyn Canvas);
}

/// Fills its bounds with a solid color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorDrawable {
    pub color: Color,
    bounds: IRect,
}

impl ColorDrawable {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            bounds: IRect::default(),
        }
    }
}

impl Drawable for ColorDrawable {
    fn set_bounds(&mut self, bounds: IRect) {
        self.bounds = bounds;
    }

    fn bounds(&self) -> IRect {
        self.bounds
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds, self.color);
    }
}

/// Stretches an atlas sprite over its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteDrawable {
    pub sprite: SpriteRef,
    bounds: IRect,
}

impl SpriteDrawable {
    pub fn new(atlas: u32, col: f32, row: f32) -> Self {
        Self {
            sprite: SpriteRef { atlas, col, row, alpha: 1.0 },
            bounds: IRect::default(),
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.sprite.alpha = alpha;
        self
    }
}

impl Drawable for SpriteDrawable {
    fn set_bounds(&mut self, bounds: IRect) {
        self.bounds = bounds;
    }

    fn bounds(&self) -> IRect {
        self.bounds
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        // Zero-area sprites are skipped by the backend anyway
        if self.sprite.alpha > 0.0 && !self.bounds.is_empty() {
            canvas.draw_sprite(self.bounds, self.sprite);
        }
    }
}

/// A shape that is drawn by delegating to a [`Drawable`].
///
/// Derefs to [`Shape`], so it can be added to a field and connected by
/// joints like any other shape.
#[derive(Clone, PartialEq)]
pub struct DrawableShape {
    shape: Shape,
}

impl DrawableShape {
    pub fn new(drawable: impl Drawable + 'static, bounds: Rect) -> Self {
        let shape = Shape::new(bounds);
        shape.set_drawable(Some(Box::new(drawable)));
        Self { shape }
    }

    /// The drawable currently bound to this shape, if any.
    pub fn drawable(&self) -> Option<Ref<'_, dyn Drawable>> {
        self.shape.drawable()
    }

    /// Replace the drawable. Passing `None` makes the shape invisible.
    /// Returns the previous drawable.
    pub fn set_drawable(&self, drawable: Option<Box<dyn Drawable>>) -> Option<Box<dyn Drawable>> {
        self.shape.set_drawable(drawable)
    }

    pub fn take_drawable(&self) -> Option<Box<dyn Drawable>> {
        self.shape.set_drawable(None)
    }

    /// Draw the bound drawable into the shape's current bounds.
    /// Does nothing when no drawable is set.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.shape.draw(canvas);
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl Deref for DrawableShape {
    type Target = Shape;

    fn deref(&self) -> &Shape {
        &self.shape
    }
}

impl From<DrawableShape> for Shape {
    fn from(drawable: DrawableShape) -> Shape {
        drawable.shape
    }
}

impl std::fmt::Debug for DrawableShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DrawableShape").field(&self.shape).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::RecordingCanvas;
    use glam::Vec2;

    #[test]
    fn draws_into_construction_bounds() {
        let shape = DrawableShape::new(ColorDrawable::new(Color::BLACK), Rect::new(10.0, 20.0, 30.0, 40.0));
        let mut canvas = RecordingCanvas::new();
        shape.draw(&mut canvas);

        assert_eq!(canvas.len(), 1);
        assert_eq!(canvas.commands()[0].rect(), IRect::new(10, 20, 30, 40));
    }

    #[test]
    fn draws_into_current_bounds_after_move() {
        let shape = DrawableShape::new(SpriteDrawable::new(0, 1.0, 2.0), Rect::new(0.0, 0.0, 10.0, 10.0));
        shape.set_bounds(Rect::new(0.0, 0.0, 10.0, 10.0).offset(Vec2::new(100.5, 50.2)));

        let mut canvas = RecordingCanvas::new();
        shape.draw(&mut canvas);

        assert_eq!(canvas.commands()[0].rect(), IRect::new(100, 50, 110, 60));
        let bounds = shape.drawable().map(|d| d.bounds());
        assert_eq!(bounds, Some(IRect::new(100, 50, 110, 60)));
    }

    #[test]
    fn draw_without_drawable_is_noop() {
        let shape = DrawableShape::new(ColorDrawable::new(Color::WHITE), Rect::new(0.0, 0.0, 5.0, 5.0));
        let old = shape.take_drawable();
        assert!(old.is_some());
        assert!(shape.drawable().is_none());

        let mut canvas = RecordingCanvas::new();
        shape.draw(&mut canvas);
        assert!(canvas.is_empty());
    }

    #[test]
    fn set_drawable_swaps_resource() {
        let shape = DrawableShape::new(ColorDrawable::new(Color::WHITE), Rect::new(0.0, 0.0, 5.0, 5.0));
        shape.set_drawable(Some(Box::new(SpriteDrawable::new(3, 0.0, 0.0))));

        let mut canvas = RecordingCanvas::new();
        shape.draw(&mut canvas);
        assert!(canvas.commands()[0].is_sprite());
        assert_eq!(canvas.commands()[0].atlas, 3.0);
    }

    #[test]
    fn transparent_sprite_draws_nothing() {
        let shape = DrawableShape::new(
            SpriteDrawable::new(0, 0.0, 0.0).with_alpha(0.0),
            Rect::new(0.0, 0.0, 5.0, 5.0),
        );
        let mut canvas = RecordingCanvas::new();
        shape.draw(&mut canvas);
        assert!(canvas.is_empty());
    }
}
