use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;

use crate::api::types::{FieldId, ShapeId};
use crate::core::physics::{BodyDesc, BodyType, ColliderDesc, ColliderMaterial, PhysicsBody, PhysicsWorld};
use crate::renderer::traits::Canvas;
use crate::shapes::drawable::Drawable;
use crate::shapes::rect::Rect;

/// Collider outline used when a shape is given a physics body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeOutline {
    #[default]
    Rectangle,
    /// Circle inscribed in the bounds.
    Oval,
}

/// Back-reference from a shape to the field that owns it.
/// The world is held weakly: a field outliving its shapes is the norm, but
/// a shape must never keep a dropped field's world alive.
#[derive(Debug, Clone)]
pub(crate) struct FieldLink {
    pub field: FieldId,
    pub world: Weak<RefCell<PhysicsWorld>>,
    pub body: PhysicsBody,
    /// The field's default material, for rebuilding the collider.
    pub default_material: ColliderMaterial,
}

struct ShapeData {
    id: ShapeId,
    bounds: Rect,
    rotation: f32,
    body_type: BodyType,
    outline: ShapeOutline,
    material: Option<ColliderMaterial>,
    link: Option<FieldLink>,
    drawable: Option<Box<dyn Drawable>>,
}

/// A positioned, bounded entity that can live in a [`ShapeField`](crate::ShapeField),
/// be connected by joints and be drawn.
///
/// `Shape` is a shared handle: clones refer to the same entity. Joints keep a
/// [`WeakShape`] instead so they never extend a shape's lifetime.
#[derive(Clone)]
pub struct Shape(Rc<RefCell<ShapeData>>);

/// Non-owning reference to a [`Shape`].
#[derive(Clone, Default)]
pub struct WeakShape(Weak<RefCell<ShapeData>>);

impl Shape {
    /// Create a rectangular, dynamic shape covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self(Rc::new(RefCell::new(ShapeData {
            id: ShapeId::next(),
            bounds,
            rotation: 0.0,
            body_type: BodyType::default(),
            outline: ShapeOutline::default(),
            material: None,
            link: None,
            drawable: None,
        })))
    }

    /// Create a shape whose collider is the circle inscribed in `bounds`.
    pub fn oval(bounds: Rect) -> Self {
        let shape = Self::new(bounds);
        shape.0.borrow_mut().outline = ShapeOutline::Oval;
        shape
    }

    // -- Builder pattern --

    /// Set the body type used when the shape joins a field.
    /// Has no effect on a body that already exists.
    pub fn with_body_type(self, body_type: BodyType) -> Self {
        self.0.borrow_mut().body_type = body_type;
        self
    }

    pub fn with_material(self, material: ColliderMaterial) -> Self {
        self.0.borrow_mut().material = Some(material);
        self
    }

    pub fn with_drawable(self, drawable: impl Drawable + 'static) -> Self {
        self.set_drawable(Some(Box::new(drawable)));
        self
    }

    // -- Accessors --

    pub fn id(&self) -> ShapeId {
        self.0.borrow().id
    }

    pub fn bounds(&self) -> Rect {
        self.0.borrow().bounds
    }

    pub fn x(&self) -> f32 {
        self.bounds().x()
    }

    pub fn y(&self) -> f32 {
        self.bounds().y()
    }

    pub fn x2(&self) -> f32 {
        self.bounds().x2()
    }

    pub fn y2(&self) -> f32 {
        self.bounds().y2()
    }

    /// Center of the bounds.
    pub fn position(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Rotation in radians, as last reported by the physics body.
    pub fn rotation(&self) -> f32 {
        self.0.borrow().rotation
    }

    pub fn body_type(&self) -> BodyType {
        self.0.borrow().body_type
    }

    pub fn outline(&self) -> ShapeOutline {
        self.0.borrow().outline
    }

    /// Move or resize the shape. If it is attached to a field, its body is
    /// teleported to the new center, and a size change rebuilds the collider.
    pub fn set_bounds(&self, bounds: Rect) {
        let (link, resized) = {
            let mut data = self.0.borrow_mut();
            let resized = data.bounds.size() != bounds.size();
            data.bounds = bounds;
            (data.link.clone(), resized)
        };
        let Some(link) = link else { return };
        let Some(world) = link.world.upgrade() else { return };

        let mut world = world.borrow_mut();
        world.set_body_position(&link.body, bounds.center());
        if !resized {
            return;
        }
        let desc = self.body_desc(link.default_material);
        if let Some(body) = world.replace_collider(&link.body, desc.collider, desc.material) {
            if let Some(link) = self.0.borrow_mut().link.as_mut() {
                link.body = body;
            }
        }
    }

    /// The field this shape belongs to, if any.
    pub fn field(&self) -> Option<FieldId> {
        self.0.borrow().link.as_ref().map(|link| link.field)
    }

    /// The physics body backing this shape while it is in a field.
    pub fn body(&self) -> Option<PhysicsBody> {
        self.0.borrow().link.as_ref().map(|link| link.body)
    }

    pub fn downgrade(&self) -> WeakShape {
        WeakShape(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Shape) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // -- Rendering --

    pub fn drawable(&self) -> Option<Ref<'_, dyn Drawable>> {
        Ref::filter_map(self.0.borrow(), |data| data.drawable.as_deref()).ok()
    }

    /// Replace the drawable, returning the previous one.
    pub fn set_drawable(&self, drawable: Option<Box<dyn Drawable>>) -> Option<Box<dyn Drawable>> {
        std::mem::replace(&mut self.0.borrow_mut().drawable, drawable)
    }

    /// Draw the shape's drawable into its current bounds. No-op without one.
    ///
    /// The drawable is taken out of the shape while it draws, so the drawable
    /// and the canvas may read the shape. A drawable installed during the draw
    /// wins over the one being drawn.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let (pixels, drawable) = {
            let mut data = self.0.borrow_mut();
            (data.bounds.to_pixels(), data.drawable.take())
        };
        let Some(mut drawable) = drawable else { return };
        drawable.set_bounds(pixels);
        drawable.draw(canvas);

        let mut data = self.0.borrow_mut();
        if data.drawable.is_none() {
            data.drawable = Some(drawable);
        }
    }

    // -- Field plumbing (crate-private) --

    pub(crate) fn link(&self) -> Option<FieldLink> {
        self.0.borrow().link.clone()
    }

    pub(crate) fn attach(&self, link: FieldLink) {
        self.0.borrow_mut().link = Some(link);
    }

    pub(crate) fn detach(&self) -> Option<FieldLink> {
        self.0.borrow_mut().link.take()
    }

    /// Body description derived from the current bounds.
    pub(crate) fn body_desc(&self, default_material: ColliderMaterial) -> BodyDesc {
        let data = self.0.borrow();
        let half = data.bounds.size().abs() * 0.5;
        let collider = match data.outline {
            ShapeOutline::Rectangle => ColliderDesc::Cuboid {
                half_width: half.x,
                half_height: half.y,
            },
            ShapeOutline::Oval => ColliderDesc::Ball { radius: half.x.min(half.y) },
        };
        BodyDesc {
            body_type: data.body_type,
            position: data.bounds.center(),
            rotation: data.rotation,
            collider,
            material: data.material.unwrap_or(default_material),
        }
    }

    /// Follow the body after a physics step without touching the world.
    pub(crate) fn sync_from_body(&self, center: Vec2, rotation: f32) {
        let mut data = self.0.borrow_mut();
        data.bounds = data.bounds.moved_to(center);
        data.rotation = rotation;
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Shape")
            .field("id", &data.id)
            .field("bounds", &data.bounds)
            .field("field", &data.link.as_ref().map(|link| link.field))
            .field("has_drawable", &data.drawable.is_some())
            .finish()
    }
}

impl WeakShape {
    /// An empty reference that never upgrades.
    pub fn new() -> Self {
        Self(Weak::new())
    }

    pub fn upgrade(&self) -> Option<Shape> {
        self.0.upgrade().map(Shape)
    }
}

impl From<&Shape> for WeakShape {
    fn from(shape: &Shape) -> Self {
        shape.downgrade()
    }
}

impl std::fmt::Debug for WeakShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upgrade() {
            Some(shape) => write!(f, "WeakShape({:?})", shape.id()),
            None => f.write_str("WeakShape(<dropped>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = Shape::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = a.clone();
        b.set_bounds(Rect::new(5.0, 5.0, 15.0, 15.0));
        assert_eq!(a.x(), 5.0);
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn weak_reference_does_not_keep_shape_alive() {
        let shape = Shape::new(Rect::new(0.0, 0.0, 1.0, 1.0));
        let weak = shape.downgrade();
        assert!(weak.upgrade().is_some());
        drop(shape);
        assert!(weak.upgrade().is_none());
        assert!(WeakShape::new().upgrade().is_none());
    }

    #[test]
    fn detached_shape_has_no_field() {
        let shape = Shape::new(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(shape.field(), None);
        assert_eq!(shape.body(), None);
    }

    #[test]
    fn oval_collider_uses_inscribed_circle() {
        let shape = Shape::oval(Rect::new(0.0, 0.0, 20.0, 10.0));
        let desc = shape.body_desc(ColliderMaterial::default());
        assert_eq!(desc.collider, ColliderDesc::Ball { radius: 5.0 });
        assert_eq!(desc.position, Vec2::new(10.0, 5.0));
    }

    #[test]
    fn drawable_may_read_its_shape_while_drawing() {
        use crate::renderer::recording::RecordingCanvas;
        use crate::renderer::traits::Color;
        use crate::shapes::rect::IRect;

        struct Inspector {
            shape: WeakShape,
            bounds: IRect,
        }

        impl Drawable for Inspector {
            fn set_bounds(&mut self, bounds: IRect) {
                self.bounds = bounds;
            }

            fn bounds(&self) -> IRect {
                self.bounds
            }

            fn draw(&self, canvas: &mut dyn Canvas) {
                let shape = self.shape.upgrade().unwrap();
                let seen = shape.bounds().to_pixels();
                assert!(shape.drawable().is_none());
                canvas.fill_rect(seen, Color::BLACK);
            }
        }

        let shape = Shape::new(Rect::new(0.0, 0.0, 8.0, 6.0));
        shape.set_drawable(Some(Box::new(Inspector {
            shape: shape.downgrade(),
            bounds: IRect::default(),
        })));

        let mut canvas = RecordingCanvas::new();
        shape.draw(&mut canvas);
        assert_eq!(canvas.commands()[0].rect(), IRect::new(0, 0, 8, 6));
        assert!(shape.drawable().is_some());
    }

    #[test]
    fn sync_moves_bounds_but_keeps_size() {
        let shape = Shape::new(Rect::new(0.0, 0.0, 10.0, 20.0));
        shape.sync_from_body(Vec2::new(50.0, 50.0), 0.25);
        assert_eq!(shape.bounds(), Rect::new(45.0, 40.0, 55.0, 60.0));
        assert_eq!(shape.rotation(), 0.25);
    }
}
