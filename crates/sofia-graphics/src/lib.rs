//! Classroom shape/joint API.
//!
//! Shapes live in a [`ShapeField`], which owns a rapier2d physics world.
//! [`Joint`]s connect two shapes of the same field, and shapes draw
//! themselves through a [`Drawable`] onto a host-provided [`Canvas`].

pub mod api;
pub mod core;
pub mod joints;
pub mod renderer;
pub mod shapes;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, FieldConfig};
pub use api::types::{FieldId, JointId, ShapeId};
pub use crate::core::field::{FieldError, ShapeField};
pub use crate::core::physics::{
    BodyType, ColliderDesc, ColliderMaterial, JointDef, JointHandle, JointParams, PhysicsBody,
    PhysicsWorld,
};
pub use crate::core::time::FixedTimestep;
pub use joints::{
    Connection, Distance, DistanceJoint, Joint, JointError, JointKind, Prismatic, PrismaticJoint,
    Revolute, RevoluteJoint, Weld, WeldJoint,
};
pub use renderer::{Canvas, Color, DrawCommand, RecordingCanvas, SpriteRef};
pub use shapes::{
    ColorDrawable, Drawable, DrawableShape, IRect, Rect, Shape, ShapeOutline, SpriteDrawable,
    WeakShape,
};
