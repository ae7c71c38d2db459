//! Concrete joint kinds. Each one only knows how to fill in a
//! [`JointDef`]; the connect/disconnect lifecycle lives in [`Joint`](super::Joint).

use glam::Vec2;

use crate::core::physics::{JointDef, JointParams, PhysicsBody};

/// Builds the engine-specific definition for one kind of joint.
pub trait JointKind {
    /// Short name used in log messages.
    const NAME: &'static str;

    /// Fill in the kind's parameters and both bodies. The lifecycle stamps
    /// the collision flag and user data afterwards.
    fn create_definition(&self, body_a: PhysicsBody, body_b: PhysicsBody) -> JointDef;
}

/// Keeps the anchors `length` apart with a stiff spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
    pub length: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Distance {
    pub const DEFAULT_STIFFNESS: f32 = 1000.0;
    pub const DEFAULT_DAMPING: f32 = 10.0;

    /// Distance joint between the two shape centers.
    pub fn new(length: f32) -> Self {
        Self {
            anchor_a: Vec2::ZERO,
            anchor_b: Vec2::ZERO,
            length,
            stiffness: Self::DEFAULT_STIFFNESS,
            damping: Self::DEFAULT_DAMPING,
        }
    }

    pub fn with_anchors(mut self, anchor_a: Vec2, anchor_b: Vec2) -> Self {
        self.anchor_a = anchor_a;
        self.anchor_b = anchor_b;
        self
    }

    /// Softer values let the distance stretch; a high stiffness approaches a rigid rod.
    pub fn with_spring(mut self, stiffness: f32, damping: f32) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
        self
    }
}

impl JointKind for Distance {
    const NAME: &'static str = "distance";

    fn create_definition(&self, body_a: PhysicsBody, body_b: PhysicsBody) -> JointDef {
        JointDef::new(
            JointParams::Distance {
                anchor_a: self.anchor_a,
                anchor_b: self.anchor_b,
                rest_length: self.length,
                stiffness: self.stiffness,
                damping: self.damping,
            },
            body_a,
            body_b,
        )
    }
}

/// Hinge: both bodies share an anchor point and rotate freely around it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Revolute {
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
    /// `[min, max]` relative angle in radians.
    pub limits: Option<[f32; 2]>,
}

impl Revolute {
    pub fn new(anchor_a: Vec2, anchor_b: Vec2) -> Self {
        Self {
            anchor_a,
            anchor_b,
            limits: None,
        }
    }

    pub fn with_limits(mut self, min: f32, max: f32) -> Self {
        self.limits = Some([min, max]);
        self
    }
}

impl JointKind for Revolute {
    const NAME: &'static str = "revolute";

    fn create_definition(&self, body_a: PhysicsBody, body_b: PhysicsBody) -> JointDef {
        JointDef::new(
            JointParams::Revolute {
                anchor_a: self.anchor_a,
                anchor_b: self.anchor_b,
                limits: self.limits,
            },
            body_a,
            body_b,
        )
    }
}

/// Glues two bodies together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Weld {
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
}

impl Weld {
    pub fn new(anchor_a: Vec2, anchor_b: Vec2) -> Self {
        Self { anchor_a, anchor_b }
    }
}

impl JointKind for Weld {
    const NAME: &'static str = "weld";

    fn create_definition(&self, body_a: PhysicsBody, body_b: PhysicsBody) -> JointDef {
        JointDef::new(
            JointParams::Weld {
                anchor_a: self.anchor_a,
                anchor_b: self.anchor_b,
            },
            body_a,
            body_b,
        )
    }
}

/// Slider: body B may only translate along `axis` relative to body A.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prismatic {
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
    pub axis: Vec2,
    /// `[min, max]` translation along the axis.
    pub limits: Option<[f32; 2]>,
}

impl Prismatic {
    /// Slider along `axis`, normalized. A zero or non-finite axis falls back to +x.
    pub fn new(axis: Vec2) -> Self {
        Self {
            anchor_a: Vec2::ZERO,
            anchor_b: Vec2::ZERO,
            axis: axis.normalize_or(Vec2::X),
            limits: None,
        }
    }

    pub fn with_anchors(mut self, anchor_a: Vec2, anchor_b: Vec2) -> Self {
        self.anchor_a = anchor_a;
        self.anchor_b = anchor_b;
        self
    }

    pub fn with_limits(mut self, min: f32, max: f32) -> Self {
        self.limits = Some([min, max]);
        self
    }
}

impl JointKind for Prismatic {
    const NAME: &'static str = "prismatic";

    fn create_definition(&self, body_a: PhysicsBody, body_b: PhysicsBody) -> JointDef {
        JointDef::new(
            JointParams::Prismatic {
                anchor_a: self.anchor_a,
                anchor_b: self.anchor_b,
                axis: self.axis,
                limits: self.limits,
            },
            body_a,
            body_b,
        )
    }
}
