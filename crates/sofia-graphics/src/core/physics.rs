use std::collections::HashMap;

use glam::Vec2;
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::api::types::{JointId, ShapeId};

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn vec2_to_point(v: Vec2) -> nalgebra::Point2<f32> {
    nalgebra::Point2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body backing a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyType {
    #[default]
    Dynamic,
    Static,
    Kinematic,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Static => RigidBodyType::Fixed,
            BodyType::Kinematic => RigidBodyType::KinematicPositionBased,
        }
    }
}

/// Collider geometry, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Everything needed to create the rigid body behind a shape.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub collider: ColliderDesc,
    pub material: ColliderMaterial,
}

/// Handle pair stored on an attached shape, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// Handle to a live constraint in the physics simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub(crate) ImpulseJointHandle);

/// Engine-specific parameters of a joint definition.
/// Anchors are in each body's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointParams {
    /// Spring that pulls the anchors toward `rest_length` apart.
    Distance {
        anchor_a: Vec2,
        anchor_b: Vec2,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    },
    /// Free rotation around the anchor point, optionally limited to
    /// `[min, max]` radians.
    Revolute {
        anchor_a: Vec2,
        anchor_b: Vec2,
        limits: Option<[f32; 2]>,
    },
    /// Rigidly locks both bodies together.
    Weld { anchor_a: Vec2, anchor_b: Vec2 },
    /// Free translation along `axis`, optionally limited to `[min, max]`.
    Prismatic {
        anchor_a: Vec2,
        anchor_b: Vec2,
        axis: Vec2,
        limits: Option<[f32; 2]>,
    },
}

/// A complete joint definition: what to build and between which bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct JointDef {
    pub params: JointParams,
    pub body_a: PhysicsBody,
    pub body_b: PhysicsBody,
    /// Whether the two connected bodies still collide with each other.
    pub collide_connected: bool,
    /// The joint that owns this definition.
    pub user_data: Option<JointId>,
}

impl JointDef {
    pub fn new(params: JointParams, body_a: PhysicsBody, body_b: PhysicsBody) -> Self {
        Self {
            params,
            body_a,
            body_b,
            collide_connected: false,
            user_data: None,
        }
    }

    fn build_generic(&self) -> GenericJoint {
        let mut joint: GenericJoint = match self.params {
            JointParams::Distance { anchor_a, anchor_b, rest_length, stiffness, damping } => {
                SpringJointBuilder::new(rest_length, stiffness, damping)
                    .local_anchor1(vec2_to_point(anchor_a))
                    .local_anchor2(vec2_to_point(anchor_b))
                    .build()
                    .into()
            }
            JointParams::Revolute { anchor_a, anchor_b, limits } => {
                let mut builder = RevoluteJointBuilder::new()
                    .local_anchor1(vec2_to_point(anchor_a))
                    .local_anchor2(vec2_to_point(anchor_b));
                if let Some(limits) = limits {
                    builder = builder.limits(limits);
                }
                builder.build().into()
            }
            JointParams::Weld { anchor_a, anchor_b } => FixedJointBuilder::new()
                .local_anchor1(vec2_to_point(anchor_a))
                .local_anchor2(vec2_to_point(anchor_b))
                .build()
                .into(),
            JointParams::Prismatic { anchor_a, anchor_b, axis, limits } => {
                // A zero axis cannot be normalized; slide along x instead
                let axis = nalgebra::Unit::try_new(vec2_to_na(axis), f32::EPSILON)
                    .unwrap_or_else(nalgebra::Vector2::x_axis);
                let mut builder = PrismaticJointBuilder::new(axis)
                    .local_anchor1(vec2_to_point(anchor_a))
                    .local_anchor2(vec2_to_point(anchor_b));
                if let Some(limits) = limits {
                    builder = builder.limits(limits);
                }
                builder.build().into()
            }
        };
        joint.set_contacts_enabled(self.collide_connected);
        joint
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single struct owned by a shape field.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    joint_owners: HashMap<JointHandle, JointId>,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            joint_owners: HashMap::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body + collider and return handles.
    /// The ShapeId is stored in the body's `user_data`.
    pub fn create_body(&mut self, shape_id: ShapeId, desc: &BodyDesc) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .rotation(desc.rotation)
            .user_data(shape_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider_handle = self.insert_collider(body_handle, &desc.collider, &desc.material);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    fn insert_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        collider: &ColliderDesc,
        material: &ColliderMaterial,
    ) -> ColliderHandle {
        let collider = collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .build();
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies)
    }

    /// Swap the body's collider for a new one, keeping the body and its joints.
    /// Returns the updated handle pair, or `None` if the body is gone.
    pub fn replace_collider(
        &mut self,
        body: &PhysicsBody,
        collider: ColliderDesc,
        material: ColliderMaterial,
    ) -> Option<PhysicsBody> {
        if !self.bodies.contains(body.body_handle) {
            return None;
        }
        self.colliders.remove(
            body.collider_handle,
            &mut self.island_manager,
            &mut self.bodies,
            true,
        );
        let collider_handle = self.insert_collider(body.body_handle, &collider, &material);
        Some(PhysicsBody {
            body_handle: body.body_handle,
            collider_handle,
        })
    }

    /// Geometry of the body's collider as it currently exists in the world.
    pub fn collider_shape(&self, body: &PhysicsBody) -> Option<ColliderDesc> {
        let shape = self.colliders.get(body.collider_handle)?.shape();
        if let Some(ball) = shape.as_ball() {
            return Some(ColliderDesc::Ball { radius: ball.radius });
        }
        shape.as_cuboid().map(|cuboid| ColliderDesc::Cuboid {
            half_width: cuboid.half_extents.x,
            half_height: cuboid.half_extents.y,
        })
    }

    /// Material of the body's collider as it currently exists in the world.
    pub fn collider_material(&self, body: &PhysicsBody) -> Option<ColliderMaterial> {
        self.colliders.get(body.collider_handle).map(|c| ColliderMaterial {
            restitution: c.restitution(),
            friction: c.friction(),
            density: c.density(),
        })
    }

    /// Remove a body, its colliders and every joint attached to it.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        let joints = &self.impulse_joints;
        self.joint_owners.retain(|handle, _| joints.get(handle.0).is_some());
    }

    /// Advance the simulation by one timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> Option<(Vec2, f32)> {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
    }

    /// Teleport a body to a new position, keeping its rotation.
    pub fn set_body_position(&mut self, body: &PhysicsBody, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec2_to_na(pos), true);
        }
    }

    /// Apply an instantaneous impulse to a body.
    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse(vec2_to_na(impulse), true);
        }
    }

    /// Whether the body still exists in this world.
    pub fn contains_body(&self, body: &PhysicsBody) -> bool {
        self.bodies.contains(body.body_handle)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- Joint methods --

    /// Instantiate the constraint described by `def`.
    pub fn create_joint(&mut self, def: &JointDef) -> JointHandle {
        let handle = JointHandle(self.impulse_joints.insert(
            def.body_a.body_handle,
            def.body_b.body_handle,
            def.build_generic(),
            true,
        ));
        if let Some(owner) = def.user_data {
            self.joint_owners.insert(handle, owner);
        }
        handle
    }

    /// Remove a joint from the simulation. Returns `false` if it was already gone.
    pub fn remove_joint(&mut self, handle: JointHandle) -> bool {
        self.joint_owners.remove(&handle);
        self.impulse_joints.remove(handle.0, true).is_some()
    }

    /// Whether the joint is still live in this world.
    pub fn contains_joint(&self, handle: JointHandle) -> bool {
        self.impulse_joints.get(handle.0).is_some()
    }

    /// The joint id stamped into the definition that created this constraint.
    pub fn joint_owner(&self, handle: JointHandle) -> Option<JointId> {
        self.joint_owners.get(&handle).copied()
    }

    /// Whether the bodies connected by this joint may collide.
    pub fn joint_contacts_enabled(&self, handle: JointHandle) -> Option<bool> {
        self.impulse_joints
            .get(handle.0)
            .map(|joint| joint.data.contacts_enabled())
    }

    /// Number of joints in the simulation.
    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
