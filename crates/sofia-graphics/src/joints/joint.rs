use std::cell::RefCell;
use std::rc::Weak;

use crate::api::types::{FieldId, JointId};
use crate::core::physics::{JointDef, JointHandle, PhysicsBody, PhysicsWorld};
use crate::joints::error::JointError;
use crate::joints::kinds::JointKind;
use crate::shapes::shape::{FieldLink, Shape, WeakShape};

/// The constraint created by a successful `connect`.
#[derive(Debug, Clone)]
struct LiveJoint {
    handle: JointHandle,
    field: FieldId,
    world: Weak<RefCell<PhysicsWorld>>,
}

impl LiveJoint {
    /// False once the world is gone or the constraint was destroyed under us
    /// (e.g. one of the shapes was removed from its field).
    fn is_alive(&self) -> bool {
        self.world
            .upgrade()
            .is_some_and(|world| world.borrow().contains_joint(self.handle))
    }
}

/// A constraint between two shapes, created in a shape field's physics world.
///
/// A joint starts disconnected, holding only weak references to its shapes
/// and the collision flag. [`connect`](Joint::connect) checks that both
/// shapes exist and live in the same field, then asks that field's world to
/// build the constraint; [`disconnect`](Joint::disconnect) destroys it.
/// Both are no-ops when already in the target state.
///
/// The joint definition is built lazily the first time it is needed and
/// cached. It is a snapshot: [`set_can_shapes_collide`](Joint::set_can_shapes_collide)
/// does not touch a cached definition, but every `connect` re-stamps the
/// current flag and bodies into it before creating the constraint. A live
/// constraint is never changed retroactively.
///
/// Dropping a connected joint leaves its constraint in the world; call
/// `disconnect` first.
///
/// Do not hold a borrow of the field's world (`ShapeField::world`) across
/// `connect`/`disconnect`.
pub struct Joint<K: JointKind> {
    id: JointId,
    kind: K,
    first: WeakShape,
    second: WeakShape,
    collide_connected: bool,
    definition: Option<JointDef>,
    live: Option<LiveJoint>,
}

impl<K: JointKind> Joint<K> {
    /// Create a disconnected joint between two shapes.
    pub fn new(kind: K, first: &Shape, second: &Shape) -> Self {
        Self::with_shapes(kind, Some(first), Some(second))
    }

    /// Create a disconnected joint where either shape may be missing.
    /// Connecting fails until both are present.
    pub fn with_shapes(kind: K, first: Option<&Shape>, second: Option<&Shape>) -> Self {
        Self {
            id: JointId::next(),
            kind,
            first: first.map(Shape::downgrade).unwrap_or_default(),
            second: second.map(Shape::downgrade).unwrap_or_default(),
            collide_connected: false,
            definition: None,
            live: None,
        }
    }

    pub fn id(&self) -> JointId {
        self.id
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Mutable access to the kind's parameters. Discards the cached
    /// definition so the next `connect` picks the changes up.
    pub fn kind_mut(&mut self) -> &mut K {
        self.definition = None;
        &mut self.kind
    }

    pub fn first_shape(&self) -> Option<Shape> {
        self.first.upgrade()
    }

    pub fn second_shape(&self) -> Option<Shape> {
        self.second.upgrade()
    }

    /// Whether the two connected shapes may still collide with each other.
    pub fn can_shapes_collide(&self) -> bool {
        self.collide_connected
    }

    /// Takes effect on the next `connect`.
    pub fn set_can_shapes_collide(&mut self, collide: bool) {
        self.collide_connected = collide;
    }

    pub fn is_connected(&self) -> bool {
        self.live.is_some()
    }

    /// Handle of the live constraint while connected.
    pub fn live_handle(&self) -> Option<JointHandle> {
        self.live.as_ref().map(|live| live.handle)
    }

    /// The field the live constraint belongs to while connected.
    pub fn connected_field(&self) -> Option<FieldId> {
        self.live.as_ref().map(|live| live.field)
    }

    /// The cached definition, if one has been built.
    pub fn cached_definition(&self) -> Option<&JointDef> {
        self.definition.as_ref()
    }

    /// The joint definition, built and cached on first access.
    ///
    /// Unlike the other accessors this one can fail. Building needs both
    /// shapes' physics bodies, so until the shapes share a field it returns
    /// the same [`JointError`] that `connect` would. Once cached, the same
    /// value is returned untouched and the call always succeeds.
    pub fn joint_definition(&mut self) -> Result<&JointDef, JointError> {
        let def = match self.definition.take() {
            Some(def) => def,
            None => {
                let (a, b) = self.resolve()?;
                self.build_definition(a.body, b.body)
            }
        };
        Ok(self.definition.insert(def))
    }

    /// Create the constraint in the shapes' field.
    pub fn connect(&mut self) -> Result<(), JointError> {
        if let Some(live) = &self.live {
            if live.is_alive() {
                return Ok(());
            }
            log::debug!("{} joint {:?}: dropping stale constraint", K::NAME, self.id);
            self.live = None;
        }

        let (a, b) = match self.resolve() {
            Ok(links) => links,
            Err(err) => {
                log::warn!("{} joint {:?}: cannot connect: {}", K::NAME, self.id, err);
                return Err(err);
            }
        };
        let world = a.world.upgrade().ok_or(JointError::FieldGone(a.field))?;

        let mut def = match self.definition.take() {
            Some(def) => def,
            None => self.build_definition(a.body, b.body),
        };
        def.body_a = a.body;
        def.body_b = b.body;
        def.collide_connected = self.collide_connected;

        let handle = world.borrow_mut().create_joint(&def);
        self.definition = Some(def);
        self.live = Some(LiveJoint {
            handle,
            field: a.field,
            world: a.world,
        });

        log::debug!("{} joint {:?}: connected in field {:?}", K::NAME, self.id, a.field);
        Ok(())
    }

    /// Destroy the constraint, if any. Never fails.
    pub fn disconnect(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        if let Some(world) = live.world.upgrade() {
            world.borrow_mut().remove_joint(live.handle);
        }
        log::debug!("{} joint {:?}: disconnected", K::NAME, self.id);
    }

    fn build_definition(&self, body_a: PhysicsBody, body_b: PhysicsBody) -> JointDef {
        let mut def = self.kind.create_definition(body_a, body_b);
        def.collide_connected = self.collide_connected;
        def.user_data = Some(self.id);
        def
    }

    /// Check the shape/field wiring and return both shapes' field links.
    fn resolve(&self) -> Result<(FieldLink, FieldLink), JointError> {
        let first = self.first.upgrade().ok_or(JointError::MissingShape)?;
        let second = self.second.upgrade().ok_or(JointError::MissingShape)?;
        if first.ptr_eq(&second) {
            return Err(JointError::SameShape(first.id()));
        }

        let a = first.link().ok_or(JointError::NotInField(first.id()))?;
        let b = second.link().ok_or(JointError::NotInField(second.id()))?;
        if a.field != b.field {
            return Err(JointError::DifferentFields {
                first: a.field,
                second: b.field,
            });
        }
        Ok((a, b))
    }
}

impl<K: JointKind> std::fmt::Debug for Joint<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Joint")
            .field("kind", &K::NAME)
            .field("id", &self.id)
            .field("first", &self.first)
            .field("second", &self.second)
            .field("collide_connected", &self.collide_connected)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Object-safe view of the joint lifecycle, so joints of different kinds
/// can be stored and driven together.
pub trait Connection {
    fn id(&self) -> JointId;

    fn connect(&mut self) -> Result<(), JointError>;

    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    fn first_shape(&self) -> Option<Shape>;

    fn second_shape(&self) -> Option<Shape>;
}

impl<K: JointKind> Connection for Joint<K> {
    fn id(&self) -> JointId {
        Joint::id(self)
    }

    fn connect(&mut self) -> Result<(), JointError> {
        Joint::connect(self)
    }

    fn disconnect(&mut self) {
        Joint::disconnect(self)
    }

    fn is_connected(&self) -> bool {
        Joint::is_connected(self)
    }

    fn first_shape(&self) -> Option<Shape> {
        Joint::first_shape(self)
    }

    fn second_shape(&self) -> Option<Shape> {
        Joint::second_shape(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::ShapeField;
    use crate::joints::kinds::{Distance, Prismatic, Revolute, Weld};
    use crate::core::physics::JointParams;
    use crate::shapes::rect::Rect;
    use glam::Vec2;

    #[test]
    fn revolute_limits_reach_definition_and_connect() {
        let (field, a, b) = field_with_pair();
        let mut joint = Joint::new(Revolute::new(Vec2::ZERO, Vec2::new(-50.0, 0.0)).with_limits(-0.5, 0.5), &a, &b);
        let def = joint.joint_definition().unwrap();
        assert!(matches!(def.params, JointParams::Revolute { limits: Some([min, max]), .. } if min == -0.5 && max == 0.5));

        joint.connect().unwrap();
        assert_eq!(field.joint_count(), 1);
    }

    #[test]
    fn prismatic_limits_reach_definition_and_connect() {
        let (field, a, b) = field_with_pair();
        let mut joint = Joint::new(Prismatic::new(Vec2::X).with_limits(0.0, 30.0), &a, &b);
        let def = joint.joint_definition().unwrap();
        assert!(matches!(def.params, JointParams::Prismatic { limits: Some([min, max]), .. } if min == 0.0 && max == 30.0));

        joint.connect().unwrap();
        assert_eq!(field.joint_count(), 1);
    }

    fn field_with_pair() -> (ShapeField, Shape, Shape) {
        let mut field = ShapeField::default();
        let a = Shape::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::new(Rect::new(50.0, 0.0, 60.0, 10.0));
        field.add(&a).unwrap();
        field.add(&b).unwrap();
        (field, a, b)
    }

    #[test]
    fn connect_creates_constraint_once() {
        let (field, a, b) = field_with_pair();
        let mut joint = Joint::new(Distance::new(50.0), &a, &b);
        assert!(!joint.is_connected());

        joint.connect().unwrap();
        let handle = joint.live_handle();
        joint.connect().unwrap();

        assert_eq!(field.joint_count(), 1);
        assert_eq!(joint.live_handle(), handle);
        assert_eq!(joint.connected_field(), Some(field.id()));
    }

    #[test]
    fn disconnect_then_reconnect() {
        let (field, a, b) = field_with_pair();
        let mut joint = Joint::new(Revolute::new(Vec2::ZERO, Vec2::new(-50.0, 0.0)), &a, &b);

        joint.connect().unwrap();
        joint.disconnect();
        assert!(!joint.is_connected());
        assert_eq!(joint.live_handle(), None);
        assert_eq!(field.joint_count(), 0);

        joint.connect().unwrap();
        assert!(joint.is_connected());
        assert_eq!(field.joint_count(), 1);
    }

    #[test]
    fn disconnect_when_never_connected_is_noop() {
        let (field, a, b) = field_with_pair();
        let mut joint = Joint::new(Weld::default(), &a, &b);
        joint.disconnect();
        assert!(!joint.is_connected());
        assert_eq!(field.joint_count(), 0);
        assert!(joint.cached_definition().is_none());
    }

    #[test]
    fn missing_shape_is_rejected() {
        let (field, a, _b) = field_with_pair();
        let mut joint = Joint::with_shapes(Weld::default(), Some(&a), None);
        assert_eq!(joint.connect(), Err(JointError::MissingShape));

        let mut joint = Joint::with_shapes(Weld::default(), None, Some(&a));
        assert_eq!(joint.connect(), Err(JointError::MissingShape));
        assert_eq!(field.joint_count(), 0);
    }

    #[test]
    fn dropped_shape_counts_as_missing() {
        let mut field = ShapeField::default();
        let a = Shape::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        field.add(&a).unwrap();
        let mut joint = {
            let b = Shape::new(Rect::new(20.0, 0.0, 30.0, 10.0));
            Joint::new(Weld::default(), &a, &b)
        };
        assert!(joint.second_shape().is_none());
        assert_eq!(joint.connect(), Err(JointError::MissingShape));
    }

    #[test]
    fn shapes_outside_a_field_are_rejected() {
        let a = Shape::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::new(Rect::new(20.0, 0.0, 30.0, 10.0));
        let mut joint = Joint::new(Weld::default(), &a, &b);
        assert_eq!(joint.connect(), Err(JointError::NotInField(a.id())));

        let mut field = ShapeField::default();
        field.add(&a).unwrap();
        assert_eq!(joint.connect(), Err(JointError::NotInField(b.id())));
        assert!(!joint.is_connected());
    }

    #[test]
    fn shapes_in_different_fields_are_rejected() {
        let mut first = ShapeField::default();
        let mut second = ShapeField::default();
        let a = Shape::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::new(Rect::new(20.0, 0.0, 30.0, 10.0));
        first.add(&a).unwrap();
        second.add(&b).unwrap();

        let mut joint = Joint::new(Distance::new(20.0), &a, &b);
        assert_eq!(
            joint.connect(),
            Err(JointError::DifferentFields { first: first.id(), second: second.id() })
        );
        assert_eq!(first.joint_count() + second.joint_count(), 0);
    }

    #[test]
    fn shape_cannot_be_joined_to_itself() {
        let (_field, a, _b) = field_with_pair();
        let mut joint = Joint::new(Weld::default(), &a, &a);
        assert_eq!(joint.connect(), Err(JointError::SameShape(a.id())));
    }

    #[test]
    fn definition_is_cached_and_stamped() {
        let (_field, a, b) = field_with_pair();
        let mut joint = Joint::new(Prismatic::new(Vec2::X), &a, &b);

        let first = joint.joint_definition().unwrap() as *const JointDef;
        let second = joint.joint_definition().unwrap() as *const JointDef;
        assert_eq!(first, second);

        let id = joint.id();
        let def = joint.joint_definition().unwrap();
        assert_eq!(def.user_data, Some(id));
        assert_eq!(def.body_a, a.body().unwrap());
        assert_eq!(def.body_b, b.body().unwrap());
        assert!(!def.collide_connected);
    }

    #[test]
    fn collide_flag_is_snapshot_until_next_connect() {
        let (field, a, b) = field_with_pair();
        let mut joint = Joint::new(Weld::default(), &a, &b);

        assert!(!joint.joint_definition().unwrap().collide_connected);
        joint.set_can_shapes_collide(true);
        assert!(joint.can_shapes_collide());
        assert!(!joint.joint_definition().unwrap().collide_connected);

        joint.connect().unwrap();
        let handle = joint.live_handle().unwrap();
        assert_eq!(field.world().joint_contacts_enabled(handle), Some(true));
        assert_eq!(field.world().joint_owner(handle), Some(joint.id()));
        assert!(joint.cached_definition().unwrap().collide_connected);

        // The live constraint is not touched by later flag changes
        joint.set_can_shapes_collide(false);
        assert_eq!(field.world().joint_contacts_enabled(handle), Some(true));
    }

    #[test]
    fn definition_needs_field_wiring() {
        let a = Shape::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::new(Rect::new(20.0, 0.0, 30.0, 10.0));
        let mut joint = Joint::new(Weld::default(), &a, &b);
        assert_eq!(joint.joint_definition().err(), Some(JointError::NotInField(a.id())));
        assert!(joint.cached_definition().is_none());
    }

    #[test]
    fn kind_mut_discards_cached_definition() {
        let (_field, a, b) = field_with_pair();
        let mut joint = Joint::new(Distance::new(10.0), &a, &b);
        joint.joint_definition().unwrap();

        joint.kind_mut().length = 40.0;
        assert!(joint.cached_definition().is_none());
        match joint.joint_definition().unwrap().params {
            crate::core::physics::JointParams::Distance { rest_length, .. } => {
                assert_eq!(rest_length, 40.0)
            }
            other => panic!("expected Distance, got {:?}", other),
        }
    }

    #[test]
    fn removing_a_shape_invalidates_the_joint() {
        let (mut field, a, b) = field_with_pair();
        let mut joint = Joint::new(Weld::default(), &a, &b);
        joint.connect().unwrap();

        field.remove(&a);
        assert_eq!(field.joint_count(), 0);
        assert_eq!(joint.connect(), Err(JointError::NotInField(a.id())));
        assert!(!joint.is_connected());
        joint.disconnect();
    }

    #[test]
    fn connections_of_mixed_kinds() {
        let (field, a, b) = field_with_pair();
        let mut joints: Vec<Box<dyn Connection>> = vec![
            Box::new(Joint::new(Distance::new(50.0), &a, &b)),
            Box::new(Joint::new(Revolute::default(), &a, &b)),
        ];
        for joint in joints.iter_mut() {
            joint.connect().unwrap();
        }
        assert_eq!(field.joint_count(), 2);
        assert!(joints.iter().all(|j| j.is_connected()));
        assert_eq!(joints[0].first_shape(), Some(a.clone()));

        for joint in joints.iter_mut() {
            joint.disconnect();
        }
        assert_eq!(field.joint_count(), 0);
    }
}
