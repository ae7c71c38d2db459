use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::api::config::{ConfigError, FieldConfig};
use crate::api::types::{FieldId, ShapeId};
use crate::core::physics::PhysicsWorld;
use crate::core::time::FixedTimestep;
use crate::renderer::traits::Canvas;
use crate::shapes::shape::{FieldLink, Shape};

/// Errors raised by [`ShapeField`] membership changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("shape {shape:?} already belongs to field {field:?}")]
    AlreadyInField { shape: ShapeId, field: FieldId },
}

/// Container owning a physics world and the shapes simulated in it.
///
/// Shapes are kept in insertion order, which is also the draw order.
/// Designed for small shape counts (hundreds, not millions).
pub struct ShapeField {
    id: FieldId,
    config: FieldConfig,
    world: Rc<RefCell<PhysicsWorld>>,
    shapes: Vec<Shape>,
    timestep: FixedTimestep,
}

impl ShapeField {
    /// Create a field, rejecting configs that fail [`FieldConfig::validate`].
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: FieldConfig) -> Self {
        let mut world = PhysicsWorld::new(config.gravity);
        world.set_dt(config.fixed_dt);
        let timestep = FixedTimestep::new(config.fixed_dt, config.max_steps_per_frame);
        Self {
            id: FieldId::next(),
            config,
            world: Rc::new(RefCell::new(world)),
            shapes: Vec::new(),
            timestep,
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Add a shape, creating its physics body from its current bounds.
    pub fn add(&mut self, shape: &Shape) -> Result<ShapeId, FieldError> {
        if let Some(field) = shape.field() {
            return Err(FieldError::AlreadyInField { shape: shape.id(), field });
        }

        let desc = shape.body_desc(self.config.material);
        let body = self.world.borrow_mut().create_body(shape.id(), &desc);
        shape.attach(FieldLink {
            field: self.id,
            world: Rc::downgrade(&self.world),
            body,
            default_material: self.config.material,
        });
        self.shapes.push(shape.clone());

        log::debug!("field {:?}: added shape {:?}", self.id, shape.id());
        Ok(shape.id())
    }

    /// Remove a shape and destroy its body, along with any joints attached
    /// to it. Returns `false` if the shape was not in this field.
    pub fn remove(&mut self, shape: &Shape) -> bool {
        let Some(idx) = self.shapes.iter().position(|s| s.ptr_eq(shape)) else {
            return false;
        };
        let removed = self.shapes.remove(idx);
        if let Some(link) = removed.detach() {
            self.world.borrow_mut().remove_body(&link.body);
        }
        log::debug!("field {:?}: removed shape {:?}", self.id, removed.id());
        true
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        let mut world = self.world.borrow_mut();
        for shape in self.shapes.drain(..) {
            if let Some(link) = shape.detach() {
                world.remove_body(&link.body);
            }
        }
    }

    pub fn contains(&self, shape: &Shape) -> bool {
        self.shapes.iter().any(|s| s.ptr_eq(shape))
    }

    /// Get a shape by ID.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Iterate over all shapes in draw order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    // -- Simulation --

    /// Run one physics step and move every shape to follow its body.
    pub fn step(&mut self) {
        self.world.borrow_mut().step();
        self.sync_shapes();
    }

    /// Feed a variable frame time into the fixed timestep and run the
    /// resulting number of steps. Returns how many steps ran.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let steps = self.timestep.accumulate(frame_dt);
        if steps == 0 {
            return 0;
        }
        {
            let mut world = self.world.borrow_mut();
            for _ in 0..steps {
                world.step();
            }
        }
        self.sync_shapes();
        steps
    }

    /// Draw every shape in insertion order.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for shape in &self.shapes {
            shape.draw(canvas);
        }
    }

    // -- Physics access --

    pub fn world(&self) -> Ref<'_, PhysicsWorld> {
        self.world.borrow()
    }

    pub fn world_mut(&self) -> RefMut<'_, PhysicsWorld> {
        self.world.borrow_mut()
    }

    pub fn body_count(&self) -> usize {
        self.world.borrow().body_count()
    }

    pub fn joint_count(&self) -> usize {
        self.world.borrow().joint_count()
    }

    fn sync_shapes(&self) {
        let world = self.world.borrow();
        for shape in &self.shapes {
            let Some(body) = shape.body() else { continue };
            if let Some((pos, rot)) = world.body_position(&body) {
                shape.sync_from_body(pos, rot);
            }
        }
    }
}

impl Default for ShapeField {
    fn default() -> Self {
        Self::with_valid_config(FieldConfig::default())
    }
}

impl Drop for ShapeField {
    fn drop(&mut self) {
        // Shapes can outlive the field; they must not keep claiming membership
        for shape in &self.shapes {
            shape.detach();
        }
    }
}
