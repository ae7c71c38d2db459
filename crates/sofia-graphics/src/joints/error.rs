use crate::api::types::{FieldId, ShapeId};

/// A joint was asked to connect shapes that are not wired up correctly.
///
/// Every variant is a caller bug, not a transient failure: retrying without
/// fixing the shape/field wiring fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JointError {
    #[error("the shapes being connected by the joint must be non-null")]
    MissingShape,

    #[error("the shapes being connected by the joint must be added to a shape field ({0:?} is not)")]
    NotInField(ShapeId),

    #[error("the shapes being connected by the joint must be in the same shape field (got {first:?} and {second:?})")]
    DifferentFields { first: FieldId, second: FieldId },

    #[error("a joint cannot connect {0:?} to itself")]
    SameShape(ShapeId),

    #[error("shape field {0:?} no longer exists")]
    FieldGone(FieldId),
}
