use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_SHAPE_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_FIELD_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_JOINT_ID: AtomicU32 = AtomicU32::new(1);

/// Unique identifier for a shape. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl ShapeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Unique identifier for a shape field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl FieldId {
    pub(crate) fn next() -> Self {
        Self(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Unique identifier for a joint. Stamped into joint definitions as user data
/// so a live constraint can be traced back to the joint that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub u32);

impl JointId {
    pub(crate) fn next() -> Self {
        Self(NEXT_JOINT_ID.fetch_add(1, Ordering::Relaxed))
    }
}
