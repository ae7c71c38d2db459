pub mod error;
pub mod joint;
pub mod kinds;

pub use error::JointError;
pub use joint::{Connection, Joint};
pub use kinds::{Distance, JointKind, Prismatic, Revolute, Weld};

pub type DistanceJoint = Joint<Distance>;
pub type RevoluteJoint = Joint<Revolute>;
pub type WeldJoint = Joint<Weld>;
pub type PrismaticJoint = Joint<Prismatic>;
