pub mod field;
pub mod physics;
pub mod time;
