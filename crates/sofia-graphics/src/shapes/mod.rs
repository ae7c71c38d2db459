pub mod drawable;
pub mod rect;
pub mod shape;

pub use drawable::{ColorDrawable, Drawable, DrawableShape, SpriteDrawable};
pub use rect::{IRect, Rect};
pub use shape::{Shape, ShapeOutline, WeakShape};
