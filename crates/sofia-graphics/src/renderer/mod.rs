pub mod recording;
pub mod traits;

// Re-export key types for convenient access
pub use recording::{DrawCommand, RecordingCanvas};
pub use traits::{Canvas, Color, SpriteRef};
