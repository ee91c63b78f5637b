//! Card rendering.
//!
//! - `command`: toolkit-agnostic draw commands, layers and frames
//! - `resources`: bitmaps, the asset provider contract, text metrics
//! - `compositor`: entity state in, layered frame out

pub mod command;
pub mod resources;
pub mod compositor;

pub use command::{Anchor, CardFrame, Commands, DrawCommand, Font, Layer, LayerKind};
pub use resources::{
    assets, AverageAdvance, Bitmap, MemoryResources, ResourceProvider, TextMetrics, PLACEHOLDER_COLOR,
};
pub use compositor::CardCompositor;
