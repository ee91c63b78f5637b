//! Engine context and the events it reports.

mod context;
mod event;

pub use context::Engine;
pub use event::{EngineEvent, RedrawScope};
