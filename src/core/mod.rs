//! Core value types: identifiers, colors, geometry, configuration, errors.
//!
//! Everything here is plain data shared by the roster, the compositor and
//! the animation scheduler.

pub mod id;
pub mod color;
pub mod geometry;
pub mod config;
pub mod error;

pub use id::{EntityId, TemplateId};
pub use color::Color;
pub use geometry::{Point, Rect, Size};
pub use config::{AnimationConfig, CardLayout, CardTheme, EngineConfig, CARD_SCALE};
pub use error::{ConfigError, EngineError, EngineResult, ResourceError, StoreError};
