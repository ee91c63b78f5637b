//! # combat-cards
//!
//! Visual state engine for combat cards in a tabletop companion app.
//!
//! Each combatant on the battlefield is a card: a name, movement and attack
//! values, a portrait and a colored health bar. Health changes are persisted
//! to a roster store before they are shown. When health crosses zero the card
//! runs a timed death transition (fade to grayscale, then two brush strokes
//! slide in) driven by a cooperative timeline.
//!
//! ## Design Principles
//!
//! 1. **Toolkit-Agnostic**: The compositor emits layered draw commands. The
//!    shell owns windows, fonts and painting.
//!
//! 2. **Single-Threaded**: All mutation happens on the thread that owns the
//!    `Engine`. Animation steps are values on a timeline, executed by `tick`.
//!
//! 3. **Persist First**: The store is written before memory is updated, so a
//!    failed write never leaves the card ahead of the record.
//!
//! ## Modules
//!
//! - `core`: IDs, colors, geometry, configuration, errors
//! - `gradient`: Health ratio to bar color
//! - `roster`: Templates, combatants, stores and the bestiary
//! - `health`: Clamped health deltas
//! - `animation`: Death-transition state machine, timeline and clocks
//! - `render`: Draw commands, resources and the card compositor
//! - `engine`: The context tying it all together

pub mod core;
pub mod gradient;
pub mod roster;
pub mod health;
pub mod animation;
pub mod render;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    EntityId, TemplateId,
    Color, Point, Rect, Size,
    AnimationConfig, CardLayout, CardTheme, EngineConfig,
    ConfigError, EngineError, EngineResult, ResourceError, StoreError,
};

pub use crate::gradient::{color_for, fill_for, HealthFill};

pub use crate::roster::{
    Bestiary, CombatEntity, EnemyTemplate, EntityRecord, EntityUpdate,
    FileStore, MemoryStore, Roster, RosterStore,
};

pub use crate::health::HealthChange;

pub use crate::animation::{
    AnimationPhase, AnimationState, Animator, Clock, ManualClock, SystemClock, VisualState,
};

pub use crate::render::{
    AverageAdvance, Bitmap, CardCompositor, CardFrame, DrawCommand, LayerKind,
    MemoryResources, ResourceProvider, TextMetrics,
};

pub use crate::engine::{Engine, EngineEvent, RedrawScope};
