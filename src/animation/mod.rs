//! Frame-stepped death transition.
//!
//! - `state`: phases, per-combatant state and the derived `VisualState`
//! - `timeline`: the cooperative queue of deferred steps
//! - `clock`: injectable time sources
//! - `animator`: the state machine tying them together
//!
//! Nothing here spawns threads or sleeps. The owner calls `pump` with the
//! current time (or `fast_forward` in tests) from its own loop.

pub mod state;
pub mod timeline;
pub mod clock;
pub mod animator;

pub use state::{AnimationPhase, AnimationState, AnimationToken, VisualState};
pub use timeline::{ScheduledStep, Timeline};
pub use clock::{Clock, ManualClock, SystemClock};
pub use animator::{Animator, StepOutcome};
