//! Per-combatant animation state.
//!
//! The death transition is a fixed sequence of phases:
//!
//! ```text
//! Idle -> FadingToGray -> DeathMarkerPhase1 -> DeathMarkerPhase2 -> Idle (death marked)
//! ```
//!
//! Each animated phase runs `total_steps` discrete steps. After step `k` the
//! phase's interpolation factor is `k / total_steps`, reaching exactly 1 on
//! the last step, at which point the next phase begins at step 0.
//!
//! State is transient: it is never persisted, and it is dropped when the
//! combatant leaves the roster.

use serde::{Deserialize, Serialize};

/// Phase of the death transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationPhase {
    /// Nothing running.
    #[default]
    Idle,
    /// Background and portrait blend toward grayscale.
    FadingToGray,
    /// First brush stroke slides in from off the bottom-left corner.
    DeathMarkerPhase1,
    /// Second brush stroke slides in from off the top-left corner.
    DeathMarkerPhase2,
}

impl AnimationPhase {
    /// Does this phase run steps?
    #[must_use]
    pub fn is_animated(self) -> bool {
        !matches!(self, AnimationPhase::Idle)
    }

    /// Is a death-marker stroke sliding?
    #[must_use]
    pub fn is_death_marker_sliding(self) -> bool {
        matches!(self, AnimationPhase::DeathMarkerPhase1 | AnimationPhase::DeathMarkerPhase2)
    }

    /// Phase entered once this one completes.
    #[must_use]
    pub fn next(self) -> AnimationPhase {
        match self {
            AnimationPhase::Idle => AnimationPhase::Idle,
            AnimationPhase::FadingToGray => AnimationPhase::DeathMarkerPhase1,
            AnimationPhase::DeathMarkerPhase1 => AnimationPhase::DeathMarkerPhase2,
            AnimationPhase::DeathMarkerPhase2 => AnimationPhase::Idle,
        }
    }
}

impl std::fmt::Display for AnimationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnimationPhase::Idle => "Idle",
            AnimationPhase::FadingToGray => "FadingToGray",
            AnimationPhase::DeathMarkerPhase1 => "DeathMarkerPhase1",
            AnimationPhase::DeathMarkerPhase2 => "DeathMarkerPhase2",
        };
        f.write_str(name)
    }
}

/// Identifies one run of the death transition.
///
/// Scheduled steps carry the token of the run that scheduled them. Starting
/// a new run or cancelling hands out or forgets tokens, so steps left over
/// from an older run no longer match and do nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnimationToken(pub u64);

/// Animation state of one combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationState {
    pub phase: AnimationPhase,
    /// Steps completed in the current phase.
    pub step: u32,
    /// Steps per animated phase.
    pub total_steps: u32,
    pub token: AnimationToken,
    /// The transition ran to completion; the card keeps its final frame.
    pub death_marked: bool,
}

impl AnimationState {
    /// A run about to start fading.
    #[must_use]
    pub fn fading(token: AnimationToken, total_steps: u32) -> Self {
        Self {
            phase: AnimationPhase::FadingToGray,
            step: 0,
            total_steps: total_steps.max(1),
            token,
            death_marked: false,
        }
    }

    /// The terminal state, as if a run had just completed.
    #[must_use]
    pub fn death_marked(token: AnimationToken, total_steps: u32) -> Self {
        Self {
            phase: AnimationPhase::Idle,
            step: 0,
            total_steps: total_steps.max(1),
            token,
            death_marked: true,
        }
    }

    /// Interpolation factor of the current phase, `step / total_steps`.
    #[must_use]
    pub fn factor(&self) -> f32 {
        (self.step as f32 / self.total_steps.max(1) as f32).clamp(0.0, 1.0)
    }

    /// Is a run still in progress?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase.is_animated()
    }

    /// What the compositor should show for this state.
    #[must_use]
    pub fn visual(&self) -> VisualState {
        match self.phase {
            AnimationPhase::Idle if self.death_marked => VisualState::DEATH_MARKED,
            AnimationPhase::Idle => VisualState::NORMAL,
            AnimationPhase::FadingToGray => VisualState {
                gray: self.factor(),
                first_stroke: None,
                second_stroke: None,
            },
            AnimationPhase::DeathMarkerPhase1 => VisualState {
                gray: 1.0,
                first_stroke: Some(self.factor()),
                second_stroke: None,
            },
            AnimationPhase::DeathMarkerPhase2 => VisualState {
                gray: 1.0,
                first_stroke: Some(1.0),
                second_stroke: Some(self.factor()),
            },
        }
    }
}

/// Animation-dependent part of a card's look.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Blend of background and portrait toward grayscale, 0 to 1.
    pub gray: f32,
    /// Progress of the first brush stroke along its path, if shown.
    pub first_stroke: Option<f32>,
    /// Progress of the second brush stroke along its path, if shown.
    pub second_stroke: Option<f32>,
}

impl VisualState {
    /// Full color, no marker.
    pub const NORMAL: VisualState = VisualState {
        gray: 0.0,
        first_stroke: None,
        second_stroke: None,
    };

    /// Fully gray with both strokes at rest.
    pub const DEATH_MARKED: VisualState = VisualState {
        gray: 1.0,
        first_stroke: Some(1.0),
        second_stroke: Some(1.0),
    };

    /// Visual state of an optional animation state.
    #[must_use]
    pub fn of(state: Option<&AnimationState>) -> VisualState {
        state.map_or(VisualState::NORMAL, AnimationState::visual)
    }
}

impl Default for VisualState {
    fn default() -> Self {
        VisualState::NORMAL
    }
}
