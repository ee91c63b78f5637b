//! Engine events.
//!
//! The engine never calls into the shell. It records what happened as
//! `EngineEvent`s and the shell drains them after each command or tick to
//! learn which cards to repaint and how much of them.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationPhase;
use crate::core::EntityId;
use crate::health::HealthChange;

/// How much of a card needs repainting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedrawScope {
    /// Only the health-bar layer changed.
    HealthBar,
    /// Recompose the whole card.
    Full,
}

/// Something the shell may want to react to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A combatant joined the roster.
    Spawned(EntityId),
    /// A combatant left the roster.
    Removed(EntityId),
    /// Health was set (possibly to the same value).
    HealthChanged(HealthChange),
    /// A card needs repainting.
    Redraw { id: EntityId, scope: RedrawScope },
    /// Health crossed zero; the fade has been scheduled.
    DeathTransitionStarted(EntityId),
    /// The death transition entered a new animated phase.
    PhaseAdvanced { id: EntityId, phase: AnimationPhase },
    /// The death transition ran to completion.
    AnimationFinished(EntityId),
}

impl EngineEvent {
    /// Combatant the event concerns.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        match self {
            EngineEvent::Spawned(id)
            | EngineEvent::Removed(id)
            | EngineEvent::DeathTransitionStarted(id)
            | EngineEvent::AnimationFinished(id) => *id,
            EngineEvent::HealthChanged(change) => change.id,
            EngineEvent::Redraw { id, .. } | EngineEvent::PhaseAdvanced { id, .. } => *id,
        }
    }

    /// Repaint scope, for redraw events.
    #[must_use]
    pub fn redraw_scope(&self) -> Option<RedrawScope> {
        match self {
            EngineEvent::Redraw { scope, .. } => Some(*scope),
            _ => None,
        }
    }
}
