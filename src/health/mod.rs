//! Health mutation.
//!
//! `apply_delta` is the only path that changes a combatant's health. It
//! computes `clamp(hp + delta, 0, hp_max)`, persists the result with a
//! single store write and reports what happened as a `HealthChange`. The
//! engine reads that report to decide between a cheap health-bar redraw and
//! a full death transition.
//!
//! ## Zero-Crossing
//!
//! A change *crosses zero* when health goes from a positive value to exactly
//! zero in one call. Deltas that leave health at zero do not cross again,
//! so a death transition fires once per crossing.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::{EngineResult, EntityId};
use crate::roster::{Roster, RosterStore};

/// Outcome of one health mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthChange {
    pub id: EntityId,
    /// Delta as requested.
    pub delta: i32,
    pub before: i32,
    pub after: i32,
    pub hp_max: i32,
}

impl HealthChange {
    /// Health went from positive to zero.
    #[must_use]
    pub fn crossed_zero(&self) -> bool {
        self.before > 0 && self.after == 0
    }

    /// Health left zero.
    #[must_use]
    pub fn revived(&self) -> bool {
        self.before == 0 && self.after > 0
    }

    /// Health actually changed (the clamp may absorb a delta entirely).
    #[must_use]
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Apply a signed delta to a combatant's health.
///
/// Any delta is accepted; the result is clamped into `[0, hp_max]`. The new
/// value is written to the store even when the clamp leaves it unchanged,
/// keeping exactly one write per call.
///
/// Fails with `NotFound` for unknown ids and `Persistence` when the store
/// rejects the write; in both cases the roster is untouched.
pub fn apply_delta<S: RosterStore>(
    roster: &mut Roster<S>,
    id: EntityId,
    delta: i32,
) -> EngineResult<HealthChange> {
    let entity = match roster.get(id) {
        Ok(entity) => entity,
        Err(e) => {
            warn!("health change of {:+} for unknown {}", delta, id);
            return Err(e);
        }
    };
    let hp_max = entity.hp_max();
    let target = entity.hp().saturating_add(delta);

    let (before, after) = roster.set_hp(id, target)?;
    Ok(HealthChange { id, delta, before, after, hp_max })
}

/// Set health to an absolute value through the same clamp and write path.
pub fn set_hp<S: RosterStore>(roster: &mut Roster<S>, id: EntityId, hp: i32) -> EngineResult<HealthChange> {
    let current = roster.get(id)?.hp();
    apply_delta(roster, id, hp.saturating_sub(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineError, TemplateId};
    use crate::roster::{EnemyTemplate, MemoryStore};

    fn roster_with(hp: i32, hp_max: i32) -> (Roster<MemoryStore>, EntityId) {
        let mut roster = Roster::new(MemoryStore::new());
        let template = EnemyTemplate::new(TemplateId::new(1), "Ooze", 1, 2, hp_max).with_hp(hp);
        let id = roster.create(&template).unwrap().id();
        (roster, id)
    }

    #[test]
    fn test_decrement_to_zero_crosses() {
        let (mut roster, id) = roster_with(6, 6);
        let change = apply_delta(&mut roster, id, -6).unwrap();
        assert_eq!(change.after, 0);
        assert!(change.crossed_zero());
        assert!(!change.revived());
    }

    #[test]
    fn test_staying_at_zero_does_not_cross() {
        let (mut roster, id) = roster_with(0, 6);
        let change = apply_delta(&mut roster, id, -1).unwrap();
        assert_eq!(change.after, 0);
        assert!(!change.crossed_zero());
        assert!(!change.changed());
    }

    #[test]
    fn test_revive() {
        let (mut roster, id) = roster_with(0, 6);
        let change = apply_delta(&mut roster, id, 6).unwrap();
        assert_eq!(change.after, 6);
        assert!(change.revived());
    }

    #[test]
    fn test_extreme_deltas_clamp() {
        let (mut roster, id) = roster_with(3, 6);
        assert_eq!(apply_delta(&mut roster, id, i32::MAX).unwrap().after, 6);
        assert_eq!(apply_delta(&mut roster, id, i32::MIN).unwrap().after, 0);
    }

    #[test]
    fn test_one_write_per_call() {
        let (mut roster, id) = roster_with(6, 6);
        let writes = roster.store().write_count();
        apply_delta(&mut roster, id, 1).unwrap();
        apply_delta(&mut roster, id, -2).unwrap();
        assert_eq!(roster.store().write_count(), writes + 2);
    }

    #[test]
    fn test_unknown_id() {
        let (mut roster, _) = roster_with(6, 6);
        assert!(matches!(
            apply_delta(&mut roster, EntityId(77), -1),
            Err(EngineError::NotFound(EntityId(77)))
        ));
    }

    #[test]
    fn test_set_hp_absolute() {
        let (mut roster, id) = roster_with(6, 6);
        let change = set_hp(&mut roster, id, 2).unwrap();
        assert_eq!((change.before, change.after), (6, 2));
    }
}
