//! Health mutation integration tests.
//!
//! These tests verify clamping for arbitrary deltas, the one-write-per-call
//! rule, and that a store failure leaves the engine exactly as it was.

use std::cell::Cell;
use std::rc::Rc;

use combat_cards::animation::ManualClock;
use combat_cards::core::{EngineConfig, EngineError, EntityId, StoreError, TemplateId};
use combat_cards::engine::{Engine, EngineEvent, RedrawScope};
use combat_cards::health;
use combat_cards::roster::{EnemyTemplate, EntityRecord, EntityUpdate, MemoryStore, Roster, RosterStore};
use proptest::prelude::*;

/// Memory store whose updates can be made to fail from outside.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_updates: Rc<Cell<bool>>,
}

impl RosterStore for FlakyStore {
    fn create(&mut self, record: &EntityRecord) -> Result<EntityId, StoreError> {
        self.inner.create(record)
    }

    fn read(&self, id: EntityId) -> Result<Option<EntityRecord>, StoreError> {
        self.inner.read(id)
    }

    fn update(&mut self, id: EntityId, update: &EntityUpdate) -> Result<(), StoreError> {
        if self.fail_updates.get() {
            return Err(StoreError::Rejected("disk full".to_string()));
        }
        self.inner.update(id, update)
    }

    fn delete(&mut self, id: EntityId) -> Result<(), StoreError> {
        self.inner.delete(id)
    }

    fn list_all(&self) -> Result<Vec<(EntityId, EntityRecord)>, StoreError> {
        self.inner.list_all()
    }
}

fn bandit(hp_max: i32, hp: i32) -> EnemyTemplate {
    EnemyTemplate::new(TemplateId::new(7), "Bandit Archer", 2, 3, hp_max).with_hp(hp)
}

// =============================================================================
// Clamping
// =============================================================================

/// Test the boundary cases of the clamp.
#[test]
fn test_clamp_boundaries() {
    let mut roster = Roster::new(MemoryStore::new());
    let id = roster.create(&bandit(6, 6)).unwrap().id();

    let change = health::apply_delta(&mut roster, id, 1).unwrap();
    assert_eq!((change.before, change.after), (6, 6));
    assert!(!change.changed());

    let change = health::apply_delta(&mut roster, id, -100).unwrap();
    assert_eq!(change.after, 0);
    assert!(change.crossed_zero());

    let change = health::apply_delta(&mut roster, id, -1).unwrap();
    assert_eq!(change.after, 0);
    assert!(!change.crossed_zero(), "staying at zero is not a new crossing");

    let change = health::apply_delta(&mut roster, id, i32::MAX).unwrap();
    assert_eq!(change.after, 6);
    assert!(change.revived());
}

/// Test that the persisted record follows the clamped value.
#[test]
fn test_store_holds_clamped_value() {
    let mut roster = Roster::new(MemoryStore::new());
    let id = roster.create(&bandit(6, 2)).unwrap().id();

    health::apply_delta(&mut roster, id, -5).unwrap();
    let record = roster.store().read(id).unwrap().unwrap();
    assert_eq!(record.hp, 0);
}

/// Test that unknown ids fail without writing.
#[test]
fn test_unknown_id() {
    let mut roster = Roster::new(MemoryStore::new());
    let result = health::apply_delta(&mut roster, EntityId(99), -1);
    assert!(matches!(result, Err(EngineError::NotFound(EntityId(99)))));
    assert_eq!(roster.store().write_count(), 0);
}

proptest! {
    /// Test that any delta lands inside [0, hp_max] with one write.
    #[test]
    fn test_any_delta_is_clamped(
        hp_max in 1i32..60,
        start in 0i32..60,
        delta in any::<i32>(),
    ) {
        let start = start.min(hp_max);
        let mut roster = Roster::new(MemoryStore::new());
        let id = roster.create(&bandit(hp_max, start)).unwrap().id();
        let writes = roster.store().write_count();

        let change = health::apply_delta(&mut roster, id, delta).unwrap();
        let expected = start.saturating_add(delta).clamp(0, hp_max);

        prop_assert_eq!(change.after, expected);
        prop_assert_eq!(roster.get(id).unwrap().hp(), expected);
        prop_assert_eq!(roster.store().write_count(), writes + 1);
    }

    /// Test that a sequence of deltas never escapes the range.
    #[test]
    fn test_delta_sequence_stays_in_range(deltas in prop::collection::vec(-8i32..8, 1..40)) {
        let mut roster = Roster::new(MemoryStore::new());
        let id = roster.create(&bandit(6, 6)).unwrap().id();
        for delta in deltas {
            let change = health::apply_delta(&mut roster, id, delta).unwrap();
            prop_assert!((0..=6).contains(&change.after));
        }
    }
}

// =============================================================================
// Persistence failure
// =============================================================================

/// Test that a failed write leaves memory, animation and events untouched.
#[test]
fn test_failed_write_changes_nothing() {
    let store = FlakyStore::default();
    let fail = Rc::clone(&store.fail_updates);
    let mut engine = Engine::new(store, EngineConfig::default(), ManualClock::new()).unwrap();
    let id = engine.spawn(&bandit(6, 1)).unwrap();
    engine.drain_events();

    fail.set(true);
    let err = engine.on_decrement(id).unwrap_err();
    assert!(matches!(err, EngineError::Persistence(StoreError::Rejected(_))));
    assert_eq!(engine.entity(id).unwrap().hp(), 1);
    assert!(engine.animation(id).is_none());
    assert_eq!(engine.animator().pending_steps(), 0);
    assert!(engine.drain_events().is_empty());

    // Once the store recovers the same command goes through.
    fail.set(false);
    let change = engine.on_decrement(id).unwrap();
    assert!(change.crossed_zero());
    assert!(engine.drain_events().contains(&EngineEvent::DeathTransitionStarted(id)));
}

/// Test that each command writes exactly once, even when clamped.
#[test]
fn test_one_write_per_command() {
    let mut engine = Engine::new(MemoryStore::new(), EngineConfig::default(), ManualClock::new()).unwrap();
    let id = engine.spawn(&bandit(6, 6)).unwrap();
    let base = engine.roster().store().write_count();

    engine.on_increment(id).unwrap();
    engine.on_decrement(id).unwrap();
    engine.apply_delta(id, -50).unwrap();
    assert_eq!(engine.roster().store().write_count(), base + 3);
    assert_eq!(
        engine.drain_events().last(),
        Some(&EngineEvent::Redraw { id, scope: RedrawScope::Full })
    );
}
