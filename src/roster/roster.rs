//! The in-memory roster, kept in step with its store.
//!
//! Every mutation goes to the store first and is applied in memory only once
//! the store has accepted it. A failed write therefore leaves the roster as
//! it was; `resync` re-reads a record if the shell suspects drift.

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::core::{EngineError, EngineResult, EntityId, StoreError};

use super::entity::{clamp_hp, CombatEntity, EnemyTemplate, EntityRecord, EntityUpdate};
use super::store::RosterStore;

/// Combatants on the battlefield.
#[derive(Debug)]
pub struct Roster<S: RosterStore> {
    store: S,
    entities: FxHashMap<EntityId, CombatEntity>,
    /// Ids in creation order.
    order: Vec<EntityId>,
}

impl<S: RosterStore> Roster<S> {
    /// Create an empty roster over a store. Existing records are ignored;
    /// use `load` to pick them up.
    pub fn new(store: S) -> Self {
        Self {
            store,
            entities: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Create a roster holding every record already in the store.
    pub fn load(store: S) -> EngineResult<Self> {
        let records = store.list_all()?;
        let mut roster = Self::new(store);
        for (id, record) in records {
            roster.insert(CombatEntity::from_record(id, &record));
        }
        info!("loaded {} combatants from store", roster.len());
        Ok(roster)
    }

    fn insert(&mut self, entity: CombatEntity) {
        let id = entity.id();
        if self.entities.insert(id, entity).is_none() {
            self.order.push(id);
        }
    }

    /// Spawn a combatant from a template.
    pub fn create(&mut self, template: &EnemyTemplate) -> EngineResult<&CombatEntity> {
        self.create_from_record(&template.to_record())
    }

    /// Spawn a combatant from a raw record.
    pub fn create_from_record(&mut self, record: &EntityRecord) -> EngineResult<&CombatEntity> {
        let id = self.store.create(record)?;
        let entity = CombatEntity::from_record(id, record);
        info!("spawned {} '{}' ({}/{} hp)", id, entity.name(), entity.hp(), entity.hp_max());
        self.insert(entity);
        self.entities.get(&id).ok_or(EngineError::NotFound(id))
    }

    /// Look up a combatant.
    pub fn get(&self, id: EntityId) -> EngineResult<&CombatEntity> {
        self.entities.get(&id).ok_or(EngineError::NotFound(id))
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Combatants in creation order.
    pub fn list(&self) -> impl Iterator<Item = &CombatEntity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Ids in creation order.
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Set health, clamped into `[0, hp_max]`, persisting first.
    ///
    /// Exactly one store write per call. Returns `(before, after)`.
    pub(crate) fn set_hp(&mut self, id: EntityId, hp: i32) -> EngineResult<(i32, i32)> {
        let entity = self.entities.get(&id).ok_or(EngineError::NotFound(id))?;
        let before = entity.hp();
        let after = clamp_hp(hp, entity.hp_max());

        self.store.update(id, &EntityUpdate::hp(after))?;

        if let Some(entity) = self.entities.get_mut(&id) {
            entity.set_hp(after);
        }
        debug!("{} hp {} -> {}", id, before, after);
        Ok((before, after))
    }

    /// Re-read a combatant's health from the store.
    ///
    /// Returns the health now held in memory.
    pub fn resync(&mut self, id: EntityId) -> EngineResult<i32> {
        if !self.entities.contains_key(&id) {
            return Err(EngineError::NotFound(id));
        }
        let Some(record) = self.store.read(id)? else {
            warn!("{} vanished from the store; dropping it from the roster", id);
            self.forget(id);
            return Err(EngineError::NotFound(id));
        };
        let entity = self.entities.get_mut(&id).ok_or(EngineError::NotFound(id))?;
        Ok(entity.set_hp(record.hp))
    }

    /// Remove a combatant from the store and the roster.
    pub fn remove(&mut self, id: EntityId) -> EngineResult<CombatEntity> {
        if !self.entities.contains_key(&id) {
            return Err(EngineError::NotFound(id));
        }
        match self.store.delete(id) {
            Ok(()) => {}
            Err(StoreError::Missing(_)) => warn!("{} was already gone from the store", id),
            Err(e) => return Err(e.into()),
        }
        let removed = self.forget(id).ok_or(EngineError::NotFound(id))?;
        info!("removed {} '{}'", id, removed.name());
        Ok(removed)
    }

    fn forget(&mut self, id: EntityId) -> Option<CombatEntity> {
        self.order.retain(|other| *other != id);
        self.entities.remove(&id)
    }

    /// Remove every combatant, from memory and from the store.
    pub fn clear(&mut self) -> EngineResult<()> {
        self.store.clear()?;
        self.entities.clear();
        self.order.clear();
        Ok(())
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access.
    ///
    /// Writes made here bypass the roster; call `resync` afterwards.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the store.
    pub fn into_store(self) -> S {
        self.store
    }
}
