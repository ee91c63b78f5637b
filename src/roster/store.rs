//! Roster persistence.
//!
//! The engine persists combatants through the `RosterStore` trait. It only
//! relies on atomic single-record operations; nothing spans records.
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`]: in-process, backed by a persistent map so snapshots
//!   are O(1)
//! - [`FileStore`](super::FileStore): the same map, rewritten to a
//!   `bincode` file after every mutation
//!
//! Ids are allocated by the store, monotonically, and never reused.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::{EntityId, StoreError};

use super::entity::{EntityRecord, EntityUpdate};

/// Durable key/value storage of combatant records.
pub trait RosterStore {
    /// Store a new record, returning its freshly allocated id.
    fn create(&mut self, record: &EntityRecord) -> Result<EntityId, StoreError>;

    /// Read a record. `Ok(None)` when absent.
    fn read(&self, id: EntityId) -> Result<Option<EntityRecord>, StoreError>;

    /// Apply field changes to an existing record.
    fn update(&mut self, id: EntityId, update: &EntityUpdate) -> Result<(), StoreError>;

    /// Remove a record.
    fn delete(&mut self, id: EntityId) -> Result<(), StoreError>;

    /// Every record, in id (creation) order.
    fn list_all(&self) -> Result<Vec<(EntityId, EntityRecord)>, StoreError>;

    /// Remove every record. Ids are not reset.
    fn clear(&mut self) -> Result<(), StoreError> {
        for (id, _) in self.list_all()? {
            self.delete(id)?;
        }
        Ok(())
    }
}

/// Records plus the next id to hand out.
///
/// Shared by the memory and file stores; this is also the on-disk format
/// of `FileStore`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RecordTable {
    pub(crate) records: OrdMap<EntityId, EntityRecord>,
    pub(crate) next_id: u32,
}

impl RecordTable {
    pub(crate) fn new() -> Self {
        Self {
            records: OrdMap::new(),
            next_id: 1,
        }
    }

    pub(crate) fn insert(&mut self, record: &EntityRecord) -> EntityId {
        let id = EntityId::new(self.next_id.max(1));
        self.next_id = id.next().raw();
        self.records.insert(id, record.clone());
        id
    }

    pub(crate) fn update(&mut self, id: EntityId, update: &EntityUpdate) -> Result<(), StoreError> {
        let record = self.records.get_mut(&id).ok_or(StoreError::Missing(id))?;
        update.apply_to(record);
        Ok(())
    }

    pub(crate) fn delete(&mut self, id: EntityId) -> Result<(), StoreError> {
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::Missing(id))
    }

    pub(crate) fn list(&self) -> Vec<(EntityId, EntityRecord)> {
        self.records.iter().map(|(id, r)| (*id, r.clone())).collect()
    }
}

/// In-memory roster store.
///
/// Cloning is O(1) thanks to structural sharing, which makes snapshots
/// (`snapshot`) cheap enough to take on every frame if a shell wants to.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    table: RecordTable,
    writes: u64,
}

impl MemoryStore {
    /// Create an empty store; the first id allocated is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: RecordTable::new(),
            writes: 0,
        }
    }

    /// Number of successful mutating operations so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.records.is_empty()
    }

    /// O(1) copy of the current records.
    #[must_use]
    pub fn snapshot(&self) -> OrdMap<EntityId, EntityRecord> {
        self.table.records.clone()
    }
}

impl RosterStore for MemoryStore {
    fn create(&mut self, record: &EntityRecord) -> Result<EntityId, StoreError> {
        let id = self.table.insert(record);
        self.writes += 1;
        Ok(id)
    }

    fn read(&self, id: EntityId) -> Result<Option<EntityRecord>, StoreError> {
        Ok(self.table.records.get(&id).cloned())
    }

    fn update(&mut self, id: EntityId, update: &EntityUpdate) -> Result<(), StoreError> {
        self.table.update(id, update)?;
        self.writes += 1;
        Ok(())
    }

    fn delete(&mut self, id: EntityId) -> Result<(), StoreError> {
        self.table.delete(id)?;
        self.writes += 1;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<(EntityId, EntityRecord)>, StoreError> {
        Ok(self.table.list())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.table.records.clear();
        self.writes += 1;
        Ok(())
    }
}
