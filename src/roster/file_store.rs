//! File-backed roster store.
//!
//! The whole record table is encoded with `bincode` and rewritten after each
//! mutation. Writes go to a sibling temporary file first and are renamed
//! over the target, so a crash mid-write leaves the previous snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::core::{EntityId, StoreError};

use super::entity::{EntityRecord, EntityUpdate};
use super::store::{RecordTable, RosterStore};

/// Roster store persisted to a single file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    table: RecordTable,
}

impl FileStore {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let table = if path.exists() {
            let bytes = fs::read(&path)?;
            bincode::deserialize(&bytes)?
        } else {
            RecordTable::new()
        };
        debug!("opened roster file {} ({} records)", path.display(), table.records.len());
        Ok(Self { path, table })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let bytes = bincode::serialize(&self.table)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply a mutation to a copy of the table and keep it only once it is
    /// on disk.
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut RecordTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let previous = self.table.clone();
        let out = mutate(&mut self.table)?;
        if let Err(e) = self.flush() {
            self.table = previous;
            return Err(e);
        }
        Ok(out)
    }
}

impl RosterStore for FileStore {
    fn create(&mut self, record: &EntityRecord) -> Result<EntityId, StoreError> {
        self.commit(|table| Ok(table.insert(record)))
    }

    fn read(&self, id: EntityId) -> Result<Option<EntityRecord>, StoreError> {
        Ok(self.table.records.get(&id).cloned())
    }

    fn update(&mut self, id: EntityId, update: &EntityUpdate) -> Result<(), StoreError> {
        self.commit(|table| table.update(id, update))
    }

    fn delete(&mut self, id: EntityId) -> Result<(), StoreError> {
        self.commit(|table| table.delete(id))
    }

    fn list_all(&self) -> Result<Vec<(EntityId, EntityRecord)>, StoreError> {
        Ok(self.table.list())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.commit(|table| {
            table.records.clear();
            Ok(())
        })
    }
}
