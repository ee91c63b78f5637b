//! Combat entity model and its persistence.
//!
//! - `entity`: templates, stored records and battlefield combatants
//! - `bestiary`: the template catalog
//! - `store`: the `RosterStore` contract and the in-memory store
//! - `file_store`: a store persisted to disk
//! - `roster`: the in-memory roster kept in step with a store

pub mod entity;
pub mod bestiary;
pub mod store;
pub mod file_store;
#[allow(clippy::module_inception)]
pub mod roster;

pub use entity::{clamp_hp, display_name, CombatEntity, EnemyTemplate, EntityRecord, EntityUpdate};
pub use bestiary::Bestiary;
pub use store::{MemoryStore, RosterStore};
pub use file_store::FileStore;
pub use roster::Roster;
