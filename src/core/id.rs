//! Identifier types.
//!
//! Every combatant on the battlefield has a unique `EntityId`, allocated by
//! the roster store when the combatant is created. Ids are never reused
//! within one store, so a stale id from a removed combatant can only ever
//! fail to resolve.
//!
//! Templates (the bestiary entries combatants are spawned from) carry a
//! separate `TemplateId`. A combatant keeps its template id as a read-only
//! back-reference; it never owns the template.
//!
//! ```
//! use combat_cards::core::{EntityId, TemplateId};
//!
//! let id = EntityId::new(3);
//! assert_eq!(id.raw(), 3);
//! assert_eq!(format!("{}", id), "Entity(3)");
//!
//! let template = TemplateId::new(7);
//! assert_eq!(format!("{}", template), "Template(7)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier of a combatant in the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create an entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id following this one.
    ///
    /// Stores allocate ids monotonically with this. Saturates at `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Identifier of a bestiary template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

impl TemplateId {
    /// Create a template ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Template({})", self.0)
    }
}
