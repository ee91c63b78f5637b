//! Combatant data.
//!
//! - `EnemyTemplate`: a bestiary entry, the definition combatants spawn from
//! - `EntityRecord`: the persisted form of a combatant, as the store sees it
//! - `CombatEntity`: a combatant on the battlefield, as the engine sees it
//!
//! ## Health Invariant
//!
//! `0 <= hp <= hp_max` holds for every `CombatEntity`. It is established on
//! construction (out-of-range stored values are clamped) and maintained by
//! the crate-private `set_hp`, which only the roster calls on behalf of the
//! health controller. Every other field is fixed once the entity exists.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, TemplateId};

/// Suffix some template names carry; the `elite` flag, not the name, holds
/// that meaning.
const ELITE_SUFFIX: &str = "ELITE";

/// Strip a trailing " ELITE" marker from a combatant name.
///
/// ```
/// use combat_cards::roster::display_name;
///
/// assert_eq!(display_name("Vermling Scout ELITE"), "Vermling Scout");
/// assert_eq!(display_name("Bandit Guard elite "), "Bandit Guard");
/// assert_eq!(display_name("Living Bones"), "Living Bones");
/// ```
#[must_use]
pub fn display_name(raw: &str) -> String {
    let trimmed = raw.trim_end();
    let Some(split) = trimmed.len().checked_sub(ELITE_SUFFIX.len()) else {
        return trimmed.to_string();
    };
    let (head, tail) = match (trimmed.get(..split), trimmed.get(split..)) {
        (Some(head), Some(tail)) => (head, tail),
        _ => return trimmed.to_string(),
    };
    if tail.eq_ignore_ascii_case(ELITE_SUFFIX) && head.ends_with(char::is_whitespace) {
        head.trim_end().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Clamp a health value into `[0, hp_max]`.
#[must_use]
pub fn clamp_hp(value: i32, hp_max: i32) -> i32 {
    value.min(hp_max).max(0)
}

/// A bestiary entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: TemplateId,
    pub name: String,
    pub movement: u32,
    pub attack: u32,
    /// Health a freshly spawned combatant starts with.
    pub hp: i32,
    pub hp_max: i32,
    pub elite: bool,
    /// Logical asset name of the portrait.
    pub portrait: String,
}

impl EnemyTemplate {
    /// Create a template at full health with no portrait.
    pub fn new(id: TemplateId, name: impl Into<String>, movement: u32, attack: u32, hp_max: i32) -> Self {
        Self {
            id,
            name: name.into(),
            movement,
            attack,
            hp: hp_max,
            hp_max,
            elite: false,
            portrait: String::new(),
        }
    }

    /// Mark as elite (builder pattern).
    #[must_use]
    pub fn elite(mut self) -> Self {
        self.elite = true;
        self
    }

    /// Set the portrait asset (builder pattern).
    #[must_use]
    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = portrait.into();
        self
    }

    /// Set the starting health (builder pattern).
    #[must_use]
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self
    }

    /// The record a combatant spawned from this template is stored as.
    #[must_use]
    pub fn to_record(&self) -> EntityRecord {
        EntityRecord {
            source_id: Some(self.id),
            name: self.name.clone(),
            movement: self.movement,
            attack: self.attack,
            hp: self.hp,
            hp_max: self.hp_max,
            elite: self.elite,
            portrait: self.portrait.clone(),
        }
    }
}

/// A combatant as persisted by a `RosterStore`.
///
/// Stored verbatim; normalization happens when the engine builds a
/// `CombatEntity` from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRecord {
    pub source_id: Option<TemplateId>,
    pub name: String,
    pub movement: u32,
    pub attack: u32,
    pub hp: i32,
    pub hp_max: i32,
    pub elite: bool,
    pub portrait: String,
}

/// Field changes applied by `RosterStore::update`.
///
/// Only health is mutable in this engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityUpdate {
    pub hp: Option<i32>,
}

impl EntityUpdate {
    /// An update that sets health.
    #[must_use]
    pub const fn hp(hp: i32) -> Self {
        Self { hp: Some(hp) }
    }

    /// Apply to a stored record.
    pub fn apply_to(&self, record: &mut EntityRecord) {
        if let Some(hp) = self.hp {
            record.hp = hp;
        }
    }
}

/// A combatant on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatEntity {
    id: EntityId,
    source_id: Option<TemplateId>,
    name: String,
    movement: u32,
    attack: u32,
    hp: i32,
    hp_max: i32,
    elite: bool,
    portrait: String,
}

impl CombatEntity {
    /// Build from a stored record.
    ///
    /// The name loses its elite suffix, `hp_max` is raised to at least 1
    /// and `hp` is clamped into range.
    #[must_use]
    pub fn from_record(id: EntityId, record: &EntityRecord) -> Self {
        let hp_max = record.hp_max.max(1);
        Self {
            id,
            source_id: record.source_id,
            name: display_name(&record.name),
            movement: record.movement,
            attack: record.attack,
            hp: clamp_hp(record.hp, hp_max),
            hp_max,
            elite: record.elite,
            portrait: record.portrait.clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Template this combatant was spawned from, if any.
    #[must_use]
    pub fn source_id(&self) -> Option<TemplateId> {
        self.source_id
    }

    /// Display name (elite suffix removed).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn movement(&self) -> u32 {
        self.movement
    }

    #[must_use]
    pub fn attack(&self) -> u32 {
        self.attack
    }

    #[must_use]
    pub fn hp(&self) -> i32 {
        self.hp
    }

    #[must_use]
    pub fn hp_max(&self) -> i32 {
        self.hp_max
    }

    #[must_use]
    pub fn elite(&self) -> bool {
        self.elite
    }

    /// Logical asset name of the portrait.
    #[must_use]
    pub fn portrait(&self) -> &str {
        &self.portrait
    }

    /// Is health at zero?
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// `hp / hp_max` in `[0, 1]`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        crate::gradient::health_ratio(self.hp, self.hp_max)
    }

    /// Set health, clamped. Returns the stored value.
    pub(crate) fn set_hp(&mut self, hp: i32) -> i32 {
        self.hp = clamp_hp(hp, self.hp_max);
        self.hp
    }
}
