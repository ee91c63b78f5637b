//! Bestiary: the catalog of enemy templates.
//!
//! Combatants are spawned from templates. The shell lists template names
//! (sorted) in its picker and hands the chosen name back; lookup accepts
//! either a template id or an exact name.

use rustc_hash::FxHashMap;

use crate::core::TemplateId;

use super::entity::EnemyTemplate;

/// Template catalog.
///
/// ```
/// use combat_cards::core::TemplateId;
/// use combat_cards::roster::{Bestiary, EnemyTemplate};
///
/// let mut bestiary = Bestiary::new();
/// bestiary.register(EnemyTemplate::new(TemplateId::new(1), "Living Bones", 2, 1, 5));
///
/// let found = bestiary.find("Living Bones").unwrap();
/// assert_eq!(found.id, TemplateId::new(1));
/// assert!(bestiary.find("1").is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Bestiary {
    templates: FxHashMap<TemplateId, EnemyTemplate>,
    by_name: FxHashMap<String, TemplateId>,
    next_id: u32,
}

impl Bestiary {
    /// Create an empty bestiary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one with the same id.
    ///
    /// Returns the replaced template.
    pub fn register(&mut self, template: EnemyTemplate) -> Option<EnemyTemplate> {
        self.next_id = self.next_id.max(template.id.raw().saturating_add(1));
        let replaced = self.templates.remove(&template.id);
        if let Some(old) = &replaced {
            self.by_name.remove(&old.name);
        }
        self.by_name.insert(template.name.clone(), template.id);
        self.templates.insert(template.id, template);
        replaced
    }

    /// Register a template with an auto-assigned id.
    ///
    /// Returns the assigned id.
    pub fn register_auto(&mut self, name: impl Into<String>, movement: u32, attack: u32, hp_max: i32) -> TemplateId {
        let id = TemplateId::new(self.next_id);
        self.register(EnemyTemplate::new(id, name, movement, attack, hp_max));
        id
    }

    #[must_use]
    pub fn get(&self, id: TemplateId) -> Option<&EnemyTemplate> {
        self.templates.get(&id)
    }

    /// Look up by exact name, then by numeric id.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&EnemyTemplate> {
        if let Some(id) = self.by_name.get(key) {
            return self.templates.get(id);
        }
        key.trim()
            .parse::<u32>()
            .ok()
            .and_then(|raw| self.templates.get(&TemplateId::new(raw)))
    }

    #[must_use]
    pub fn contains(&self, id: TemplateId) -> bool {
        self.templates.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template names in ascending order, for pickers.
    #[must_use]
    pub fn names_sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.values().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.templates.values()
    }
}
