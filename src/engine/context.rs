//! The engine context.
//!
//! `Engine` owns everything the card engine needs: the roster and its
//! store, the bestiary, the animator and the clock. There is no global
//! state; the shell creates one engine at startup, routes every command
//! through it from its UI thread and hands it back on shutdown.
//!
//! ## Example
//!
//! ```
//! use combat_cards::animation::ManualClock;
//! use combat_cards::core::{EngineConfig, TemplateId};
//! use combat_cards::engine::{Engine, EngineEvent};
//! use combat_cards::roster::{EnemyTemplate, MemoryStore};
//!
//! let clock = ManualClock::new();
//! let mut engine = Engine::new(MemoryStore::new(), EngineConfig::default(), clock.clone()).unwrap();
//! let id = engine
//!     .spawn(&EnemyTemplate::new(TemplateId::new(1), "Vermling Scout", 3, 1, 2))
//!     .unwrap();
//!
//! engine.on_decrement(id).unwrap();
//! engine.on_decrement(id).unwrap();
//! assert!(engine.drain_events().contains(&EngineEvent::DeathTransitionStarted(id)));
//!
//! clock.advance(10_000);
//! engine.tick();
//! assert!(engine.animation(id).unwrap().death_marked);
//! ```

use log::{debug, error, info};

use crate::animation::{AnimationState, Animator, Clock, StepOutcome, SystemClock};
use crate::core::{EngineConfig, EngineError, EngineResult, EntityId};
use crate::health::{self, HealthChange};
use crate::render::{CardCompositor, CardFrame, ResourceProvider, TextMetrics};
use crate::roster::{Bestiary, CombatEntity, EnemyTemplate, Roster, RosterStore};

use super::event::{EngineEvent, RedrawScope};

/// Card engine context.
pub struct Engine<S: RosterStore, C: Clock = SystemClock> {
    config: EngineConfig,
    roster: Roster<S>,
    bestiary: Bestiary,
    animator: Animator,
    clock: C,
    events: Vec<EngineEvent>,
}

impl<S: RosterStore, C: Clock> Engine<S, C> {
    /// Create an engine with an empty roster.
    ///
    /// Records already in `store` are left alone; see `restore`.
    pub fn new(store: S, config: EngineConfig, clock: C) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            animator: Animator::new(config.animation.clone()),
            roster: Roster::new(store),
            bestiary: Bestiary::new(),
            clock,
            config,
            events: Vec::new(),
        })
    }

    /// Create an engine whose roster holds every record in `store`.
    ///
    /// Combatants stored at zero health come back death-marked, without
    /// replaying the transition.
    pub fn restore(store: S, config: EngineConfig, clock: C) -> EngineResult<Self> {
        config.validate()?;
        let roster = Roster::load(store)?;
        let mut animator = Animator::new(config.animation.clone());
        for entity in roster.list().filter(|e| e.is_dead()) {
            animator.mark_dead(entity.id());
        }
        Ok(Self {
            roster,
            bestiary: Bestiary::new(),
            animator,
            clock,
            config,
            events: Vec::new(),
        })
    }

    /// Install a bestiary (builder pattern).
    #[must_use]
    pub fn with_bestiary(mut self, bestiary: Bestiary) -> Self {
        self.bestiary = bestiary;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn roster(&self) -> &Roster<S> {
        &self.roster
    }

    #[must_use]
    pub fn bestiary(&self) -> &Bestiary {
        &self.bestiary
    }

    pub fn bestiary_mut(&mut self) -> &mut Bestiary {
        &mut self.bestiary
    }

    #[must_use]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current time on the engine clock.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    // =========================================================================
    // Roster
    // =========================================================================

    /// Spawn a combatant from a template.
    pub fn spawn(&mut self, template: &EnemyTemplate) -> EngineResult<EntityId> {
        let entity = self.roster.create(template)?;
        let id = entity.id();
        let dead = entity.is_dead();
        if dead {
            self.animator.mark_dead(id);
        }
        self.events.push(EngineEvent::Spawned(id));
        self.events.push(EngineEvent::Redraw { id, scope: RedrawScope::Full });
        Ok(id)
    }

    /// Spawn a combatant from the bestiary template with this name or id.
    pub fn spawn_named(&mut self, key: &str) -> EngineResult<EntityId> {
        let template = self
            .bestiary
            .find(key)
            .cloned()
            .ok_or_else(|| EngineError::UnknownTemplate(key.to_string()))?;
        self.spawn(&template)
    }

    pub fn entity(&self, id: EntityId) -> EngineResult<&CombatEntity> {
        self.roster.get(id)
    }

    /// Combatants in creation order.
    pub fn entities(&self) -> impl Iterator<Item = &CombatEntity> {
        self.roster.list()
    }

    /// Remove a combatant and anything still scheduled for it.
    pub fn remove(&mut self, id: EntityId) -> EngineResult<CombatEntity> {
        let removed = self.roster.remove(id)?;
        self.animator.cancel(id);
        self.events.push(EngineEvent::Removed(id));
        Ok(removed)
    }

    /// Re-read a combatant's health from the store and repaint it.
    pub fn resync(&mut self, id: EntityId) -> EngineResult<i32> {
        let hp = match self.roster.resync(id) {
            Ok(hp) => hp,
            Err(EngineError::NotFound(_)) => {
                self.animator.cancel(id);
                return Err(EngineError::NotFound(id));
            }
            Err(e) => return Err(e),
        };
        if hp > 0 {
            self.animator.clear_death_mark(id);
        } else if self.animator.state(id).is_none() {
            self.animator.mark_dead(id);
        }
        self.events.push(EngineEvent::Redraw { id, scope: RedrawScope::Full });
        Ok(hp)
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Apply a health delta and react to it.
    ///
    /// Persists first (one write). Then:
    /// - crossing zero starts the death transition and repaints the card
    /// - leaving zero clears a finished death mark and repaints the card
    /// - anything else repaints only the health bar
    ///
    /// On a persistence failure the roster is unchanged and nothing is
    /// scheduled or repainted.
    pub fn apply_delta(&mut self, id: EntityId, delta: i32) -> EngineResult<HealthChange> {
        let change = match health::apply_delta(&mut self.roster, id, delta) {
            Ok(change) => change,
            Err(e) => {
                if let EngineError::Persistence(cause) = &e {
                    error!("could not persist health of {}: {}", id, cause);
                }
                return Err(e);
            }
        };
        self.events.push(EngineEvent::HealthChanged(change));

        if change.crossed_zero() {
            info!("{} reached 0 hp; starting death transition", id);
            self.animator.start_death_transition(id, self.clock.now_ms());
            self.events.push(EngineEvent::DeathTransitionStarted(id));
            self.events.push(EngineEvent::Redraw { id, scope: RedrawScope::Full });
        } else if change.revived() {
            self.animator.clear_death_mark(id);
            self.events.push(EngineEvent::Redraw { id, scope: RedrawScope::Full });
        } else {
            self.events.push(EngineEvent::Redraw { id, scope: RedrawScope::HealthBar });
        }
        Ok(change)
    }

    /// "+1" command.
    pub fn on_increment(&mut self, id: EntityId) -> EngineResult<HealthChange> {
        self.apply_delta(id, 1)
    }

    /// "-1" command.
    pub fn on_decrement(&mut self, id: EntityId) -> EngineResult<HealthChange> {
        self.apply_delta(id, -1)
    }

    // =========================================================================
    // Animation
    // =========================================================================

    #[must_use]
    pub fn animation(&self, id: EntityId) -> Option<&AnimationState> {
        self.animator.state(id)
    }

    /// Run every animation step due by now. Returns how many ran.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now_ms();
        let roster = &self.roster;
        let outcomes = self.animator.pump(now, |id| roster.contains(id));
        self.record_steps(&outcomes);
        outcomes.len()
    }

    /// Run every scheduled step to completion, ignoring the clock.
    pub fn fast_forward(&mut self) -> usize {
        let roster = &self.roster;
        let outcomes = self.animator.fast_forward(|id| roster.contains(id));
        self.record_steps(&outcomes);
        outcomes.len()
    }

    fn record_steps(&mut self, outcomes: &[StepOutcome]) {
        for outcome in outcomes {
            let id = outcome.entity;
            self.events.push(EngineEvent::Redraw { id, scope: RedrawScope::Full });
            match outcome.advanced_to {
                Some(phase) if phase.is_animated() => {
                    self.events.push(EngineEvent::PhaseAdvanced { id, phase });
                }
                Some(_) => {
                    self.events.push(EngineEvent::AnimationFinished(id));
                    // Healed while the transition was running.
                    let alive = self.roster.get(id).is_ok_and(|e| !e.is_dead());
                    if alive && self.animator.clear_death_mark(id) {
                        debug!("{} healed during its death transition; mark cleared", id);
                    }
                }
                None => {}
            }
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// A compositor over this engine's layout and theme.
    pub fn compositor<'a>(
        &'a self,
        resources: &'a dyn ResourceProvider,
        metrics: &'a dyn TextMetrics,
    ) -> CardCompositor<'a> {
        CardCompositor::new(&self.config.layout, &self.config.theme, resources, metrics)
    }

    /// Compose a combatant's whole card in its current state.
    pub fn render(
        &self,
        id: EntityId,
        resources: &dyn ResourceProvider,
        metrics: &dyn TextMetrics,
    ) -> EngineResult<CardFrame> {
        let entity = self.roster.get(id)?;
        Ok(self
            .compositor(resources, metrics)
            .compose(entity, self.animator.visual(id)))
    }

    /// Compose only a combatant's health bar.
    pub fn render_health_bar(
        &self,
        id: EntityId,
        resources: &dyn ResourceProvider,
        metrics: &dyn TextMetrics,
    ) -> EngineResult<CardFrame> {
        let entity = self.roster.get(id)?;
        Ok(self.compositor(resources, metrics).compose_health_bar(entity))
    }

    /// Take the events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Stop all animation, clear the store if configured to, and give the
    /// store back.
    pub fn shutdown(mut self) -> EngineResult<S> {
        self.animator.cancel_all();
        if self.config.clear_on_shutdown {
            self.roster.clear()?;
            info!("engine shut down; combat roster cleared");
        } else {
            info!("engine shut down; {} combatants kept", self.roster.len());
        }
        Ok(self.roster.into_store())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationPhase, ManualClock};
    use crate::core::TemplateId;
    use crate::roster::MemoryStore;

    fn engine() -> (Engine<MemoryStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let engine = Engine::new(MemoryStore::new(), EngineConfig::default(), clock.clone()).unwrap();
        (engine, clock)
    }

    fn template(hp: i32) -> EnemyTemplate {
        EnemyTemplate::new(TemplateId::new(1), "Bandit Guard", 2, 2, 6).with_hp(hp)
    }

    #[test]
    fn test_spawn_emits_events() {
        let (mut engine, _) = engine();
        let id = engine.spawn(&template(6)).unwrap();
        assert_eq!(
            engine.drain_events(),
            vec![
                EngineEvent::Spawned(id),
                EngineEvent::Redraw { id, scope: RedrawScope::Full },
            ]
        );
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_spawn_named_unknown() {
        let (mut engine, _) = engine();
        assert!(matches!(engine.spawn_named("Nobody"), Err(EngineError::UnknownTemplate(_))));
    }

    #[test]
    fn test_plain_delta_redraws_health_bar_only() {
        let (mut engine, _) = engine();
        let id = engine.spawn(&template(6)).unwrap();
        engine.drain_events();

        engine.on_decrement(id).unwrap();
        let events = engine.drain_events();
        assert_eq!(events[1], EngineEvent::Redraw { id, scope: RedrawScope::HealthBar });
        assert!(engine.animation(id).is_none());
    }

    #[test]
    fn test_tick_runs_due_steps_only() {
        let (mut engine, clock) = engine();
        let id = engine.spawn(&template(1)).unwrap();
        engine.on_decrement(id).unwrap();

        clock.advance(49);
        assert_eq!(engine.tick(), 0);
        clock.advance(1);
        assert_eq!(engine.tick(), 1);
        clock.advance(500);
        assert_eq!(engine.tick(), 10);
        assert_eq!(engine.animation(id).unwrap().phase, AnimationPhase::DeathMarkerPhase1);
    }

    #[test]
    fn test_spawn_dead_is_death_marked() {
        let (mut engine, _) = engine();
        let id = engine.spawn(&template(0)).unwrap();
        assert!(engine.animation(id).unwrap().death_marked);
        assert_eq!(engine.animator().pending_steps(), 0);
    }

    #[test]
    fn test_resync_after_external_write() {
        let (mut engine, _) = engine();
        let id = engine.spawn(&template(6)).unwrap();
        engine
            .roster
            .store_mut()
            .update(id, &crate::roster::EntityUpdate::hp(0))
            .unwrap();

        assert_eq!(engine.resync(id).unwrap(), 0);
        assert!(engine.animation(id).unwrap().death_marked);
    }

    #[test]
    fn test_shutdown_clears_store() {
        let (mut engine, _) = engine();
        engine.spawn(&template(6)).unwrap();
        let store = engine.shutdown().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_shutdown_can_keep_records() {
        let clock = ManualClock::new();
        let config = EngineConfig::default().keep_records_on_shutdown();
        let mut engine = Engine::new(MemoryStore::new(), config, clock).unwrap();
        engine.spawn(&template(6)).unwrap();
        let store = engine.shutdown().unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::default().with_animation(0, 50);
        let result = Engine::new(MemoryStore::new(), config, ManualClock::new());
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
