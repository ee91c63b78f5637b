//! Death-transition scheduler.
//!
//! The `Animator` owns every combatant's `AnimationState` and the timeline
//! of pending steps. Each executed step schedules its successor one
//! `step_delay_ms` later, so a run is a chain with at most one pending step;
//! steps of one combatant therefore execute strictly in order, while chains
//! of different combatants interleave freely.
//!
//! A step checks, before doing anything, that its combatant is still alive
//! in the roster and that its token still matches the current run. Either
//! check failing turns the step into a no-op and ends the chain.

use log::{debug, trace, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{AnimationConfig, EntityId};

use super::state::{AnimationPhase, AnimationState, AnimationToken, VisualState};
use super::timeline::{ScheduledStep, Timeline};

/// Report of one executed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub entity: EntityId,
    /// Phase the step belonged to.
    pub phase: AnimationPhase,
    /// Step number within that phase, starting at 1.
    pub step: u32,
    pub total_steps: u32,
    /// Phase entered because this was the phase's last step.
    pub advanced_to: Option<AnimationPhase>,
    /// Time the step was due.
    pub due: u64,
}

impl StepOutcome {
    /// This step completed the whole transition.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.advanced_to == Some(AnimationPhase::Idle)
    }
}

/// Scheduler of death transitions.
#[derive(Clone, Debug)]
pub struct Animator {
    config: AnimationConfig,
    states: FxHashMap<EntityId, AnimationState>,
    timeline: Timeline,
    next_token: u64,
}

impl Animator {
    #[must_use]
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            states: FxHashMap::default(),
            timeline: Timeline::new(),
            next_token: 1,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    fn issue_token(&mut self) -> AnimationToken {
        let token = AnimationToken(self.next_token);
        self.next_token += 1;
        token
    }

    /// Start the death transition of `entity` at time `now`.
    ///
    /// A run already in progress for `entity` is replaced: its pending step
    /// is dropped and its token retired.
    pub fn start_death_transition(&mut self, entity: EntityId, now: u64) -> AnimationToken {
        let dropped = self.timeline.cancel_entity(entity);
        if dropped > 0 {
            debug!("{}: replacing running death transition", entity);
        }
        let token = self.issue_token();
        self.states
            .insert(entity, AnimationState::fading(token, self.config.steps_per_phase));
        self.timeline
            .schedule(now.saturating_add(self.config.step_delay_ms), entity, token);
        token
    }

    /// Put `entity` straight into the completed, death-marked state.
    pub fn mark_dead(&mut self, entity: EntityId) {
        self.timeline.cancel_entity(entity);
        let token = self.issue_token();
        self.states
            .insert(entity, AnimationState::death_marked(token, self.config.steps_per_phase));
    }

    /// Clear a completed death mark, returning the card to normal.
    ///
    /// A run still in progress is left alone; returns whether anything was
    /// cleared.
    pub fn clear_death_mark(&mut self, entity: EntityId) -> bool {
        match self.states.get(&entity) {
            Some(state) if !state.is_running() => {
                self.states.remove(&entity);
                true
            }
            _ => false,
        }
    }

    /// Forget `entity` entirely: state and pending steps.
    ///
    /// Returns whether there was anything to forget.
    pub fn cancel(&mut self, entity: EntityId) -> bool {
        let dropped = self.timeline.cancel_entity(entity);
        self.states.remove(&entity).is_some() || dropped > 0
    }

    /// Forget every combatant.
    pub fn cancel_all(&mut self) {
        self.timeline.clear();
        self.states.clear();
    }

    #[must_use]
    pub fn state(&self, entity: EntityId) -> Option<&AnimationState> {
        self.states.get(&entity)
    }

    /// What the compositor should show for `entity`.
    #[must_use]
    pub fn visual(&self, entity: EntityId) -> VisualState {
        VisualState::of(self.states.get(&entity))
    }

    /// Is a run in progress for `entity`?
    #[must_use]
    pub fn is_running(&self, entity: EntityId) -> bool {
        self.states.get(&entity).is_some_and(AnimationState::is_running)
    }

    /// Steps waiting on the timeline.
    #[must_use]
    pub fn pending_steps(&self) -> usize {
        self.timeline.len()
    }

    /// Steps waiting on the timeline for `entity`.
    #[must_use]
    pub fn pending_steps_for(&self, entity: EntityId) -> usize {
        self.timeline.pending_for(entity)
    }

    /// When the next step is due.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.timeline.next_due()
    }

    /// Execute every step due at `now`.
    ///
    /// `is_alive` tells whether a combatant is still in the roster.
    pub fn pump(&mut self, now: u64, is_alive: impl Fn(EntityId) -> bool) -> Vec<StepOutcome> {
        let mut outcomes = Vec::new();
        while let Some(step) = self.timeline.pop_due(now) {
            if let Some(outcome) = self.run_step(step, is_alive(step.entity)) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Execute every pending step in due order, ignoring the clock, until
    /// the timeline is empty.
    pub fn fast_forward(&mut self, is_alive: impl Fn(EntityId) -> bool) -> Vec<StepOutcome> {
        let mut outcomes = Vec::new();
        while let Some(step) = self.timeline.pop_next() {
            if let Some(outcome) = self.run_step(step, is_alive(step.entity)) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    fn run_step(&mut self, scheduled: ScheduledStep, alive: bool) -> Option<StepOutcome> {
        let entity = scheduled.entity;
        if !alive {
            warn!("{}: dropping animation step for a combatant no longer in the roster", entity);
            self.cancel(entity);
            return None;
        }

        let delay = self.config.step_delay_ms;
        let state = match self.states.get_mut(&entity) {
            Some(state) if state.token == scheduled.token && state.is_running() => state,
            _ => {
                trace!("{}: stale animation step ignored", entity);
                return None;
            }
        };

        state.step += 1;
        let phase = state.phase;
        let step = state.step;
        let total_steps = state.total_steps;
        trace!("{}: {} step {}/{}", entity, phase, step, total_steps);

        let mut advanced_to = None;
        if step >= total_steps {
            let next = phase.next();
            state.phase = next;
            state.step = 0;
            if next.is_animated() {
                debug!("{}: {} -> {}", entity, phase, next);
            } else {
                state.death_marked = true;
                debug!("{}: death transition complete", entity);
            }
            advanced_to = Some(next);
        }

        if state.is_running() {
            let token = state.token;
            self.timeline
                .schedule(scheduled.due.saturating_add(delay), entity, token);
        }

        Some(StepOutcome {
            entity,
            phase,
            step,
            total_steps,
            advanced_to,
            due: scheduled.due,
        })
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: EntityId = EntityId(1);

    fn animator(steps: u32) -> Animator {
        Animator::new(AnimationConfig {
            steps_per_phase: steps,
            step_delay_ms: 50,
        })
    }

    #[test]
    fn test_first_step_waits_one_delay() {
        let mut a = animator(10);
        a.start_death_transition(E, 0);
        assert!(a.pump(49, |_| true).is_empty());

        let out = a.pump(50, |_| true);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].phase, AnimationPhase::FadingToGray);
        assert_eq!(out[0].step, 1);
        assert_eq!(a.state(E).unwrap().factor(), 0.1);
    }

    #[test]
    fn test_full_run_step_counts() {
        let mut a = animator(10);
        a.start_death_transition(E, 0);
        let out = a.fast_forward(|_| true);

        assert_eq!(out.len(), 30);
        for (phase, chunk) in [
            AnimationPhase::FadingToGray,
            AnimationPhase::DeathMarkerPhase1,
            AnimationPhase::DeathMarkerPhase2,
        ]
        .into_iter()
        .zip(out.chunks(10))
        {
            let steps: Vec<_> = chunk.iter().map(|o| o.step).collect();
            assert_eq!(steps, (1..=10).collect::<Vec<_>>());
            assert!(chunk.iter().all(|o| o.phase == phase));
        }
        assert!(out.last().unwrap().finished());

        let state = a.state(E).unwrap();
        assert_eq!(state.phase, AnimationPhase::Idle);
        assert!(state.death_marked);
        assert_eq!(a.pending_steps(), 0);
    }

    #[test]
    fn test_due_times_are_evenly_spaced() {
        let mut a = animator(2);
        a.start_death_transition(E, 100);
        let dues: Vec<_> = a.fast_forward(|_| true).iter().map(|o| o.due).collect();
        assert_eq!(dues, vec![150, 200, 250, 300, 350, 400]);
    }

    #[test]
    fn test_pump_catches_up() {
        let mut a = animator(10);
        a.start_death_transition(E, 0);
        let out = a.pump(10_000, |_| true);
        assert_eq!(out.len(), 30);
    }

    #[test]
    fn test_removed_entity_stops_chain() {
        let mut a = animator(10);
        a.start_death_transition(E, 0);
        a.pump(100, |_| true);

        let out = a.pump(10_000, |_| false);
        assert!(out.is_empty());
        assert!(a.state(E).is_none());
        assert_eq!(a.pending_steps(), 0);
    }

    #[test]
    fn test_restart_replaces_run() {
        let mut a = animator(10);
        let first = a.start_death_transition(E, 0);
        a.pump(150, |_| true);
        let second = a.start_death_transition(E, 150);

        assert_ne!(first, second);
        assert_eq!(a.pending_steps_for(E), 1);
        assert_eq!(a.state(E).unwrap().step, 0);

        let out = a.fast_forward(|_| true);
        assert_eq!(out.len(), 30);
    }

    #[test]
    fn test_cancel() {
        let mut a = animator(10);
        a.start_death_transition(E, 0);
        assert!(a.cancel(E));
        assert!(a.fast_forward(|_| true).is_empty());
        assert!(!a.cancel(E));
    }

    #[test]
    fn test_independent_entities_interleave() {
        let mut a = animator(3);
        a.start_death_transition(EntityId(1), 0);
        a.start_death_transition(EntityId(2), 25);
        let out = a.fast_forward(|_| true);

        let first: Vec<_> = out.iter().take(4).map(|o| o.entity.raw()).collect();
        assert_eq!(first, vec![1, 2, 1, 2]);
        assert_eq!(out.len(), 18);
    }

    #[test]
    fn test_clear_death_mark_only_when_finished() {
        let mut a = animator(2);
        a.start_death_transition(E, 0);
        assert!(!a.clear_death_mark(E));
        a.fast_forward(|_| true);
        assert!(a.clear_death_mark(E));
        assert_eq!(a.visual(E), VisualState::NORMAL);
    }

    #[test]
    fn test_mark_dead() {
        let mut a = animator(10);
        a.mark_dead(E);
        assert_eq!(a.visual(E), VisualState::DEATH_MARKED);
        assert!(!a.is_running(E));
        assert_eq!(a.pending_steps(), 0);
    }
}
