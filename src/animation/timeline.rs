//! Cooperative timeline of deferred animation steps.
//!
//! A step is a value, not a closure: the combatant it belongs to, the token
//! of the run that scheduled it and the time it becomes due. The owner pops
//! due steps and executes them on its own thread, so nothing here needs
//! locking. Steps due at the same instant pop in scheduling order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::core::EntityId;

use super::state::AnimationToken;

/// A deferred step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduledStep {
    /// Milliseconds on the engine clock.
    pub due: u64,
    /// Scheduling sequence number; breaks ties between equal `due`.
    pub seq: u64,
    pub entity: EntityId,
    pub token: AnimationToken,
}

/// Min-heap of scheduled steps.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    queue: BinaryHeap<Reverse<ScheduledStep>>,
    next_seq: u64,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a step for `entity` at `due`.
    pub fn schedule(&mut self, due: u64, entity: EntityId, token: AnimationToken) -> ScheduledStep {
        let step = ScheduledStep {
            due,
            seq: self.next_seq,
            entity,
            token,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(step));
        step
    }

    /// Pop the earliest step if it is due at `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<ScheduledStep> {
        match self.queue.peek() {
            Some(Reverse(step)) if step.due <= now => self.queue.pop().map(|Reverse(s)| s),
            _ => None,
        }
    }

    /// Pop the earliest step regardless of time.
    pub fn pop_next(&mut self) -> Option<ScheduledStep> {
        self.queue.pop().map(|Reverse(s)| s)
    }

    /// When the earliest step is due.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(s)| s.due)
    }

    /// Drop every pending step of `entity`. Returns how many were dropped.
    pub fn cancel_entity(&mut self, entity: EntityId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|Reverse(s)| s.entity != entity);
        before - self.queue.len()
    }

    /// Pending steps of `entity`.
    #[must_use]
    pub fn pending_for(&self, entity: EntityId) -> usize {
        self.queue.iter().filter(|Reverse(s)| s.entity == entity).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
