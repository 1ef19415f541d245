//! Deterministic event queue.
//!
//! A single priority queue keyed by `(fire_at_round, insertion_sequence)`.
//! Two events for the same round always fire in the order they were
//! scheduled. Scheduling into a round that has already been popped past is
//! a broken phase transition and is reported as `SchedulerError::PastRound`.

use std::collections::BinaryHeap;

use super::event::Event;
use crate::core::SchedulerError;

/// The heartbeat of a game instance.
///
/// ```
/// use rust_autobattler::scheduler::{Event, EventKind, EventScheduler};
///
/// let mut scheduler = EventScheduler::new();
/// scheduler.schedule(Event::new(EventKind::RoundStart), 2).unwrap();
/// scheduler.schedule(Event::new(EventKind::RoundStart), 1).unwrap();
/// scheduler.schedule(Event::new(EventKind::CombatStart), 1).unwrap();
///
/// let fired: Vec<_> = scheduler.pop_ready(1).into_iter().map(|e| e.kind).collect();
/// assert_eq!(fired, vec![EventKind::RoundStart, EventKind::CombatStart]);
/// assert!(!scheduler.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct EventScheduler {
    queue: BinaryHeap<Event>,
    next_sequence: u64,
    current_round: u32,
}

impl EventScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest round passed to a pop.
    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Enqueue `event` to fire at `fire_at_round`. Returns its sequence.
    pub fn schedule(&mut self, mut event: Event, fire_at_round: u32) -> Result<u64, SchedulerError> {
        if fire_at_round < self.current_round {
            return Err(SchedulerError::PastRound {
                kind: event.kind,
                requested: fire_at_round,
                current: self.current_round,
            });
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        event.target_round = fire_at_round;
        event.sequence = sequence;
        self.queue.push(event);
        Ok(sequence)
    }

    /// Pop the next event due at or before `current_round`.
    pub fn pop_next(&mut self, current_round: u32) -> Option<Event> {
        self.current_round = self.current_round.max(current_round);
        if self.queue.peek()?.target_round > current_round {
            return None;
        }
        self.queue.pop()
    }

    /// Pop every event due at or before `current_round`, in order.
    pub fn pop_ready(&mut self, current_round: u32) -> Vec<Event> {
        let mut ready = Vec::new();
        while let Some(event) = self.pop_next(current_round) {
            ready.push(event);
        }
        ready
    }

    /// Firing round of the earliest queued event.
    #[must_use]
    pub fn peek_round(&self) -> Option<u32> {
        self.queue.peek().map(|e| e.target_round)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every queued event.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::EventKind;

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let mut scheduler = EventScheduler::new();
        let kinds = [
            EventKind::PlanningEnded,
            EventKind::CombatStart,
            EventKind::RoundEnd,
            EventKind::RoundStart,
        ];
        for kind in kinds {
            scheduler.schedule(Event::new(kind), 3).unwrap();
        }

        let fired: Vec<_> = scheduler.pop_ready(3).into_iter().map(|e| e.kind).collect();
        assert_eq!(fired, kinds.to_vec());
    }

    #[test]
    fn test_future_events_wait() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(Event::new(EventKind::RoundStart), 4).unwrap();

        assert!(scheduler.pop_ready(3).is_empty());
        assert_eq!(scheduler.peek_round(), Some(4));
        assert_eq!(scheduler.pop_ready(4).len(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_past_round_rejected() {
        let mut scheduler = EventScheduler::new();
        scheduler.pop_ready(5);

        let err = scheduler.schedule(Event::new(EventKind::CombatStart), 4).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::PastRound {
                kind: EventKind::CombatStart,
                requested: 4,
                current: 5,
            }
        );
        assert!(scheduler.schedule(Event::new(EventKind::CombatStart), 5).is_ok());
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let mut scheduler = EventScheduler::new();
        let a = scheduler.schedule(Event::new(EventKind::RoundStart), 9).unwrap();
        let b = scheduler.schedule(Event::new(EventKind::RoundStart), 1).unwrap();
        assert!(b > a);

        let first = scheduler.pop_next(9).unwrap();
        assert_eq!(first.target_round, 1);
        assert_eq!(first.sequence, b);
    }
}
