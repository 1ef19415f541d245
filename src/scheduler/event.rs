//! Scheduled phase events.
//!
//! Every phase change in a game is driven by an `Event` popped from the
//! scheduler. Events carry their own firing round and an insertion
//! sequence, which together give a total order that does not depend on
//! anything random.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// What an event does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Economy update and shop refresh, then planning opens.
    RoundStart,
    /// Augment offers are resolved before planning.
    AugmentSelection,
    /// The planning step limit was reached.
    PlanningTimer,
    /// Planning closes; combat is pending.
    PlanningEnded,
    /// Matchups are generated and resolved.
    CombatStart,
    /// Carousel picks after combat.
    CarouselSelection,
    /// Eliminations and the terminal check.
    RoundEnd,
    /// The game is over.
    GameEnd,
}

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// At most one player is still alive.
    LastStanding,
    /// The round ceiling was reached.
    RoundLimit,
}

/// Extra data carried by an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventPayload {
    #[default]
    None,
    /// Decision steps taken when a planning timer fired.
    Steps(u32),
    End(EndReason),
}

/// A scheduled event.
///
/// Ordering is by `(target_round, sequence)` and is reversed so that a
/// `BinaryHeap<Event>` pops the earliest event first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub target_round: u32,

    /// Insertion order, assigned by the scheduler.
    pub sequence: u64,
    pub payload: EventPayload,
}

impl Event {
    /// An event with no payload. Round and sequence are set on scheduling.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target_round: 0,
            sequence: 0,
            payload: EventPayload::None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    /// The ordering key.
    #[must_use]
    pub fn key(&self) -> (u32, u64) {
        (self.target_round, self.sequence)
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earlier_key_ranks_higher() {
        let mut early = Event::new(EventKind::RoundStart);
        early.target_round = 1;
        early.sequence = 5;

        let mut late = Event::new(EventKind::RoundStart);
        late.target_round = 2;
        late.sequence = 0;

        assert!(early > late);
    }

    #[test]
    fn test_builder() {
        let event = Event::new(EventKind::GameEnd).with_payload(EventPayload::End(EndReason::RoundLimit));
        assert_eq!(event.payload, EventPayload::End(EndReason::RoundLimit));
        assert_eq!(event.key(), (0, 0));
    }
}
