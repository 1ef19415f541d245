//! Episode records for replay comparison and training data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{Action, PlayerId, PlayerMap, SnapshotError};
use crate::game::RoundEndEvent;
use crate::scheduler::EndReason;

/// The actions submitted at one decision step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Round the step was taken in.
    pub round: u32,

    /// Submitted actions, keyed in seat order.
    pub actions: BTreeMap<PlayerId, Action>,

    /// Players whose submission was rejected.
    pub rejected: Vec<PlayerId>,
}

/// A complete episode.
///
/// Two runs with the same seed and the same submitted actions produce
/// equal trajectories, so comparing encoded bytes is a full replay check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    pub seed: u64,
    pub steps: Vec<StepRecord>,
    pub round_events: Vec<RoundEndEvent>,
    pub placements: PlayerMap<Option<u8>>,
    pub end_reason: Option<EndReason>,

    /// Round the episode finished in.
    pub rounds: u32,
}

impl Trajectory {
    #[must_use]
    pub fn new(seed: u64, player_count: usize) -> Self {
        Self {
            seed,
            steps: Vec::new(),
            round_events: Vec::new(),
            placements: PlayerMap::with_value(player_count, None),
            end_reason: None,
            rounds: 0,
        }
    }

    pub fn push(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the episode reached game over.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.end_reason.is_some()
    }

    /// Round-end events of one player, in round order.
    pub fn player_events(&self, player: PlayerId) -> impl Iterator<Item = &RoundEndEvent> {
        self.round_events.iter().filter(move |e| e.player == player)
    }

    /// Actions one player had applied or rejected, in step order.
    pub fn player_actions(&self, player: PlayerId) -> impl Iterator<Item = Action> + '_ {
        self.steps
            .iter()
            .filter_map(move |s| s.actions.get(&player).copied())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
