//! Error taxonomy.
//!
//! Two families with different propagation rules:
//!
//! - **Recoverable**: [`ActionError`] and [`PoolError`]. A rejected action
//!   leaves the game untouched and is reported back to the caller; a short
//!   pool draw is absorbed by the shop.
//! - **Fatal**: [`EngineError`]. An internal invariant broke (scheduler
//!   ordering, illegal phase transition). The instance latches the error and
//!   refuses further steps.

use thiserror::Error;

use crate::board::Position;
use crate::core::action::Action;
use crate::core::player::PlayerId;
use crate::data::DefinitionId;
use crate::scheduler::{EventKind, Phase};

/// A rejected action. State is never mutated when one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action is not present in the player's current mask.
    #[error("illegal action {action:?}: {reason}")]
    IllegalAction {
        action: Action,
        reason: Box<ActionError>,
    },

    #[error("insufficient gold: need {needed}, have {available}")]
    InsufficientGold { needed: u32, available: u32 },

    #[error("shop slot {0} is empty")]
    SlotEmpty(usize),

    #[error("shop slot {0} does not exist")]
    InvalidSlot(usize),

    #[error("bench is full")]
    BenchFull,

    #[error("{0} is occupied")]
    PositionOccupied(Position),

    #[error("{0} holds no unit")]
    PositionEmpty(Position),

    #[error("position index {0} is out of range")]
    InvalidPosition(usize),

    #[error("source and destination are both {0}")]
    SamePosition(Position),

    #[error("board capacity of {cap} units reached")]
    CapacityExceeded { cap: usize },

    #[error("already at max level {0}")]
    MaxLevel(u8),

    #[error("actions are not accepted during {0:?}")]
    WrongPhase(Phase),

    #[error("{0} is not expected to act")]
    NotExpected(PlayerId),
}

impl ActionError {
    /// The component-level cause, unwrapping the mask-boundary wrapper.
    #[must_use]
    pub fn reason(&self) -> &ActionError {
        match self {
            ActionError::IllegalAction { reason, .. } => reason.reason(),
            other => other,
        }
    }

    /// Wrap a component-level rejection for reporting at the decision boundary.
    #[must_use]
    pub fn illegal(action: Action, reason: ActionError) -> Self {
        ActionError::IllegalAction {
            action,
            reason: Box::new(reason),
        }
    }
}

/// A draw request the shared pool cannot satisfy.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("pool exhausted for level {level} odds")]
    Exhausted { level: u8 },

    #[error("no copies of {0} remain in the pool")]
    NoCopies(DefinitionId),
}

/// Scheduler invariant violations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("{kind:?} scheduled for round {requested} but round {current} has already started")]
    PastRound {
        kind: EventKind,
        requested: u32,
        current: u32,
    },

    #[error("event queue drained in round {round} before the game ended")]
    QueueDrained { round: u32 },
}

/// Fatal engine errors. The instance is unusable once one is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("scheduler invariant violated: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("illegal phase transition {from:?} -> {to:?}")]
    IllegalTransition { from: Phase, to: Phase },

    #[error("unit definition {0} is not in the game data")]
    UnknownDefinition(DefinitionId),

    #[error("step called before reset")]
    NotStarted,

    #[error("the game is over")]
    GameFinished,

    #[error("instance aborted after a fatal error: {0}")]
    Aborted(Box<EngineError>),
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Snapshot encoding failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("bincode error: {0}")]
    Codec(#[from] bincode::Error),
}
