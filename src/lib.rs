//! # rust-autobattler
//!
//! A deterministic auto-battler simulation engine for self-play RL training.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: The same seed and the same submitted actions give
//!    bit-identical trajectories. Every random draw comes from a named
//!    ChaCha8 stream owned by the instance.
//!
//! 2. **Masked Actions**: `get_action_mask` is the single legality
//!    authority. Anything outside the mask is rejected without touching
//!    state.
//!
//! 3. **Configuration Over Convention**: Shop odds, economy tables, damage
//!    and combat tuning are all `GameConfig` values.
//!
//! ## Architecture
//!
//! - **Event-Driven Phases**: A priority queue keyed by (round, insertion
//!   sequence) drives the phase machine. Timers are events, never waits.
//!
//! - **Arena Units**: Units live in one `im::OrdMap` keyed by `UnitId`;
//!   boards and shops hold ids only. Forks of a running game are cheap.
//!
//! - **Statistical Combat**: Aggregate board power and a logistic win
//!   curve instead of tick simulation.
//!
//! ## Modules
//!
//! - `core`: Players, actions, errors, RNG, configuration
//! - `board`: Hex board and bench positions
//! - `data`: Static unit/item/trait/augment definitions
//! - `units`: Unit instances and the unit arena
//! - `economy`: Shared pool, shops, gold/XP bookkeeping
//! - `scheduler`: Event queue and phase state machine
//! - `actions`: Action space encoding, masks, application
//! - `combat`: Matchmaking and combat resolution
//! - `game`: Game state, roster operations, the reset/step engine
//! - `agents`: Scripted decision sources
//! - `rollout`: Episodes, trajectories and replay

pub mod core;
pub mod board;
pub mod data;
pub mod units;
pub mod economy;
pub mod scheduler;
pub mod actions;
pub mod combat;
pub mod game;
pub mod agents;
pub mod rollout;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap,
    GameRng,
    GameConfig, CombatConfig,
    Action, ActionKind, ActionRecord,
    ActionError, EngineError, ConfigError, PoolError, SchedulerError, SnapshotError,
};

pub use crate::board::{Board, Position};

pub use crate::data::{
    DefinitionId, ItemId, TraitId, AugmentId,
    UnitDefinition, ItemDefinition, TraitDefinition, AugmentDefinition,
    GameData, TraitBonusProvider, BreakpointTraits, NoTraitBonus,
};

pub use crate::units::{UnitArena, UnitId, UnitInstance};

pub use crate::economy::{PlayerEconomy, Shop, ShopPool};

pub use crate::scheduler::{Event, EventKind, EventScheduler, Phase, PhaseMachine};

pub use crate::actions::{apply_action, check_action, get_action_mask, ActionMask, ActionSpace};

pub use crate::combat::{resolve, BoardSnapshot, CombatResult, Matchup};

pub use crate::game::{Game, GameState, PlayerSnapshot, RoundEndEvent, StepOutcome};

pub use crate::agents::{DecisionSource, GreedyAgent, PassAgent, RandomAgent};

pub use crate::rollout::{replay, run_episode, RolloutConfig, RolloutWorker, Trajectory};
