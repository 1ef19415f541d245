//! Core engine types: players, actions, RNG, configuration, errors.
//!
//! These are shared by every subsystem. Patch-dependent numbers live in
//! `GameConfig` rather than in the subsystems that use them.

pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;

pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{CombatConfig, GameConfig, StreakBonus};
pub use action::{Action, ActionKind, ActionRecord};
pub use error::{ActionError, ConfigError, EngineError, PoolError, SchedulerError, SnapshotError};
