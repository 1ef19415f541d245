//! Episode rollouts and replay.
//!
//! ## Key Types
//!
//! - `Trajectory`: Seed, submitted actions, round-end events and placements
//! - `RolloutWorker`: Plays seeded batches with one decision source
//!
//! `replay` feeds a recorded trajectory's actions back through a fresh
//! game; equal output is the determinism check used by the tests.

pub mod episode;
pub mod trajectory;

pub use episode::{replay, run_episode, RolloutConfig, RolloutWorker};
pub use trajectory::{StepRecord, Trajectory};
