//! Game state and the step/reset engine.
//!
//! ## Key Types
//!
//! - `GameState`: Players, pool, unit arena, phase and random streams
//! - `Game`: One instance driven by `reset`/`step`
//! - `PlayerSnapshot`: Read-only per-player observation
//! - `RoundEndEvent`: Health change and elimination placement per round
//!
//! Roster operations (buy, sell, move, combine) live on `GameState` in
//! `roster`; the engine only sequences them.

pub mod engine;
pub mod roster;
pub mod snapshot;
pub mod state;

pub use engine::{Game, StepOutcome};
pub use roster::Combination;
pub use snapshot::{OpponentView, PlayerSnapshot, RoundEndEvent, UnitView};
pub use state::{GameState, PlayerState, PoolDiscrepancy, RngStreams};
