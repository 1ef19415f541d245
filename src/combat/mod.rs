//! Round combat: pairing and statistical resolution.
//!
//! ## Key Types
//!
//! - `BoardSnapshot`: A side's fielded units frozen at combat start
//! - `Matchup`: One pairing, possibly against a ghost board
//! - `CombatResult`: Winner, survivors and damage for one matchup
//!
//! `resolve` is a pure function: the same two snapshots and seed always
//! give the same result.

pub mod matchmaking;
pub mod resolver;
pub mod snapshot;

pub use matchmaking::{generate_matchups, Matchup};
pub use resolver::{board_power, resolve, unit_power, win_probability, CombatResult, Side};
pub use snapshot::{BoardSnapshot, UnitSnapshot};
