//! Board and bench: 28 hex cells plus 9 bench slots per player.
//!
//! ## Key Types
//!
//! - `Position`: Flat 0..37 index shared with the action encoding
//! - `Board`: Occupancy map from positions to unit ids
//!
//! Board placement is capped by the owner's level; the bench is not.

pub mod layout;
pub mod position;

pub use layout::Board;
pub use position::{Position, BENCH_SLOTS, BOARD_CELLS, BOARD_COLS, BOARD_ROWS, POSITION_COUNT};
