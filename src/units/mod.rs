//! Unit instances and the arena that owns them.

pub mod arena;
pub mod instance;

pub use arena::UnitArena;
pub use instance::{UnitId, UnitInstance, MAX_ITEMS, MAX_STAR};
