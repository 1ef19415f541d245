//! Economy: the shared unit pool, player shops, gold and XP.
//!
//! ## Key Types
//!
//! - `ShopPool`: Finite copies of every unit type, shared by the lobby
//! - `Shop`: A player's offer slots, drawn from the pool by level odds
//! - `PlayerEconomy`: Gold, XP, level and streaks with the ordered round update

pub mod income;
pub mod pool;
pub mod shop;

pub use income::{CombatOutcome, IncomeReport, PlayerEconomy};
pub use pool::ShopPool;
pub use shop::Shop;
