//! Static game data: definitions, registry, trait bonuses.
//!
//! ## Key Types
//!
//! - `DefinitionId`: Identifier for a unit type
//! - `UnitDefinition`, `ItemDefinition`, `TraitDefinition`, `AugmentDefinition`
//! - `GameData`: Read-only registry shared by game instances
//! - `TraitBonusProvider`: Pluggable synergy computation
//!
//! Nothing in this module changes once a game has started.

pub mod definition;
pub mod registry;
pub mod traits;

pub use definition::{
    AugmentDefinition, AugmentEffect, AugmentId, DefinitionId, ItemDefinition, ItemId,
    TraitBreakpoint, TraitDefinition, TraitId, UnitDefinition,
};
pub use registry::{GameData, GameDataFile};
pub use traits::{BreakpointTraits, NoTraitBonus, TraitBonusProvider};
