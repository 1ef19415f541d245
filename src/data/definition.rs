//! Static definitions: units, items, traits, augments.
//!
//! Definitions are immutable once a game starts. Runtime state (star
//! level, held items, position) lives on `UnitInstance`.

use serde::{Deserialize, Serialize};

/// Identifier for a unit definition (a champion type, not an instance).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefinitionId(pub u16);

impl DefinitionId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TraitId(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AugmentId(pub u16);

/// A purchasable unit type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: DefinitionId,
    pub name: String,

    /// Shop cost, which is also the cost tier (1-5).
    pub cost: u8,

    /// Combat power of a 1-star copy with no items or traits.
    pub base_power: f64,

    #[serde(default)]
    pub traits: Vec<TraitId>,
}

impl UnitDefinition {
    /// Create a definition with no traits.
    #[must_use]
    pub fn new(id: DefinitionId, name: impl Into<String>, cost: u8, base_power: f64) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            base_power,
            traits: Vec::new(),
        }
    }

    /// Add a trait (builder pattern).
    #[must_use]
    pub fn with_trait(mut self, trait_id: TraitId) -> Self {
        self.traits.push(trait_id);
        self
    }
}

/// An item a unit can hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,

    /// Fractional power bonus; items on one unit add up.
    pub power_bonus: f64,
}

/// One activation level of a trait.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitBreakpoint {
    /// Distinct fielded units with the trait needed to activate.
    pub units: u32,

    /// Fractional power bonus for the whole board.
    pub bonus: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitDefinition {
    pub id: TraitId,
    pub name: String,

    /// Breakpoints in ascending order of `units`.
    pub breakpoints: Vec<TraitBreakpoint>,
}

impl TraitDefinition {
    /// Bonus for fielding `units` distinct units with this trait.
    #[must_use]
    pub fn bonus_for(&self, units: u32) -> f64 {
        self.breakpoints
            .iter()
            .filter(|bp| units >= bp.units)
            .map(|bp| bp.bonus)
            .fold(0.0, f64::max)
    }
}

/// What picking an augment does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AugmentEffect {
    /// Immediate gold.
    Gold(u32),
    /// Rerolls that cost nothing.
    FreeRerolls(u32),
    /// XP granted at the next economy update.
    Experience(u32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AugmentDefinition {
    pub id: AugmentId,
    pub name: String,
    pub effect: AugmentEffect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_definition_builder() {
        let unit = UnitDefinition::new(DefinitionId::new(3), "Warden", 2, 55.0)
            .with_trait(TraitId(0))
            .with_trait(TraitId(4));

        assert_eq!(unit.cost, 2);
        assert_eq!(unit.traits, vec![TraitId(0), TraitId(4)]);
        assert_eq!(unit.id.to_string(), "Unit(3)");
    }

    #[test]
    fn test_trait_bonus_for() {
        let guardian = TraitDefinition {
            id: TraitId(1),
            name: "Guardian".to_string(),
            breakpoints: vec![
                TraitBreakpoint { units: 2, bonus: 0.1 },
                TraitBreakpoint { units: 4, bonus: 0.25 },
            ],
        };

        assert_eq!(guardian.bonus_for(1), 0.0);
        assert_eq!(guardian.bonus_for(3), 0.1);
        assert_eq!(guardian.bonus_for(6), 0.25);
    }
}
