//! Registry of static game data.
//!
//! `GameData` is built once, then shared read-only by every game instance
//! through an `Arc`. Lookups go through `FxHashMap`; anything the engine
//! iterates (definitions per cost tier, items, augments) is kept in sorted
//! vectors so iteration order never depends on hashing.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{
    AugmentDefinition, AugmentEffect, AugmentId, DefinitionId, ItemDefinition, ItemId,
    TraitBreakpoint, TraitDefinition, TraitId, UnitDefinition,
};
use crate::core::ConfigError;

/// On-disk layout of a data file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDataFile {
    #[serde(default)]
    pub units: Vec<UnitDefinition>,
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
    #[serde(default)]
    pub traits: Vec<TraitDefinition>,
    #[serde(default)]
    pub augments: Vec<AugmentDefinition>,
}

/// Unit, item, trait and augment definitions for one ruleset.
///
/// ## Example
///
/// ```
/// use rust_autobattler::data::{DefinitionId, GameData, UnitDefinition};
///
/// let mut data = GameData::new();
/// data.register_unit(UnitDefinition::new(DefinitionId::new(0), "Squire", 1, 40.0))
///     .unwrap();
///
/// assert_eq!(data.unit(DefinitionId::new(0)).unwrap().name, "Squire");
/// assert_eq!(data.units_of_cost(1), &[DefinitionId::new(0)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GameData {
    units: FxHashMap<DefinitionId, UnitDefinition>,
    by_cost: Vec<Vec<DefinitionId>>,
    items: Vec<ItemDefinition>,
    traits: FxHashMap<TraitId, TraitDefinition>,
    augments: Vec<AugmentDefinition>,
}

impl GameData {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a parsed data file.
    pub fn from_file_data(file: GameDataFile) -> Result<Self, ConfigError> {
        let mut data = Self::new();
        for t in file.traits {
            data.register_trait(t)?;
        }
        for unit in file.units {
            for t in &unit.traits {
                if !data.traits.contains_key(t) {
                    return Err(ConfigError::Invalid(format!(
                        "{} references unknown trait {}",
                        unit.name, t.0
                    )));
                }
            }
            data.register_unit(unit)?;
        }
        for item in file.items {
            data.register_item(item)?;
        }
        for augment in file.augments {
            data.register_augment(augment)?;
        }
        Ok(data)
    }

    /// Parse a registry from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: GameDataFile = toml::from_str(source)?;
        Self::from_file_data(file)
    }

    /// Read and parse a TOML data file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Register a unit definition.
    pub fn register_unit(&mut self, unit: UnitDefinition) -> Result<(), ConfigError> {
        if self.units.contains_key(&unit.id) {
            return Err(ConfigError::Invalid(format!("duplicate unit id {}", unit.id)));
        }
        if unit.cost == 0 {
            return Err(ConfigError::Invalid(format!("{} has cost 0", unit.name)));
        }
        if unit.base_power.is_nan() || unit.base_power < 0.0 {
            return Err(ConfigError::Invalid(format!("{} has negative power", unit.name)));
        }

        self.index_unit(unit);
        Ok(())
    }

    fn index_unit(&mut self, unit: UnitDefinition) {
        let tier = usize::from(unit.cost.max(1)) - 1;
        if self.by_cost.len() <= tier {
            self.by_cost.resize(tier + 1, Vec::new());
        }
        let ids = &mut self.by_cost[tier];
        let at = ids.partition_point(|id| *id < unit.id);
        ids.insert(at, unit.id);

        self.units.insert(unit.id, unit);
    }

    pub fn register_item(&mut self, item: ItemDefinition) -> Result<(), ConfigError> {
        if self.items.iter().any(|i| i.id == item.id) {
            return Err(ConfigError::Invalid(format!("duplicate item id {}", item.id.0)));
        }
        let at = self.items.partition_point(|i| i.id < item.id);
        self.items.insert(at, item);
        Ok(())
    }

    pub fn register_trait(&mut self, mut definition: TraitDefinition) -> Result<(), ConfigError> {
        if self.traits.contains_key(&definition.id) {
            return Err(ConfigError::Invalid(format!("duplicate trait id {}", definition.id.0)));
        }
        definition.breakpoints.sort_by_key(|bp| bp.units);
        self.traits.insert(definition.id, definition);
        Ok(())
    }

    pub fn register_augment(&mut self, augment: AugmentDefinition) -> Result<(), ConfigError> {
        if self.augments.iter().any(|a| a.id == augment.id) {
            return Err(ConfigError::Invalid(format!("duplicate augment id {}", augment.id.0)));
        }
        let at = self.augments.partition_point(|a| a.id < augment.id);
        self.augments.insert(at, augment);
        Ok(())
    }

    // === Lookup ===

    #[must_use]
    pub fn unit(&self, id: DefinitionId) -> Option<&UnitDefinition> {
        self.units.get(&id)
    }

    #[must_use]
    pub fn contains_unit(&self, id: DefinitionId) -> bool {
        self.units.contains_key(&id)
    }

    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Definitions of a cost tier, sorted by id.
    #[must_use]
    pub fn units_of_cost(&self, cost: u8) -> &[DefinitionId] {
        usize::from(cost)
            .checked_sub(1)
            .and_then(|tier| self.by_cost.get(tier))
            .map_or(&[], Vec::as_slice)
    }

    /// All unit ids, sorted by cost then id.
    pub fn unit_ids(&self) -> impl Iterator<Item = DefinitionId> + '_ {
        self.by_cost.iter().flatten().copied()
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items
            .binary_search_by_key(&id, |i| i.id)
            .ok()
            .map(|at| &self.items[at])
    }

    /// Items sorted by id.
    #[must_use]
    pub fn items(&self) -> &[ItemDefinition] {
        &self.items
    }

    #[must_use]
    pub fn trait_definition(&self, id: TraitId) -> Option<&TraitDefinition> {
        self.traits.get(&id)
    }

    /// Augments sorted by id.
    #[must_use]
    pub fn augments(&self) -> &[AugmentDefinition] {
        &self.augments
    }

    #[must_use]
    pub fn augment(&self, id: AugmentId) -> Option<&AugmentDefinition> {
        self.augments
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|at| &self.augments[at])
    }

    /// A small, fixed ruleset used by tests, benchmarks and demos.
    ///
    /// 34 units over five cost tiers, six traits, six items, six augments.
    #[must_use]
    pub fn standard_roster() -> Self {
        const TRAITS: [(&str, [(u32, f64); 2]); 6] = [
            ("Vanguard", [(2, 0.10), (4, 0.25)]),
            ("Arcanist", [(2, 0.12), (4, 0.30)]),
            ("Ranger", [(2, 0.10), (4, 0.22)]),
            ("Duelist", [(2, 0.08), (4, 0.20)]),
            ("Mystic", [(2, 0.10), (3, 0.18)]),
            ("Warlord", [(3, 0.15), (5, 0.35)]),
        ];

        // (name, cost, base power, traits)
        const UNITS: [(&str, u8, f64, [u16; 2]); 34] = [
            ("Squire", 1, 40.0, [0, 5]),
            ("Acolyte", 1, 38.0, [1, 4]),
            ("Scout", 1, 41.0, [2, 3]),
            ("Brawler", 1, 43.0, [3, 0]),
            ("Hexling", 1, 37.0, [1, 2]),
            ("Pikeman", 1, 42.0, [0, 3]),
            ("Oracle", 1, 36.0, [4, 1]),
            ("Raider", 1, 44.0, [5, 2]),
            ("Templar", 2, 58.0, [0, 4]),
            ("Sorcerer", 2, 55.0, [1, 5]),
            ("Longbow", 2, 57.0, [2, 0]),
            ("Fencer", 2, 59.0, [3, 1]),
            ("Seer", 2, 54.0, [4, 2]),
            ("Marauder", 2, 60.0, [5, 3]),
            ("Shieldbearer", 2, 56.0, [0, 1]),
            ("Trapper", 2, 57.0, [2, 4]),
            ("Paladin", 3, 80.0, [0, 2]),
            ("Warlock", 3, 78.0, [1, 3]),
            ("Sharpshooter", 3, 81.0, [2, 5]),
            ("Bladedancer", 3, 82.0, [3, 4]),
            ("Mystic Sage", 3, 76.0, [4, 0]),
            ("Battlemaster", 3, 83.0, [5, 1]),
            ("Spellblade", 3, 79.0, [1, 3]),
            ("Sentinel", 3, 80.0, [0, 4]),
            ("Juggernaut", 4, 110.0, [0, 5]),
            ("Archmage", 4, 106.0, [1, 4]),
            ("Windrunner", 4, 108.0, [2, 3]),
            ("Swordsaint", 4, 112.0, [3, 5]),
            ("Prophet", 4, 104.0, [4, 1]),
            ("Conqueror", 4, 114.0, [5, 0]),
            ("Titan", 5, 150.0, [0, 5]),
            ("Void Weaver", 5, 145.0, [1, 4]),
            ("Huntress", 5, 148.0, [2, 3]),
            ("Emperor", 5, 155.0, [5, 3]),
        ];

        const ITEMS: [(&str, f64); 6] = [
            ("Longsword", 0.10),
            ("Chain Vest", 0.08),
            ("Recurve Bow", 0.10),
            ("Rod", 0.12),
            ("Tear", 0.06),
            ("Giant's Belt", 0.09),
        ];

        const AUGMENTS: [(&str, AugmentEffect); 6] = [
            ("Small Purse", AugmentEffect::Gold(6)),
            ("Treasure Trove", AugmentEffect::Gold(12)),
            ("Rolling for Days", AugmentEffect::FreeRerolls(3)),
            ("Big Reroll", AugmentEffect::FreeRerolls(6)),
            ("Study Hall", AugmentEffect::Experience(4)),
            ("Epoch", AugmentEffect::Experience(8)),
        ];

        let file = GameDataFile {
            traits: TRAITS
                .iter()
                .enumerate()
                .map(|(i, (name, bps))| TraitDefinition {
                    id: TraitId(i as u16),
                    name: (*name).to_string(),
                    breakpoints: bps
                        .iter()
                        .map(|&(units, bonus)| TraitBreakpoint { units, bonus })
                        .collect(),
                })
                .collect(),
            units: UNITS
                .iter()
                .enumerate()
                .map(|(i, &(name, cost, power, traits))| UnitDefinition {
                    id: DefinitionId(i as u16),
                    name: name.to_string(),
                    cost,
                    base_power: power,
                    traits: traits.iter().map(|&t| TraitId(t)).collect(),
                })
                .collect(),
            items: ITEMS
                .iter()
                .enumerate()
                .map(|(i, &(name, power_bonus))| ItemDefinition {
                    id: ItemId(i as u16),
                    name: name.to_string(),
                    power_bonus,
                })
                .collect(),
            augments: AUGMENTS
                .iter()
                .enumerate()
                .map(|(i, &(name, effect))| AugmentDefinition {
                    id: AugmentId(i as u16),
                    name: name.to_string(),
                    effect,
                })
                .collect(),
        };

        let mut data = Self::new();
        // The table above has unique ids and known traits.
        for t in file.traits {
            data.traits.insert(t.id, t);
        }
        for unit in file.units {
            data.index_unit(unit);
        }
        data.items = file.items;
        data.augments = file.augments;
        data
    }
}
