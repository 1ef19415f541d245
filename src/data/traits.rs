//! Trait bonus computation.
//!
//! Trait synergies are computed outside the combat resolver and handed to
//! it as one precomputed board-wide bonus. The provider is a trait so
//! rulesets can plug in their own synergy logic.

use rustc_hash::FxHashMap;

use super::definition::{DefinitionId, TraitId};
use super::registry::GameData;

/// Computes the board-wide power bonus for a set of fielded units.
pub trait TraitBonusProvider: Send + Sync + std::fmt::Debug {
    /// Fractional bonus (0.25 = +25%) for the given fielded definitions.
    ///
    /// `fielded` may contain duplicates when the same unit type is fielded
    /// more than once.
    fn board_bonus(&self, fielded: &[DefinitionId], data: &GameData) -> f64;
}

/// No synergies at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTraitBonus;

impl TraitBonusProvider for NoTraitBonus {
    fn board_bonus(&self, _fielded: &[DefinitionId], _data: &GameData) -> f64 {
        0.0
    }
}

/// Breakpoint synergies: each trait counts distinct fielded unit types and
/// contributes its highest reached breakpoint. Contributions add up.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreakpointTraits;

impl TraitBonusProvider for BreakpointTraits {
    fn board_bonus(&self, fielded: &[DefinitionId], data: &GameData) -> f64 {
        let mut distinct: Vec<DefinitionId> = fielded.to_vec();
        distinct.sort_unstable();
        distinct.dedup();

        let mut counts: FxHashMap<TraitId, u32> = FxHashMap::default();
        for id in &distinct {
            if let Some(unit) = data.unit(*id) {
                for t in &unit.traits {
                    *counts.entry(*t).or_insert(0) += 1;
                }
            }
        }

        // Sum in trait id order so float rounding is reproducible.
        let mut active: Vec<(TraitId, u32)> = counts.into_iter().collect();
        active.sort_unstable();
        active
            .iter()
            .filter_map(|(t, n)| data.trait_definition(*t).map(|def| def.bonus_for(*n)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_trait_bonus() {
        let data = GameData::standard_roster();
        let fielded: Vec<_> = data.unit_ids().take(6).collect();
        assert_eq!(NoTraitBonus.board_bonus(&fielded, &data), 0.0);
    }

    #[test]
    fn test_breakpoints_count_distinct_units() {
        let data = GameData::standard_roster();
        // Squire (Vanguard, Warlord) and Pikeman (Vanguard, Duelist).
        let squire = DefinitionId(0);
        let pikeman = DefinitionId(5);

        let single = BreakpointTraits.board_bonus(&[squire, squire], &data);
        assert_eq!(single, 0.0);

        let pair = BreakpointTraits.board_bonus(&[squire, pikeman], &data);
        assert!((pair - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_empty_board() {
        let data = GameData::standard_roster();
        assert_eq!(BreakpointTraits.board_bonus(&[], &data), 0.0);
    }
}
