//! Frozen copies of boards taken at combat start.

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::core::{EngineError, PlayerId};
use crate::data::{DefinitionId, ItemId, TraitBonusProvider};
use crate::game::GameState;

/// One fielded unit as the resolver sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub definition: DefinitionId,
    pub star: u8,
    pub cost: u8,
    pub position: Position,
    pub items: Vec<ItemId>,
    pub base_power: f64,

    /// Summed fractional bonus of held items.
    pub item_bonus: f64,
}

/// Everything on one side of a matchup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub player: Option<PlayerId>,
    pub units: Vec<UnitSnapshot>,

    /// Precomputed board-wide trait bonus.
    pub trait_bonus: f64,
}

impl BoardSnapshot {
    /// A side with no units.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the hex-board units of `player`. Bench units do not fight.
    ///
    /// A fielded unit whose definition is missing from the game data is an
    /// engine invariant violation.
    pub fn capture(
        state: &GameState,
        player: PlayerId,
        traits: &dyn TraitBonusProvider,
    ) -> Result<Self, EngineError> {
        let mut units = Vec::new();
        for (position, id) in state.player(player).board.board_units() {
            let Some(unit) = state.units.get(id) else {
                continue;
            };
            let definition = state
                .data
                .unit(unit.definition)
                .ok_or(EngineError::UnknownDefinition(unit.definition))?;
            let item_bonus = unit
                .items
                .iter()
                .filter_map(|item| state.data.item(*item))
                .map(|item| item.power_bonus)
                .sum();
            units.push(UnitSnapshot {
                definition: unit.definition,
                star: unit.star,
                cost: unit.cost,
                position,
                items: unit.items.to_vec(),
                base_power: definition.base_power,
                item_bonus,
            });
        }

        let fielded: Vec<DefinitionId> = units.iter().map(|u| u.definition).collect();
        let trait_bonus = traits.board_bonus(&fielded, &state.data);
        Ok(Self {
            player: Some(player),
            units,
            trait_bonus,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}
