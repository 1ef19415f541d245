//! Flat table of every live unit instance in a game.
//!
//! Boards, benches and history refer to units by `UnitId` only. The arena
//! is an `im::OrdMap`, so cloning a game for a fork shares structure, and
//! iteration is in id order.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::instance::{UnitId, UnitInstance};
use crate::board::Position;
use crate::core::PlayerId;
use crate::data::DefinitionId;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitArena {
    units: OrdMap<UnitId, UnitInstance>,
    next_id: u32,
}

impl UnitArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh 1-star unit and return its id.
    pub fn spawn(
        &mut self,
        definition: DefinitionId,
        cost: u8,
        owner: PlayerId,
        position: Position,
    ) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units
            .insert(id, UnitInstance::new(id, definition, cost, owner, position));
        id
    }

    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitInstance> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut UnitInstance> {
        self.units.get_mut(&id)
    }

    /// Remove a unit, returning its final state.
    pub fn remove(&mut self, id: UnitId) -> Option<UnitInstance> {
        self.units.remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All units in id order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitInstance> {
        self.units.values()
    }

    /// Units owned by `player`, in id order.
    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = &UnitInstance> {
        self.units.values().filter(move |u| u.owner == player)
    }
}
