//! Unit instances - runtime unit state.
//!
//! A `UnitInstance` is one physical champion owned by one player. It
//! records which definition it is, its star level, held items and where it
//! sits. Instances are stored in the game's `UnitArena` and referenced
//! everywhere else by `UnitId`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Position;
use crate::core::PlayerId;
use crate::data::{DefinitionId, ItemId};

/// Most items a unit can hold.
pub const MAX_ITEMS: usize = 3;

/// Highest star level.
pub const MAX_STAR: u8 = 3;

/// Unique id of a unit instance within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit on some player's board or bench.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitInstance {
    pub id: UnitId,
    pub definition: DefinitionId,

    /// Star level, 1 to 3.
    pub star: u8,

    /// Cost tier, copied from the definition.
    pub cost: u8,

    pub items: SmallVec<[ItemId; MAX_ITEMS]>,
    pub owner: PlayerId,
    pub position: Position,
}

impl UnitInstance {
    /// Create a 1-star unit with no items.
    #[must_use]
    pub fn new(id: UnitId, definition: DefinitionId, cost: u8, owner: PlayerId, position: Position) -> Self {
        Self {
            id,
            definition,
            star: 1,
            cost,
            items: SmallVec::new(),
            owner,
            position,
        }
    }

    /// Minted copies this unit stands for: 1, 3 or 9.
    #[must_use]
    pub fn copies(&self) -> u32 {
        3u32.pow(u32::from(self.star.max(1)) - 1)
    }

    /// Equip an item. Returns `false` when all slots are taken.
    pub fn add_item(&mut self, item: ItemId) -> bool {
        if self.items.len() >= MAX_ITEMS {
            return false;
        }
        self.items.push(item);
        true
    }

    #[must_use]
    pub fn can_upgrade(&self) -> bool {
        self.star < MAX_STAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> UnitInstance {
        UnitInstance::new(
            UnitId(7),
            DefinitionId(2),
            1,
            PlayerId::new(0),
            Position::bench(0).unwrap(),
        )
    }

    #[test]
    fn test_new_unit() {
        let u = unit();
        assert_eq!(u.star, 1);
        assert_eq!(u.copies(), 1);
        assert!(u.items.is_empty());
        assert!(u.can_upgrade());
    }

    #[test]
    fn test_copies_by_star() {
        let mut u = unit();
        u.star = 2;
        assert_eq!(u.copies(), 3);
        u.star = 3;
        assert_eq!(u.copies(), 9);
        assert!(!u.can_upgrade());
    }

    #[test]
    fn test_item_slots() {
        let mut u = unit();
        for i in 0..3 {
            assert!(u.add_item(ItemId(i)));
        }
        assert!(!u.add_item(ItemId(9)));
        assert_eq!(u.items.len(), 3);
    }
}
