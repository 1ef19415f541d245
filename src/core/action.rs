//! Action representation: a 7-way kind plus kind-specific parameters.
//!
//! Actions are plain values produced by a policy or a scripted source and
//! consumed exactly once by the engine. The parameters are part of the
//! variant, so a `BuyChampion` can never be submitted without a slot.

use serde::{Deserialize, Serialize};

use crate::board::Position;

use super::player::PlayerId;

/// The top level of the hierarchical action space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Pass = 0,
    BuyXp = 1,
    RefreshShop = 2,
    BuyChampion = 3,
    SellChampion = 4,
    MoveChampion = 5,
    LockShop = 6,
}

impl ActionKind {
    /// Number of action kinds.
    pub const COUNT: usize = 7;

    /// All kinds in encoding order.
    pub const ALL: [ActionKind; ActionKind::COUNT] = [
        ActionKind::Pass,
        ActionKind::BuyXp,
        ActionKind::RefreshShop,
        ActionKind::BuyChampion,
        ActionKind::SellChampion,
        ActionKind::MoveChampion,
        ActionKind::LockShop,
    ];

    /// Index of this kind in [`ActionKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A complete action.
///
/// ```
/// use rust_autobattler::board::Position;
/// use rust_autobattler::core::{Action, ActionKind};
///
/// let buy = Action::BuyChampion { slot: 0 };
/// assert_eq!(buy.kind(), ActionKind::BuyChampion);
///
/// let field = Action::MoveChampion {
///     from: Position::bench(0).unwrap(),
///     to: Position::board(3, 3).unwrap(),
/// };
/// assert_eq!(field.kind(), ActionKind::MoveChampion);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Done for this planning phase.
    Pass,
    /// Buy experience for gold.
    BuyXp,
    /// Reroll the shop.
    RefreshShop,
    /// Buy the offer in a shop slot.
    BuyChampion { slot: usize },
    /// Sell the unit at a board or bench position.
    SellChampion { from: Position },
    /// Relocate a unit, swapping if the destination is occupied.
    MoveChampion { from: Position, to: Position },
    /// Toggle the shop lock.
    LockShop,
}

impl Action {
    /// The kind of this action.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Action::Pass => ActionKind::Pass,
            Action::BuyXp => ActionKind::BuyXp,
            Action::RefreshShop => ActionKind::RefreshShop,
            Action::BuyChampion { .. } => ActionKind::BuyChampion,
            Action::SellChampion { .. } => ActionKind::SellChampion,
            Action::MoveChampion { .. } => ActionKind::MoveChampion,
            Action::LockShop => ActionKind::LockShop,
        }
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for replay comparison and training data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Round in which the action was applied.
    pub round: u32,

    /// Sequence number within the round (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, round: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            round,
            sequence,
        }
    }
}
