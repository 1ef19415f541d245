//! Flat encoding of the hierarchical action space.
//!
//! Every action maps to one index. Kinds occupy contiguous blocks in
//! [`ActionKind`] order:
//!
//! | block          | width                        |
//! |----------------|------------------------------|
//! | Pass           | 1                            |
//! | BuyXp          | 1                            |
//! | RefreshShop    | 1                            |
//! | BuyChampion    | shop size                    |
//! | SellChampion   | 37 positions                 |
//! | MoveChampion   | 37 × 36 ordered pairs        |
//! | LockShop       | 1                            |
//!
//! With a five-slot shop that is 1378 indices.

use crate::board::{Position, POSITION_COUNT};
use crate::core::{Action, ActionKind};

const MOVE_TARGETS: usize = POSITION_COUNT - 1;

/// The enumerated action space for a given shop size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionSpace {
    shop_size: usize,
}

impl ActionSpace {
    #[must_use]
    pub const fn new(shop_size: usize) -> Self {
        Self { shop_size }
    }

    #[must_use]
    pub const fn shop_size(&self) -> usize {
        self.shop_size
    }

    /// Number of indices in the block of one kind.
    #[must_use]
    pub const fn width(&self, kind: ActionKind) -> usize {
        match kind {
            ActionKind::Pass | ActionKind::BuyXp | ActionKind::RefreshShop | ActionKind::LockShop => 1,
            ActionKind::BuyChampion => self.shop_size,
            ActionKind::SellChampion => POSITION_COUNT,
            ActionKind::MoveChampion => POSITION_COUNT * MOVE_TARGETS,
        }
    }

    /// First index of the block of one kind.
    #[must_use]
    pub fn offset(&self, kind: ActionKind) -> usize {
        ActionKind::ALL
            .iter()
            .take_while(|k| **k != kind)
            .map(|k| self.width(*k))
            .sum()
    }

    /// Total number of indices.
    #[must_use]
    pub fn size(&self) -> usize {
        ActionKind::ALL.iter().map(|k| self.width(*k)).sum()
    }

    /// Index of an action, or `None` when its parameters fall outside the space.
    #[must_use]
    pub fn encode(&self, action: Action) -> Option<usize> {
        let base = self.offset(action.kind());
        let within = match action {
            Action::Pass | Action::BuyXp | Action::RefreshShop | Action::LockShop => 0,
            Action::BuyChampion { slot } => {
                if slot >= self.shop_size {
                    return None;
                }
                slot
            }
            Action::SellChampion { from } => from.index(),
            Action::MoveChampion { from, to } => {
                if from == to {
                    return None;
                }
                let (f, t) = (from.index(), to.index());
                f * MOVE_TARGETS + if t < f { t } else { t - 1 }
            }
        };
        Some(base + within)
    }

    /// Action at an index.
    #[must_use]
    pub fn decode(&self, index: usize) -> Option<Action> {
        let mut rest = index;
        for kind in ActionKind::ALL {
            let width = self.width(kind);
            if rest < width {
                return self.decode_within(kind, rest);
            }
            rest -= width;
        }
        None
    }

    fn decode_within(&self, kind: ActionKind, within: usize) -> Option<Action> {
        Some(match kind {
            ActionKind::Pass => Action::Pass,
            ActionKind::BuyXp => Action::BuyXp,
            ActionKind::RefreshShop => Action::RefreshShop,
            ActionKind::LockShop => Action::LockShop,
            ActionKind::BuyChampion => Action::BuyChampion { slot: within },
            ActionKind::SellChampion => Action::SellChampion {
                from: Position::new(within)?,
            },
            ActionKind::MoveChampion => {
                let f = within / MOVE_TARGETS;
                let t = within % MOVE_TARGETS;
                let t = if t < f { t } else { t + 1 };
                Action::MoveChampion {
                    from: Position::new(f)?,
                    to: Position::new(t)?,
                }
            }
        })
    }

    /// Every action in index order.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        (0..self.size()).filter_map(move |i| self.decode(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size() {
        let space = ActionSpace::new(5);
        assert_eq!(space.size(), 1378);
        assert_eq!(space.offset(ActionKind::BuyChampion), 3);
        assert_eq!(space.offset(ActionKind::SellChampion), 8);
        assert_eq!(space.offset(ActionKind::MoveChampion), 45);
        assert_eq!(space.offset(ActionKind::LockShop), 1377);
    }

    #[test]
    fn test_every_index_decodes_back() {
        let space = ActionSpace::new(5);
        for index in 0..space.size() {
            let action = space.decode(index).unwrap();
            assert_eq!(space.encode(action), Some(index), "{action:?}");
        }
        assert_eq!(space.decode(space.size()), None);
    }

    #[test]
    fn test_out_of_space_parameters() {
        let space = ActionSpace::new(5);
        let slot = Position::bench(0).unwrap();
        assert_eq!(space.encode(Action::BuyChampion { slot: 5 }), None);
        assert_eq!(space.encode(Action::MoveChampion { from: slot, to: slot }), None);
    }

    #[test]
    fn test_move_block_skips_diagonal() {
        let space = ActionSpace::new(5);
        let base = space.offset(ActionKind::MoveChampion);
        let p = |i| Position::new(i).unwrap();

        assert_eq!(space.encode(Action::MoveChampion { from: p(0), to: p(1) }), Some(base));
        assert_eq!(space.encode(Action::MoveChampion { from: p(1), to: p(0) }), Some(base + 36));
        assert_eq!(space.encode(Action::MoveChampion { from: p(1), to: p(2) }), Some(base + 37));
    }
}
