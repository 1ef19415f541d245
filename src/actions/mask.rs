//! Validity masks over the flat action space.
//!
//! A mask is derived from the current state every time it is requested and
//! is never cached. Each bit is exactly `check_action(..).is_ok()` for the
//! decoded action, so the mask has no false positives or negatives.

use serde::{Deserialize, Serialize};

use super::apply::check_action;
use super::space::ActionSpace;
use crate::board::Position;
use crate::core::{Action, ActionKind, PlayerId};
use crate::game::GameState;

/// Legal actions for one player at one decision point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMask {
    bits: Vec<bool>,
    kinds: [bool; ActionKind::COUNT],
    shop_size: usize,
}

impl ActionMask {
    /// A mask with nothing legal.
    #[must_use]
    pub fn empty(space: ActionSpace) -> Self {
        Self {
            bits: vec![false; space.size()],
            kinds: [false; ActionKind::COUNT],
            shop_size: space.shop_size(),
        }
    }

    fn space(&self) -> ActionSpace {
        ActionSpace::new(self.shop_size)
    }

    fn set(&mut self, index: usize, action: Action) {
        self.bits[index] = true;
        self.kinds[action.kind().index()] = true;
    }

    /// The raw bit vector, aligned to [`ActionSpace`] indices.
    #[must_use]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    #[must_use]
    pub fn is_legal(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn contains(&self, action: Action) -> bool {
        self.space().encode(action).is_some_and(|i| self.is_legal(i))
    }

    /// Whether any action of `kind` is legal. This is the top level of the
    /// hierarchical mask.
    #[must_use]
    pub fn kind_legal(&self, kind: ActionKind) -> bool {
        self.kinds[kind.index()]
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.kinds.iter().any(|k| *k)
    }

    pub fn legal_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| i)
    }

    pub fn legal_actions(&self) -> impl Iterator<Item = Action> + '_ {
        let space = self.space();
        self.legal_indices().filter_map(move |i| space.decode(i))
    }
}

/// Compute the mask for `player` from the current state.
///
/// Candidates are generated per kind from what the player actually holds,
/// then each candidate is confirmed with [`check_action`].
#[must_use]
pub fn get_action_mask(state: &GameState, player: PlayerId) -> ActionMask {
    let space = ActionSpace::new(state.config.shop_size);
    let mut mask = ActionMask::empty(space);
    if !state.is_expected(player) {
        return mask;
    }

    let mut candidates = vec![Action::Pass, Action::BuyXp, Action::RefreshShop, Action::LockShop];
    candidates.extend((0..space.shop_size()).map(|slot| Action::BuyChampion { slot }));

    let board = &state.player(player).board;
    for (from, _) in board.occupied() {
        candidates.push(Action::SellChampion { from });
        for to in Position::all().filter(|to| *to != from) {
            candidates.push(Action::MoveChampion { from, to });
        }
    }

    for action in candidates {
        if check_action(state, player, action).is_ok() {
            if let Some(index) = space.encode(action) {
                mask.set(index, action);
            }
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::actions::apply_action;
    use crate::core::GameConfig;
    use crate::data::GameData;
    use crate::scheduler::Phase;

    fn planning_state(gold: u32) -> GameState {
        let config = GameConfig::default().with_starting_gold(gold);
        let mut state = GameState::new(Arc::new(config), Arc::new(GameData::standard_roster()), 9);
        state.phase.transition(Phase::Planning).unwrap();
        state
    }

    #[test]
    fn test_broke_empty_player() {
        let state = planning_state(0);
        let mask = get_action_mask(&state, PlayerId::new(0));

        assert!(mask.contains(Action::Pass));
        assert!(mask.contains(Action::LockShop));
        assert!(!mask.kind_legal(ActionKind::BuyXp));
        assert!(!mask.kind_legal(ActionKind::RefreshShop));
        assert!(!mask.kind_legal(ActionKind::BuyChampion));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_mask_follows_holdings() {
        let mut state = planning_state(10);
        let p = PlayerId::new(0);
        apply_action(&mut state, p, Action::RefreshShop).unwrap();
        apply_action(&mut state, p, Action::BuyChampion { slot: 0 }).unwrap();

        let mask = get_action_mask(&state, p);
        let slot = Position::bench(0).unwrap();
        assert!(mask.contains(Action::SellChampion { from: slot }));
        assert!(!mask.contains(Action::BuyChampion { slot: 0 }));

        // Level 1 fields one unit: every cell and every other bench slot.
        let moves = mask.legal_actions().filter(|a| a.kind() == ActionKind::MoveChampion).count();
        assert_eq!(moves, 36);
    }

    #[test]
    fn test_mask_is_exact() {
        let mut state = planning_state(30);
        let p = PlayerId::new(3);
        apply_action(&mut state, p, Action::RefreshShop).unwrap();
        apply_action(&mut state, p, Action::BuyChampion { slot: 2 }).unwrap();

        let mask = get_action_mask(&state, p);
        let space = ActionSpace::new(state.config.shop_size);
        for index in 0..space.size() {
            let action = space.decode(index).unwrap();
            let mut probe = state.clone();
            let outcome = apply_action(&mut probe, p, action);
            assert_eq!(mask.is_legal(index), outcome.is_ok(), "{action:?}");
        }
    }

    #[test]
    fn test_not_expected_gets_empty_mask() {
        let mut state = planning_state(10);
        let p = PlayerId::new(0);
        apply_action(&mut state, p, Action::Pass).unwrap();
        assert!(get_action_mask(&state, p).is_empty());
    }
}
