//! The single entry point that validates and applies an action.
//!
//! `check_action` is the legality authority: the mask is built from it and
//! `apply_action` refuses anything it rejects. Both match exhaustively on
//! [`Action`], so a new kind cannot be added without deciding its rules.

use tracing::debug;

use crate::core::{Action, ActionError, PlayerId};
use crate::game::GameState;
use crate::scheduler::Phase;

/// Why `player` may not act right now, if anything.
fn check_turn(state: &GameState, player: PlayerId) -> Result<Phase, ActionError> {
    if !state.players.contains(player) {
        return Err(ActionError::NotExpected(player));
    }
    let phase = state.current_phase();
    if phase != Phase::Planning && !phase.is_interstitial() {
        return Err(ActionError::WrongPhase(phase));
    }
    let seat = state.player(player);
    if !seat.alive || seat.passed {
        return Err(ActionError::NotExpected(player));
    }
    Ok(phase)
}

/// Component-level reason `action` would be rejected, or `Ok` if it would succeed.
pub fn check_action(state: &GameState, player: PlayerId, action: Action) -> Result<(), ActionError> {
    let phase = check_turn(state, player)?;
    if phase.is_interstitial() && action != Action::Pass {
        return Err(ActionError::WrongPhase(phase));
    }

    match action {
        Action::Pass | Action::LockShop => Ok(()),
        Action::BuyXp => state.check_buy_xp(player),
        Action::RefreshShop => state.check_refresh_shop(player),
        Action::BuyChampion { slot } => state.check_buy_champion(player, slot).map(|_| ()),
        Action::SellChampion { from } => state.check_sell_champion(player, from).map(|_| ()),
        Action::MoveChampion { from, to } => state.check_move_champion(player, from, to),
    }
}

/// Apply an action for one player.
///
/// Rejected actions come back as [`ActionError::IllegalAction`] carrying the
/// component-level reason, and leave `state` untouched.
pub fn apply_action(state: &mut GameState, player: PlayerId, action: Action) -> Result<(), ActionError> {
    check_action(state, player, action).map_err(|reason| ActionError::illegal(action, reason))?;

    let applied = match action {
        Action::Pass => {
            state.player_mut(player).passed = true;
            Ok(())
        }
        Action::BuyXp => state.buy_xp(player).map(|_| ()),
        Action::RefreshShop => state.refresh_shop(player).map(|_| ()),
        Action::BuyChampion { slot } => state.buy_champion(player, slot).map(|_| ()),
        Action::SellChampion { from } => state.sell_champion(player, from).map(|_| ()),
        Action::MoveChampion { from, to } => state.move_champion(player, from, to),
        Action::LockShop => {
            state.toggle_shop_lock(player);
            Ok(())
        }
    };
    applied.map_err(|reason| ActionError::illegal(action, reason))?;

    debug!(%player, ?action, round = state.round, "applied action");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::board::Position;
    use crate::core::GameConfig;
    use crate::data::GameData;

    fn planning_state(gold: u32) -> GameState {
        let config = GameConfig::default().with_starting_gold(gold);
        let mut state = GameState::new(Arc::new(config), Arc::new(GameData::standard_roster()), 5);
        state.phase.transition(Phase::Planning).unwrap();
        state
    }

    #[test]
    fn test_rejected_outside_planning() {
        let mut state = GameState::new(
            Arc::new(GameConfig::default()),
            Arc::new(GameData::standard_roster()),
            5,
        );
        let err = apply_action(&mut state, PlayerId::new(0), Action::Pass).unwrap_err();
        assert_eq!(err.reason(), &ActionError::WrongPhase(Phase::Init));
    }

    #[test]
    fn test_unknown_and_passed_players() {
        let mut state = planning_state(0);
        let ghost = PlayerId::new(20);
        assert_eq!(
            check_action(&state, ghost, Action::Pass),
            Err(ActionError::NotExpected(ghost))
        );

        let p = PlayerId::new(1);
        apply_action(&mut state, p, Action::Pass).unwrap();
        assert!(state.player(p).passed);
        assert_eq!(check_action(&state, p, Action::LockShop), Err(ActionError::NotExpected(p)));
    }

    #[test]
    fn test_illegal_action_carries_reason() {
        let mut state = planning_state(0);
        let p = PlayerId::new(0);
        let from = Position::bench(0).unwrap();
        let before = state.player(p).clone();

        let err = apply_action(&mut state, p, Action::SellChampion { from }).unwrap_err();
        assert!(matches!(err, ActionError::IllegalAction { .. }));
        assert_eq!(err.reason(), &ActionError::PositionEmpty(from));
        assert_eq!(state.player(p), &before);
    }

    #[test]
    fn test_lock_toggles() {
        let mut state = planning_state(0);
        let p = PlayerId::new(2);
        apply_action(&mut state, p, Action::LockShop).unwrap();
        assert!(state.player(p).shop.is_locked());
        apply_action(&mut state, p, Action::LockShop).unwrap();
        assert!(!state.player(p).shop.is_locked());
    }

    #[test]
    fn test_interstitial_allows_only_pass() {
        let mut state = GameState::new(
            Arc::new(GameConfig::default().with_starting_gold(10)),
            Arc::new(GameData::standard_roster()),
            5,
        );
        state.phase.transition(Phase::AugmentSelect).unwrap();
        let p = PlayerId::new(0);

        assert_eq!(
            check_action(&state, p, Action::BuyXp),
            Err(ActionError::WrongPhase(Phase::AugmentSelect))
        );
        assert_eq!(check_action(&state, p, Action::Pass), Ok(()));
    }
}
