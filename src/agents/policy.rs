//! Scripted decision sources.
//!
//! A learned policy lives outside this crate; these sources exist for
//! rollouts, tests and benchmarks. All of them pick only from the mask.

use crate::actions::ActionMask;
use crate::core::{Action, ActionKind, GameRng};
use crate::game::PlayerSnapshot;

/// Produces one action per decision point.
pub trait DecisionSource: Send + Sync {
    /// Choose an action. Must return an action contained in `mask` when
    /// the mask is non-empty.
    fn decide(&self, snapshot: &PlayerSnapshot, mask: &ActionMask, rng: &mut GameRng) -> Action;
}

/// Always passes.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassAgent;

impl DecisionSource for PassAgent {
    fn decide(&self, _snapshot: &PlayerSnapshot, _mask: &ActionMask, _rng: &mut GameRng) -> Action {
        Action::Pass
    }
}

/// Uniform over legal actions, passing with a fixed probability first.
#[derive(Clone, Copy, Debug)]
pub struct RandomAgent {
    pub pass_probability: f64,
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self {
            pass_probability: 0.2,
        }
    }
}

impl RandomAgent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pass_probability(mut self, probability: f64) -> Self {
        self.pass_probability = probability.clamp(0.0, 1.0);
        self
    }
}

impl DecisionSource for RandomAgent {
    fn decide(&self, _snapshot: &PlayerSnapshot, mask: &ActionMask, rng: &mut GameRng) -> Action {
        if rng.gen_bool(self.pass_probability) {
            return Action::Pass;
        }
        let legal: Vec<Action> = mask.legal_actions().filter(|a| *a != Action::Pass).collect();
        rng.choose(&legal).copied().unwrap_or(Action::Pass)
    }
}

/// Buys what it can afford, fields bench units while there is room, then
/// passes. Strong enough to make games end by elimination.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyAgent;

impl DecisionSource for GreedyAgent {
    fn decide(&self, snapshot: &PlayerSnapshot, mask: &ActionMask, rng: &mut GameRng) -> Action {
        if snapshot.board.len() < snapshot.board_cap {
            let fielding = mask.legal_actions().find(|a| match a {
                Action::MoveChampion { from, to } => from.is_bench() && to.is_board(),
                _ => false,
            });
            if let Some(action) = fielding {
                return action;
            }
        }

        let buys: Vec<Action> = mask
            .legal_actions()
            .filter(|a| a.kind() == ActionKind::BuyChampion)
            .collect();
        if let Some(action) = rng.choose(&buys) {
            return *action;
        }

        if snapshot.gold >= 20 && mask.kind_legal(ActionKind::BuyXp) {
            return Action::BuyXp;
        }
        Action::Pass
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::actions::get_action_mask;
    use crate::core::{GameConfig, PlayerId};
    use crate::data::GameData;
    use crate::game::{GameState, PlayerSnapshot};
    use crate::scheduler::Phase;

    fn planning_state(gold: u32) -> GameState {
        let config = GameConfig::default().with_starting_gold(gold);
        let mut state = GameState::new(Arc::new(config), Arc::new(GameData::standard_roster()), 4);
        state.phase.transition(Phase::Planning).unwrap();
        state
    }

    #[test]
    fn test_random_agent_stays_in_mask() {
        let mut state = planning_state(12);
        let p = PlayerId::new(0);
        state.refresh_shop(p).unwrap();

        let agent = RandomAgent::new().with_pass_probability(0.0);
        let mut rng = GameRng::new(3);
        let mask = get_action_mask(&state, p);
        let snapshot = PlayerSnapshot::capture(&state, p);
        for _ in 0..50 {
            let action = agent.decide(&snapshot, &mask, &mut rng);
            assert!(mask.contains(action));
            assert_ne!(action, Action::Pass);
        }
    }

    #[test]
    fn test_greedy_agent_buys_then_fields() {
        let mut state = planning_state(12);
        let p = PlayerId::new(1);
        state.refresh_shop(p).unwrap();
        let mut rng = GameRng::new(3);

        let mask = get_action_mask(&state, p);
        let snapshot = PlayerSnapshot::capture(&state, p);
        let buy = GreedyAgent.decide(&snapshot, &mask, &mut rng);
        assert_eq!(buy.kind(), ActionKind::BuyChampion);

        crate::actions::apply_action(&mut state, p, buy).unwrap();
        let mask = get_action_mask(&state, p);
        let snapshot = PlayerSnapshot::capture(&state, p);
        let field = GreedyAgent.decide(&snapshot, &mask, &mut rng);
        assert_eq!(field.kind(), ActionKind::MoveChampion);
    }
}
