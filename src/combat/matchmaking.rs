//! Pairing alive players for a round.
//!
//! Players are shuffled, then paired so that nobody meets an opponent
//! from their recent window. When no such pairing exists the shuffled
//! order is paired off as it stands. With an odd count the last shuffled
//! player fights a ghost of another alive player's board; only the real
//! player takes the result.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, PlayerId};
use crate::game::GameState;

/// One pairing for the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub home: PlayerId,
    pub away: PlayerId,

    /// The away side is a copy of `away`'s board; `away` is unaffected.
    pub ghost: bool,
}

fn is_recent(state: &GameState, player: PlayerId, other: PlayerId) -> bool {
    state.player(player).recent_opponents.contains(&other)
}

/// Pair up `pending` in order, backtracking over recent-opponent clashes.
fn pair_fresh(state: &GameState, pending: &[PlayerId]) -> Option<Vec<(PlayerId, PlayerId)>> {
    let Some((&home, rest)) = pending.split_first() else {
        return Some(Vec::new());
    };
    for (i, &away) in rest.iter().enumerate() {
        if is_recent(state, home, away) || is_recent(state, away, home) {
            continue;
        }
        let mut remaining = rest.to_vec();
        remaining.remove(i);
        if let Some(mut pairs) = pair_fresh(state, &remaining) {
            pairs.insert(0, (home, away));
            return Some(pairs);
        }
    }
    None
}

/// Pair every alive player exactly once as a home side.
///
/// Returns no matchups when fewer than two players are alive.
#[must_use]
pub fn generate_matchups(state: &GameState, rng: &mut GameRng) -> Vec<Matchup> {
    let mut pending = state.alive_players();
    if pending.len() < 2 {
        return Vec::new();
    }
    rng.shuffle(&mut pending);
    let odd = if pending.len() % 2 == 1 { pending.pop() } else { None };

    let pairs = pair_fresh(state, &pending)
        .unwrap_or_else(|| pending.chunks_exact(2).map(|c| (c[0], c[1])).collect());
    let mut matchups: Vec<Matchup> = pairs
        .into_iter()
        .map(|(home, away)| Matchup {
            home,
            away,
            ghost: false,
        })
        .collect();

    if let Some(odd) = odd {
        let others: Vec<PlayerId> = state
            .alive_players()
            .into_iter()
            .filter(|p| *p != odd)
            .collect();
        if let Some(away) = rng.choose(&others).copied() {
            matchups.push(Matchup {
                home: odd,
                away,
                ghost: true,
            });
        }
    }
    matchups
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::GameConfig;
    use crate::data::GameData;

    fn state(players: usize) -> GameState {
        GameState::new(
            Arc::new(GameConfig::default().with_player_count(players)),
            Arc::new(GameData::standard_roster()),
            2,
        )
    }

    #[test]
    fn test_every_player_fights_once() {
        let state = state(8);
        let mut rng = GameRng::new(4);
        let matchups = generate_matchups(&state, &mut rng);

        assert_eq!(matchups.len(), 4);
        let mut seen: Vec<_> = matchups.iter().flat_map(|m| [m.home, m.away]).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 8);
        assert!(matchups.iter().all(|m| !m.ghost));
    }

    #[test]
    fn test_odd_player_gets_ghost() {
        let mut state = state(4);
        state.player_mut(PlayerId::new(3)).alive = false;
        let matchups = generate_matchups(&state, &mut GameRng::new(1));

        assert_eq!(matchups.len(), 2);
        let ghost = matchups.iter().find(|m| m.ghost).unwrap();
        assert_ne!(ghost.home, ghost.away);
        assert!(ghost.away != PlayerId::new(3));
    }

    #[test]
    fn test_recent_opponents_avoided() {
        let mut state = state(4);
        let (a, b) = (PlayerId::new(0), PlayerId::new(1));
        state.player_mut(a).remember_opponent(b, 3);
        state.player_mut(b).remember_opponent(a, 3);

        for seed in 0..30 {
            let matchups = generate_matchups(&state, &mut GameRng::new(seed));
            assert!(matchups
                .iter()
                .all(|m| !(m.home == a && m.away == b) && !(m.home == b && m.away == a)));
        }
    }

    #[test]
    fn test_same_seed_same_pairs() {
        let state = state(8);
        assert_eq!(
            generate_matchups(&state, &mut GameRng::new(77)),
            generate_matchups(&state, &mut GameRng::new(77))
        );
    }

    #[test]
    fn test_last_player_standing_has_no_matchup() {
        let mut state = state(2);
        state.player_mut(PlayerId::new(0)).alive = false;
        assert!(generate_matchups(&state, &mut GameRng::new(0)).is_empty());
    }
}
