//! Driving whole games with decision sources.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::trajectory::{StepRecord, Trajectory};
use crate::agents::DecisionSource;
use crate::core::{Action, EngineError, GameRng, PlayerId, PlayerMap};
use crate::game::{Game, StepOutcome};

/// Configuration for rollouts.
#[derive(Clone, Debug)]
pub struct RolloutConfig {
    /// Safety bound on decision steps per episode.
    pub max_steps: usize,

    /// Added to the episode index to get each episode's seed.
    pub seed_offset: u64,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            seed_offset: 0,
        }
    }
}

impl RolloutConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    #[must_use]
    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }
}

fn record(trajectory: &mut Trajectory, round: u32, actions: BTreeMap<PlayerId, Action>, outcome: &StepOutcome) {
    trajectory.push(StepRecord {
        round,
        actions,
        rejected: outcome.rejected.keys().copied().collect(),
    });
    trajectory.round_events.extend(outcome.round_events.iter().cloned());
}

fn finish(trajectory: &mut Trajectory, game: &Game) {
    trajectory.placements = game.placements();
    trajectory.end_reason = game.end_reason();
    trajectory.rounds = game.round();
}

/// Play one game from `seed`, asking `sources[seat]` for each seat's action.
///
/// Decision sources draw from their own per-seat streams derived from
/// `seed`, so the whole episode is reproducible.
pub fn run_episode(
    game: &mut Game,
    seed: u64,
    sources: &PlayerMap<Arc<dyn DecisionSource>>,
    config: &RolloutConfig,
) -> Result<Trajectory, EngineError> {
    game.reset(seed)?;
    let mut trajectory = Trajectory::new(seed, game.state().player_count());
    let root = GameRng::new(seed);
    let mut rngs: PlayerMap<GameRng> = sources.map(|p, _| root.stream(&format!("agent-{}", p.index())));

    for _ in 0..config.max_steps {
        if game.is_done() {
            break;
        }
        let round = game.round();
        let mut actions = BTreeMap::new();
        for player in game.expected_players() {
            let mask = game.action_mask(player);
            let snapshot = game.snapshot(player);
            let action = sources[player].decide(&snapshot, &mask, &mut rngs[player]);
            actions.insert(player, action);
        }

        let outcome = game.step(&actions)?;
        record(&mut trajectory, round, actions, &outcome);
    }

    if !game.is_done() {
        warn!(seed, steps = trajectory.len(), "episode hit the step bound");
    }
    finish(&mut trajectory, game);
    debug!(seed, steps = trajectory.len(), rounds = trajectory.rounds, "episode finished");
    Ok(trajectory)
}

/// Re-run the submitted actions of `recorded` on a fresh game.
///
/// The result equals `recorded` whenever the engine is deterministic.
pub fn replay(game: &mut Game, recorded: &Trajectory) -> Result<Trajectory, EngineError> {
    game.reset(recorded.seed)?;
    let mut trajectory = Trajectory::new(recorded.seed, game.state().player_count());

    for step in &recorded.steps {
        if game.is_done() {
            break;
        }
        let round = game.round();
        let outcome = game.step(&step.actions)?;
        record(&mut trajectory, round, step.actions.clone(), &outcome);
    }
    finish(&mut trajectory, game);
    Ok(trajectory)
}

/// Runs batches of episodes with one source for every seat.
pub struct RolloutWorker {
    template: Game,
    source: Arc<dyn DecisionSource>,
    config: RolloutConfig,
}

impl RolloutWorker {
    #[must_use]
    pub fn new(template: Game, source: Arc<dyn DecisionSource>, config: RolloutConfig) -> Self {
        Self {
            template,
            source,
            config,
        }
    }

    /// Play episode number `index`.
    pub fn play(&self, index: usize) -> Result<Trajectory, EngineError> {
        let mut game = self.template.clone();
        let seats = game.state().player_count();
        let sources = PlayerMap::new(seats, |_| Arc::clone(&self.source));
        let seed = self.config.seed_offset.wrapping_add(index as u64);
        run_episode(&mut game, seed, &sources, &self.config)
    }

    /// Play `count` episodes in sequence.
    pub fn play_many(&self, count: usize) -> Result<Vec<Trajectory>, EngineError> {
        (0..count).map(|i| self.play(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{GreedyAgent, PassAgent};
    use crate::core::GameConfig;
    use crate::data::GameData;
    use crate::scheduler::EndReason;

    fn game(config: GameConfig) -> Game {
        Game::new(config, Arc::new(GameData::standard_roster())).unwrap()
    }

    fn all(source: Arc<dyn DecisionSource>, seats: usize) -> PlayerMap<Arc<dyn DecisionSource>> {
        PlayerMap::new(seats, |_| Arc::clone(&source))
    }

    #[test]
    fn test_passing_game_hits_round_limit() {
        let mut game = game(GameConfig::default().with_max_rounds(5));
        let sources = all(Arc::new(PassAgent), 8);
        let trajectory = run_episode(&mut game, 1, &sources, &RolloutConfig::new()).unwrap();

        assert_eq!(trajectory.len(), 5);
        assert_eq!(trajectory.end_reason, Some(EndReason::RoundLimit));
        assert_eq!(trajectory.round_events.len(), 5 * 8);
    }

    #[test]
    fn test_step_bound() {
        let mut game = game(GameConfig::default());
        let sources = all(Arc::new(PassAgent), 8);
        let config = RolloutConfig::new().with_max_steps(3);
        let trajectory = run_episode(&mut game, 1, &sources, &config).unwrap();

        assert_eq!(trajectory.len(), 3);
        assert!(!trajectory.is_complete());
    }

    #[test]
    fn test_worker_seeds() {
        let worker = RolloutWorker::new(
            game(GameConfig::default().with_player_count(4).with_max_rounds(6)),
            Arc::new(GreedyAgent),
            RolloutConfig::new().with_seed_offset(100),
        );
        let trajectories = worker.play_many(2).unwrap();
        assert_eq!(trajectories[0].seed, 100);
        assert_eq!(trajectories[1].seed, 101);
        assert!(trajectories.iter().all(Trajectory::is_complete));
    }
}
