//! The game instance: reset/step driven by the event scheduler.
//!
//! ## Flow
//!
//! `reset` schedules the first `RoundStart` and runs events until the game
//! rests in `Planning`. Each `step` applies the submitted actions in seat
//! order, closes planning when every alive player has passed or the step
//! limit is hit, and runs events again until the next rest point
//! (`Planning` or `GameOver`).
//!
//! ## Faults
//!
//! A scheduler or phase-machine violation is an engine bug. It is latched:
//! the failing `step` returns it and every later `step` returns
//! `EngineError::Aborted`.

use std::collections::BTreeMap;
use std::sync::Arc;

use im::Vector;
use tracing::{debug, error, info, warn};

use super::snapshot::{PlayerSnapshot, RoundEndEvent};
use super::state::GameState;
use crate::actions::{apply_action, get_action_mask, ActionMask, ActionSpace};
use crate::combat::{generate_matchups, resolve, BoardSnapshot, Side};
use crate::core::{
    Action, ActionError, ActionRecord, ConfigError, EngineError, GameConfig, PlayerId, PlayerMap,
    SchedulerError,
};
use crate::data::{AugmentEffect, BreakpointTraits, GameData, TraitBonusProvider};
use crate::economy::CombatOutcome;
use crate::scheduler::{EndReason, Event, EventKind, EventPayload, EventScheduler, Phase};

/// Result of one [`Game::step`].
#[derive(Clone, Debug)]
pub struct StepOutcome {
    /// Round the game rests in after the step.
    pub round: u32,
    pub phase: Phase,

    /// Actions that were refused, with the reason. State was not touched by them.
    pub rejected: BTreeMap<PlayerId, ActionError>,

    /// Round-end events of every round completed during this step.
    pub round_events: Vec<RoundEndEvent>,

    pub snapshots: PlayerMap<PlayerSnapshot>,

    /// Per player: eliminated, or the game is over.
    pub terminal: PlayerMap<bool>,
    pub done: bool,
}

/// One self-contained game.
///
/// Instances share nothing mutable; run as many side by side as needed.
#[derive(Clone, Debug)]
pub struct Game {
    state: GameState,
    scheduler: EventScheduler,
    traits: Arc<dyn TraitBonusProvider>,
    fault: Option<EngineError>,
    started: bool,
    end_reason: Option<EndReason>,

    /// Decision steps taken in the current planning phase.
    decision_steps: u32,
    /// A `PlanningEnded` or `PlanningTimer` is queued.
    planning_closing: bool,
    action_sequence: u32,

    /// Health at combat start and damage taken, per player, this round.
    health_at_combat: PlayerMap<u32>,
    damage_taken: PlayerMap<u32>,

    round_events: Vec<RoundEndEvent>,
    history: Vector<ActionRecord>,
}

impl Game {
    /// Create an instance. Call [`Game::reset`] before stepping.
    pub fn new(config: GameConfig, data: Arc<GameData>) -> Result<Self, ConfigError> {
        config.validate()?;
        for cost in 1..=config.cost_tiers() as u8 {
            if data.units_of_cost(cost).is_empty() {
                return Err(ConfigError::Invalid(format!("no units of cost {cost}")));
            }
        }

        let players = config.player_count;
        Ok(Self {
            state: GameState::new(Arc::new(config), data, 0),
            scheduler: EventScheduler::new(),
            traits: Arc::new(BreakpointTraits),
            fault: None,
            started: false,
            end_reason: None,
            decision_steps: 0,
            planning_closing: false,
            action_sequence: 0,
            health_at_combat: PlayerMap::with_value(players, 0),
            damage_taken: PlayerMap::with_value(players, 0),
            round_events: Vec::new(),
            history: Vector::new(),
        })
    }

    /// Use a different trait bonus computation.
    #[must_use]
    pub fn with_trait_provider(mut self, traits: Arc<dyn TraitBonusProvider>) -> Self {
        self.traits = traits;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.state.config
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.state.round
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.current_phase()
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase().is_terminal()
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// The latched fatal error, if any.
    #[must_use]
    pub fn fault(&self) -> Option<&EngineError> {
        self.fault.as_ref()
    }

    /// Every applied action since reset.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn action_space(&self) -> ActionSpace {
        ActionSpace::new(self.state.config.shop_size)
    }

    /// Fresh mask for `player`.
    #[must_use]
    pub fn action_mask(&self, player: PlayerId) -> ActionMask {
        get_action_mask(&self.state, player)
    }

    #[must_use]
    pub fn snapshot(&self, player: PlayerId) -> PlayerSnapshot {
        PlayerSnapshot::capture(&self.state, player)
    }

    #[must_use]
    pub fn snapshots(&self) -> PlayerMap<PlayerSnapshot> {
        self.state
            .players
            .map(|player, _| PlayerSnapshot::capture(&self.state, player))
    }

    #[must_use]
    pub fn placements(&self) -> PlayerMap<Option<u8>> {
        self.state.players.map(|_, p| p.placement)
    }

    /// Players whose action is awaited.
    #[must_use]
    pub fn expected_players(&self) -> Vec<PlayerId> {
        self.state
            .players
            .player_ids()
            .filter(|p| self.state.is_expected(*p))
            .collect()
    }

    /// Independent copy with forked random streams.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        let mut forked = self.clone();
        forked.state.rng = self.state.rng.fork();
        forked
    }

    // === Reset / step ===

    /// Start a new game from `seed` and run to the first planning phase.
    pub fn reset(&mut self, seed: u64) -> Result<PlayerMap<PlayerSnapshot>, EngineError> {
        let players = self.state.config.player_count;
        self.state = GameState::new(
            Arc::clone(&self.state.config),
            Arc::clone(&self.state.data),
            seed,
        );
        self.scheduler = EventScheduler::new();
        self.fault = None;
        self.started = true;
        self.end_reason = None;
        self.decision_steps = 0;
        self.planning_closing = false;
        self.action_sequence = 0;
        self.health_at_combat = PlayerMap::with_value(players, 0);
        self.damage_taken = PlayerMap::with_value(players, 0);
        self.round_events.clear();
        self.history = Vector::new();
        info!(seed, players, "game reset");

        self.schedule(EventKind::RoundStart, EventPayload::None, 1)
            .and_then(|_| self.run_events())
            .map_err(|e| self.latch(e))?;
        self.round_events.clear();
        Ok(self.snapshots())
    }

    /// Apply one decision step.
    ///
    /// `actions` is keyed by player, so actions always apply in seat order.
    pub fn step(&mut self, actions: &BTreeMap<PlayerId, Action>) -> Result<StepOutcome, EngineError> {
        if let Some(fault) = &self.fault {
            return Err(EngineError::Aborted(Box::new(fault.clone())));
        }
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        if self.is_done() {
            return Err(EngineError::GameFinished);
        }

        let mut rejected = BTreeMap::new();
        for (&player, &action) in actions {
            match apply_action(&mut self.state, player, action) {
                Ok(()) => {
                    self.history.push_back(ActionRecord::new(
                        player,
                        action,
                        self.state.round,
                        self.action_sequence,
                    ));
                    self.action_sequence += 1;
                }
                Err(err) => {
                    debug!(%player, ?action, %err, "rejected action");
                    rejected.insert(player, err);
                }
            }
        }

        self.decision_steps += 1;
        self.close_planning_if_due().map_err(|e| self.latch(e))?;
        self.run_events().map_err(|e| self.latch(e))?;

        let done = self.is_done();
        Ok(StepOutcome {
            round: self.state.round,
            phase: self.phase(),
            rejected,
            round_events: std::mem::take(&mut self.round_events),
            snapshots: self.snapshots(),
            terminal: self.state.players.map(|_, p| done || !p.alive),
            done,
        })
    }

    fn latch(&mut self, err: EngineError) -> EngineError {
        error!(%err, round = self.state.round, phase = ?self.phase(), "fatal engine error");
        self.fault = Some(err.clone());
        err
    }

    fn schedule(&mut self, kind: EventKind, payload: EventPayload, round: u32) -> Result<(), EngineError> {
        self.scheduler
            .schedule(Event::new(kind).with_payload(payload), round)?;
        Ok(())
    }

    fn close_planning_if_due(&mut self) -> Result<(), EngineError> {
        if self.phase() != Phase::Planning || self.planning_closing {
            return Ok(());
        }
        let round = self.state.round;
        let all_passed = self.state.players.values().all(|p| !p.alive || p.passed);
        if all_passed {
            self.planning_closing = true;
            self.schedule(EventKind::PlanningEnded, EventPayload::None, round)?;
        } else if self.decision_steps >= self.state.config.planning_step_limit {
            self.planning_closing = true;
            let steps = EventPayload::Steps(self.decision_steps);
            self.schedule(EventKind::PlanningTimer, steps, round)?;
        }
        Ok(())
    }

    /// Dispatch events until the game rests in `Planning` or `GameOver`.
    fn run_events(&mut self) -> Result<(), EngineError> {
        loop {
            if let Some(event) = self.scheduler.pop_next(self.state.round) {
                self.dispatch(event)?;
                continue;
            }
            let phase = self.phase();
            if phase == Phase::Planning || phase.is_terminal() {
                return Ok(());
            }
            match self.scheduler.peek_round() {
                Some(next) => self.state.round = self.state.round.max(next),
                None => {
                    return Err(SchedulerError::QueueDrained {
                        round: self.state.round,
                    }
                    .into())
                }
            }
        }
    }

    fn dispatch(&mut self, event: Event) -> Result<(), EngineError> {
        debug!(kind = ?event.kind, round = event.target_round, sequence = event.sequence, "event");
        match event.kind {
            EventKind::RoundStart => self.on_round_start(event.target_round),
            EventKind::AugmentSelection => self.on_augment_selection(),
            EventKind::PlanningTimer => {
                self.schedule(EventKind::PlanningEnded, EventPayload::None, self.state.round)
            }
            EventKind::PlanningEnded => {
                self.planning_closing = false;
                self.state.phase.transition(Phase::CombatPending)?;
                self.schedule(EventKind::CombatStart, EventPayload::None, self.state.round)
            }
            EventKind::CombatStart => self.on_combat_start(),
            EventKind::RoundEnd => self.on_round_end(),
            EventKind::CarouselSelection => self.on_carousel(),
            EventKind::GameEnd => {
                let reason = match event.payload {
                    EventPayload::End(reason) => reason,
                    _ => EndReason::RoundLimit,
                };
                self.on_game_end(reason)
            }
        }
    }

    // === Event handlers ===

    fn on_round_start(&mut self, round: u32) -> Result<(), EngineError> {
        self.state.round = round;
        self.decision_steps = 0;
        self.planning_closing = false;
        self.action_sequence = 0;

        let GameState {
            config,
            players,
            pool,
            rng,
            ..
        } = &mut self.state;
        for (id, player) in players.iter_mut() {
            if !player.alive {
                continue;
            }
            player.passed = false;
            let report = player.economy.round_income(config, round > 1);
            debug!(player = %id, gold = player.economy.gold, income = report.total_gold(), xp = report.xp, "round income");

            if player.shop.is_locked() {
                player.shop.set_locked(false);
            } else {
                player
                    .shop
                    .refresh(pool, player.economy.level, config, &mut rng.shop);
            }
        }

        if self.state.config.is_augment_round(round) {
            self.state.phase.transition(Phase::AugmentSelect)?;
            self.schedule(EventKind::AugmentSelection, EventPayload::None, round)
        } else {
            self.state.phase.transition(Phase::Planning)?;
            Ok(())
        }
    }

    fn on_augment_selection(&mut self) -> Result<(), EngineError> {
        let GameState {
            data, players, rng, ..
        } = &mut self.state;
        let augments = data.augments();

        for (id, player) in players.iter_mut() {
            if !player.alive || augments.is_empty() {
                continue;
            }
            let offered = rng.augments.sample_distinct(augments.len(), 3);
            let Some(&pick) = rng.augments.choose(&offered) else {
                continue;
            };
            let augment = &augments[pick];
            match augment.effect {
                AugmentEffect::Gold(gold) => player.economy.gold += gold,
                AugmentEffect::FreeRerolls(n) => player.economy.free_rerolls += n,
                AugmentEffect::Experience(xp) => player.economy.pending_xp += xp,
            }
            player.augments.push(augment.id);
            debug!(player = %id, augment = %augment.name, "augment selected");
        }

        self.state.phase.transition(Phase::Planning)?;
        Ok(())
    }

    fn on_combat_start(&mut self) -> Result<(), EngineError> {
        let round = self.state.round;
        let mut matchmaking = self.state.rng.matchmaking.clone();
        let matchups = generate_matchups(&self.state, &mut matchmaking);
        self.state.rng.matchmaking = matchmaking;

        let mut boards = PlayerMap::with_value(self.state.player_count(), BoardSnapshot::empty());
        for (id, player) in self.state.players.iter() {
            if player.alive {
                boards[id] = BoardSnapshot::capture(&self.state, id, self.traits.as_ref())?;
            }
        }
        self.health_at_combat = self.state.players.map(|_, p| p.health);
        self.damage_taken = PlayerMap::with_value(self.state.player_count(), 0);

        let base_damage = self.state.config.round_damage_for(round);
        let combat = self.state.config.combat.clone();
        let window = self.state.config.recent_opponent_window;

        for matchup in matchups {
            let seed = self.state.rng.combat.next_seed();
            let result = resolve(&boards[matchup.home], &boards[matchup.away], base_damage, seed, &combat);

            let mut sides = vec![(matchup.home, Side::Home, matchup.away)];
            if !matchup.ghost {
                sides.push((matchup.away, Side::Away, matchup.home));
            }
            for (player, side, opponent) in sides {
                let outcome = match result.winner {
                    None => CombatOutcome::Draw,
                    Some(winner) if winner == side => CombatOutcome::Win,
                    Some(_) => CombatOutcome::Loss,
                };
                let state = self.state.player_mut(player);
                state.economy.record_combat(outcome);
                state.remember_opponent(opponent, window);
                if outcome == CombatOutcome::Loss {
                    state.health = state.health.saturating_sub(result.damage);
                    self.damage_taken[player] = result.damage;
                }
            }
            debug!(
                home = %matchup.home,
                away = %matchup.away,
                ghost = matchup.ghost,
                winner = ?result.winner,
                damage = result.damage,
                "combat resolved"
            );
        }

        self.state.phase.transition(Phase::CombatResolved)?;
        self.schedule(EventKind::RoundEnd, EventPayload::None, round)
    }

    fn on_round_end(&mut self) -> Result<(), EngineError> {
        let round = self.state.round;
        let alive_before = self.state.alive_players();

        // Worst final health is eliminated last, so it takes the lowest placement.
        let mut eliminated: Vec<(i64, PlayerId)> = alive_before
            .iter()
            .filter(|p| self.state.player(**p).health == 0)
            .map(|p| {
                let remaining = i64::from(self.health_at_combat[*p]) - i64::from(self.damage_taken[*p]);
                (remaining, *p)
            })
            .collect();
        eliminated.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let first_placement = alive_before.len() - eliminated.len() + 1;
        for (offset, (_, player)) in eliminated.iter().enumerate() {
            let placement = (first_placement + offset) as u8;
            self.state.release_player(*player);
            let state = self.state.player_mut(*player);
            state.alive = false;
            state.placement = Some(placement);
            info!(%player, placement, round, "player eliminated");
        }

        for player in &alive_before {
            let state = self.state.player(*player);
            let delta = i64::from(state.health) - i64::from(self.health_at_combat[*player]);
            self.round_events.push(RoundEndEvent {
                round,
                player: *player,
                health_delta: delta as i32,
                placement_on_elimination: if state.alive { None } else { state.placement },
            });
        }

        let alive = self.state.alive_players().len();
        if alive <= 1 {
            self.schedule(EventKind::GameEnd, EventPayload::End(EndReason::LastStanding), round)
        } else if round >= self.state.config.max_rounds {
            self.schedule(EventKind::GameEnd, EventPayload::End(EndReason::RoundLimit), round)
        } else {
            if self.state.config.is_carousel_round(round) {
                self.schedule(EventKind::CarouselSelection, EventPayload::None, round)?;
            }
            self.schedule(EventKind::RoundStart, EventPayload::None, round + 1)
        }
    }

    fn on_carousel(&mut self) -> Result<(), EngineError> {
        self.state.phase.transition(Phase::CarouselSelect)?;

        let mut order = self.state.alive_players();
        order.sort_by_key(|p| (self.state.player(*p).health, *p));

        for player in order {
            let level = self.state.player(player).economy.level;
            let GameState {
                config,
                data,
                pool,
                rng,
                ..
            } = &mut self.state;
            let definition = match pool.draw(level, config.odds_for_level(level), &mut rng.carousel) {
                Ok(definition) => definition,
                Err(err) => {
                    warn!(%player, %err, "carousel draw failed");
                    continue;
                }
            };
            let item = rng.carousel.choose(data.items()).map(|i| i.id);

            let Some(slot) = self.state.player(player).board.first_free_bench() else {
                self.state.pool.release(definition, 1);
                continue;
            };
            let unit = match self.state.spawn_unit(player, definition, slot) {
                Ok(unit) => unit,
                Err(_) => {
                    self.state.pool.release(definition, 1);
                    continue;
                }
            };
            if let (Some(item), Some(instance)) = (item, self.state.units.get_mut(unit)) {
                instance.add_item(item);
            }
            debug!(%player, %definition, "carousel pick");
            self.state.combine_units(player);
        }
        Ok(())
    }

    fn on_game_end(&mut self, reason: EndReason) -> Result<(), EngineError> {
        let mut survivors = self.state.alive_players();
        survivors.sort_by(|a, b| {
            let (ha, hb) = (self.state.player(*a).health, self.state.player(*b).health);
            hb.cmp(&ha).then(a.cmp(b))
        });
        for (rank, player) in survivors.iter().enumerate() {
            self.state.player_mut(*player).placement = Some(rank as u8 + 1);
        }

        self.state.phase.transition(Phase::GameOver)?;
        self.end_reason = Some(reason);
        info!(round = self.state.round, ?reason, "game over");
        Ok(())
    }
}
