//! Complete state of one game instance.
//!
//! ## PlayerState
//!
//! Everything one seat owns: health, economy, board and bench, shop,
//! elimination status and recent opponents.
//!
//! ## GameState
//!
//! All player states plus the shared pool, the unit arena, the current
//! round and phase, and the seeded random streams. Game data and config
//! are shared read-only through `Arc`, so cloning a state for a fork copies
//! only the mutable parts.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{GameConfig, GameRng, PlayerId, PlayerMap};
use crate::data::{AugmentId, DefinitionId, GameData};
use crate::economy::{PlayerEconomy, Shop, ShopPool};
use crate::scheduler::{Phase, PhaseMachine};
use crate::units::UnitArena;

/// One seat's state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub health: u32,
    pub economy: PlayerEconomy,
    pub board: Board,
    pub shop: Shop,
    pub alive: bool,

    /// Final placement, set on elimination or at game over.
    pub placement: Option<u8>,

    /// Most recent opponents, newest last.
    pub recent_opponents: VecDeque<PlayerId>,

    pub augments: Vec<AugmentId>,

    /// Passed during the current planning phase.
    pub passed: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new(id: PlayerId, config: &GameConfig) -> Self {
        Self {
            id,
            health: config.starting_health,
            economy: PlayerEconomy::new(config),
            board: Board::new(),
            shop: Shop::new(config.shop_size),
            alive: true,
            placement: None,
            recent_opponents: VecDeque::with_capacity(config.recent_opponent_window),
            augments: Vec::new(),
            passed: false,
        }
    }

    /// Remember an opponent, keeping only the configured window.
    pub fn remember_opponent(&mut self, opponent: PlayerId, window: usize) {
        self.recent_opponents.push_back(opponent);
        while self.recent_opponents.len() > window {
            self.recent_opponents.pop_front();
        }
    }
}

/// Independent random streams, one per subsystem.
#[derive(Clone, Debug)]
pub struct RngStreams {
    pub shop: GameRng,
    pub matchmaking: GameRng,
    pub combat: GameRng,
    pub carousel: GameRng,
    pub augments: GameRng,
}

impl RngStreams {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let root = GameRng::new(seed);
        Self {
            shop: root.stream("shop"),
            matchmaking: root.stream("matchmaking"),
            combat: root.stream("combat"),
            carousel: root.stream("carousel"),
            augments: root.stream("augments"),
        }
    }

    /// Fork every stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self {
            shop: self.shop.fork(),
            matchmaking: self.matchmaking.fork(),
            combat: self.combat.fork(),
            carousel: self.carousel.fork(),
            augments: self.augments.fork(),
        }
    }
}

/// A copy-conservation mismatch found by [`GameState::audit_pool`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolDiscrepancy {
    pub definition: DefinitionId,
    pub minted: u32,
    pub in_pool: u32,
    pub owned: u32,
    pub offered: u32,
}

/// Complete game state.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: Arc<GameConfig>,
    pub data: Arc<GameData>,
    pub seed: u64,
    pub round: u32,
    pub phase: PhaseMachine,
    pub players: PlayerMap<PlayerState>,
    pub units: UnitArena,
    pub pool: ShopPool,
    pub rng: RngStreams,
}

impl GameState {
    /// Fresh state before the first round: full pool, empty boards, empty shops.
    #[must_use]
    pub fn new(config: Arc<GameConfig>, data: Arc<GameData>, seed: u64) -> Self {
        let players = PlayerMap::new(config.player_count, |p| PlayerState::new(p, &config));
        let pool = ShopPool::new(&data, &config);
        Self {
            config,
            data,
            seed,
            round: 0,
            phase: PhaseMachine::new(),
            players,
            units: UnitArena::new(),
            pool,
            rng: RngStreams::new(seed),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.phase.phase()
    }

    /// Alive players in seat order.
    #[must_use]
    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|(_, p)| p.alive)
            .map(|(id, _)| id)
            .collect()
    }

    /// Board unit cap for a player at their current level.
    #[must_use]
    pub fn board_cap(&self, player: PlayerId) -> usize {
        self.config.board_cap(self.players[player].economy.level)
    }

    /// Whether `player` may submit an action right now.
    #[must_use]
    pub fn is_expected(&self, player: PlayerId) -> bool {
        if !self.players.contains(player) {
            return false;
        }
        let state = &self.players[player];
        let phase = self.current_phase();
        state.alive && !state.passed && (phase == Phase::Planning || phase.is_interstitial())
    }

    /// Check copy conservation for every definition.
    ///
    /// For each definition: pool + owned (star-weighted) + shop offers must
    /// equal the minted total. Returns every mismatch.
    pub fn audit_pool(&self) -> Result<(), Vec<PoolDiscrepancy>> {
        let mut owned: rustc_hash::FxHashMap<DefinitionId, u32> = Default::default();
        for unit in self.units.iter() {
            *owned.entry(unit.definition).or_insert(0) += unit.copies();
        }
        let mut offered: rustc_hash::FxHashMap<DefinitionId, u32> = Default::default();
        for state in self.players.values() {
            for id in state.shop.offers().iter().flatten() {
                *offered.entry(*id).or_insert(0) += 1;
            }
        }

        let discrepancies: Vec<_> = self
            .pool
            .definitions()
            .filter_map(|definition| {
                let minted = self.pool.minted(definition);
                let in_pool = self.pool.remaining(definition);
                let owned = owned.get(&definition).copied().unwrap_or(0);
                let offered = offered.get(&definition).copied().unwrap_or(0);
                (in_pool + owned + offered != minted).then_some(PoolDiscrepancy {
                    definition,
                    minted,
                    in_pool,
                    owned,
                    offered,
                })
            })
            .collect();

        if discrepancies.is_empty() {
            Ok(())
        } else {
            Err(discrepancies)
        }
    }

    /// Check board bookkeeping: every occupied position points at a unit
    /// owned by that player and placed there, every unit sits on exactly
    /// one position, and no board exceeds its level cap.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = 0usize;
        for (id, state) in self.players.iter() {
            let cap = self.board_cap(id);
            if state.board.board_count() > cap {
                return Err(format!("{id} fields {} units over cap {cap}", state.board.board_count()));
            }
            for (position, unit_id) in state.board.occupied() {
                let unit = self
                    .units
                    .get(unit_id)
                    .ok_or_else(|| format!("{id} references missing unit {unit_id} at {position}"))?;
                if unit.owner != id {
                    return Err(format!("unit {unit_id} at {position} of {id} is owned by {}", unit.owner));
                }
                if unit.position != position {
                    return Err(format!("unit {unit_id} thinks it is at {}, board says {position}", unit.position));
                }
                if !(1..=crate::units::MAX_STAR).contains(&unit.star) {
                    return Err(format!("unit {unit_id} has star level {}", unit.star));
                }
                seen += 1;
            }
            if !state.alive && state.board.occupied().next().is_some() {
                return Err(format!("eliminated {id} still holds units"));
            }
        }
        if seen != self.units.len() {
            return Err(format!("{} units in the arena, {seen} on boards", self.units.len()));
        }
        Ok(())
    }
}
