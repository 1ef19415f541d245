//! Read-only per-player views and round-end events.
//!
//! A `PlayerSnapshot` is what an observation encoder gets: the player's own
//! private state in full, and only public information about opponents.
//! Nothing here is numeric-tensor encoded.

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::board::Position;
use crate::core::{PlayerId, SnapshotError};
use crate::data::{AugmentId, DefinitionId, ItemId};
use crate::scheduler::Phase;
use crate::units::UnitId;

/// A unit as shown in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub definition: DefinitionId,
    pub star: u8,
    pub cost: u8,
    pub items: Vec<ItemId>,
    pub position: Position,
}

/// Public information about another player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentView {
    pub player: PlayerId,
    pub health: u32,
    pub level: u8,
    pub alive: bool,
    pub placement: Option<u8>,
    pub win_streak: u32,
    pub loss_streak: u32,

    /// Fielded units only; benches are private.
    pub board: Vec<UnitView>,
}

/// Everything one player may observe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player: PlayerId,
    pub round: u32,
    pub phase: Phase,

    pub health: u32,
    pub alive: bool,
    pub placement: Option<u8>,
    pub gold: u32,
    pub level: u8,
    pub xp: u32,
    pub xp_to_next: Option<u32>,
    pub win_streak: u32,
    pub loss_streak: u32,
    pub free_rerolls: u32,
    pub board_cap: usize,

    pub shop: Vec<Option<DefinitionId>>,
    pub shop_locked: bool,
    pub board: Vec<UnitView>,
    pub bench: Vec<UnitView>,
    pub augments: Vec<AugmentId>,

    pub opponents: Vec<OpponentView>,
}

fn unit_views(state: &GameState, player: PlayerId, bench: bool) -> Vec<UnitView> {
    state
        .player(player)
        .board
        .occupied()
        .filter(|(position, _)| position.is_bench() == bench)
        .filter_map(|(position, id)| {
            let unit = state.units.get(id)?;
            Some(UnitView {
                id,
                definition: unit.definition,
                star: unit.star,
                cost: unit.cost,
                items: unit.items.to_vec(),
                position,
            })
        })
        .collect()
}

impl PlayerSnapshot {
    /// Capture the view of `player`.
    #[must_use]
    pub fn capture(state: &GameState, player: PlayerId) -> Self {
        let seat = state.player(player);
        let economy = &seat.economy;

        let opponents = state
            .players
            .iter()
            .filter(|(id, _)| *id != player)
            .map(|(id, other)| OpponentView {
                player: id,
                health: other.health,
                level: other.economy.level,
                alive: other.alive,
                placement: other.placement,
                win_streak: other.economy.win_streak,
                loss_streak: other.economy.loss_streak,
                board: unit_views(state, id, false),
            })
            .collect();

        Self {
            player,
            round: state.round,
            phase: state.current_phase(),
            health: seat.health,
            alive: seat.alive,
            placement: seat.placement,
            gold: economy.gold,
            level: economy.level,
            xp: economy.xp,
            xp_to_next: economy.xp_to_next(&state.config),
            win_streak: economy.win_streak,
            loss_streak: economy.loss_streak,
            free_rerolls: economy.free_rerolls,
            board_cap: state.board_cap(player),
            shop: seat.shop.offers().to_vec(),
            shop_locked: seat.shop.is_locked(),
            board: unit_views(state, player, false),
            bench: unit_views(state, player, true),
            augments: seat.augments.clone(),
            opponents,
        }
    }

    /// Encode with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes produced by [`PlayerSnapshot::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Emitted once per alive player at the end of each round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEndEvent {
    pub round: u32,
    pub player: PlayerId,

    /// Health change this round; zero or negative.
    pub health_delta: i32,

    /// Set when the player was eliminated this round.
    pub placement_on_elimination: Option<u8>,
}
