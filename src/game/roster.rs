//! Ownership-changing operations on a player's units.
//!
//! Every operation here validates completely before it mutates anything,
//! so a returned error always means the state is untouched. Each `check_*`
//! function is the exact precondition of the operation with the same name;
//! the action mask is built from the same checks.

use smallvec::SmallVec;
use tracing::debug;

use super::state::GameState;
use crate::board::Position;
use crate::core::{ActionError, PlayerId};
use crate::data::{DefinitionId, ItemId};
use crate::units::{UnitId, MAX_ITEMS, MAX_STAR};

/// A completed three-into-one upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Combination {
    pub kept: UnitId,
    pub consumed: [UnitId; 2],
    pub definition: DefinitionId,
    pub new_star: u8,
}

impl GameState {
    // The pool only mints ids from `data`, and `data` never changes after
    // construction, so every offered or owned definition resolves here.
    fn unit_cost(&self, definition: DefinitionId) -> u8 {
        let unit = self.data.unit(definition);
        debug_assert!(unit.is_some(), "definition {definition} missing from game data");
        unit.map_or(1, |u| u.cost)
    }

    // === Buy ===

    /// Precondition of [`GameState::buy_champion`]. Returns the offered definition.
    pub fn check_buy_champion(&self, player: PlayerId, slot: usize) -> Result<DefinitionId, ActionError> {
        let state = &self.players[player];
        if slot >= state.shop.size() {
            return Err(ActionError::InvalidSlot(slot));
        }
        let definition = state.shop.offer(slot).ok_or(ActionError::SlotEmpty(slot))?;
        if state.board.is_bench_full() {
            return Err(ActionError::BenchFull);
        }
        state
            .economy
            .check_gold(u32::from(self.unit_cost(definition)))?;
        Ok(definition)
    }

    /// Buy a shop offer onto the first free bench slot, then combine.
    ///
    /// The copy moves from the offer to the player; the pool is not touched.
    pub fn buy_champion(&mut self, player: PlayerId, slot: usize) -> Result<UnitId, ActionError> {
        let definition = self.check_buy_champion(player, slot)?;
        let position = self.players[player]
            .board
            .first_free_bench()
            .ok_or(ActionError::BenchFull)?;
        let cost = self.unit_cost(definition);

        let unit = self.spawn_unit(player, definition, position)?;
        let state = &mut self.players[player];
        state.shop.take(slot);
        state.economy.gold -= u32::from(cost);
        debug!(%player, %definition, slot, "bought unit");

        self.combine_units(player);
        Ok(unit)
    }

    /// Create a 1-star unit on an empty position.
    pub(crate) fn spawn_unit(
        &mut self,
        player: PlayerId,
        definition: DefinitionId,
        position: Position,
    ) -> Result<UnitId, ActionError> {
        let cap = self.board_cap(player);
        self.players[player].board.check_place(position, cap)?;

        let cost = self.unit_cost(definition);
        let unit = self.units.spawn(definition, cost, player, position);
        self.players[player].board.place(unit, position, cap)?;
        Ok(unit)
    }

    // === Sell ===

    pub fn check_sell_champion(&self, player: PlayerId, from: Position) -> Result<UnitId, ActionError> {
        self.players[player]
            .board
            .get(from)
            .ok_or(ActionError::PositionEmpty(from))
    }

    /// Sell a unit: its copies go back to the pool and the player is refunded.
    /// Returns the refund.
    pub fn sell_champion(&mut self, player: PlayerId, from: Position) -> Result<u32, ActionError> {
        let unit_id = self.check_sell_champion(player, from)?;
        let Some(unit) = self.units.remove(unit_id) else {
            return Err(ActionError::PositionEmpty(from));
        };
        let state = &mut self.players[player];
        state.board.remove(from)?;

        let refund = self.config.sale_value(unit.cost, unit.star);
        state.economy.gold += refund;
        self.pool.release(unit.definition, unit.copies());
        debug!(%player, definition = %unit.definition, star = unit.star, refund, "sold unit");
        Ok(refund)
    }

    // === Move ===

    pub fn check_move_champion(&self, player: PlayerId, from: Position, to: Position) -> Result<(), ActionError> {
        self.players[player]
            .board
            .check_move(from, to, self.board_cap(player))
    }

    /// Relocate a unit, or swap it with the unit at `to`.
    pub fn move_champion(&mut self, player: PlayerId, from: Position, to: Position) -> Result<(), ActionError> {
        let cap = self.board_cap(player);
        let board = &mut self.players[player].board;
        board.move_unit(from, to, cap)?;

        for position in [from, to] {
            if let Some(id) = board.get(position) {
                if let Some(unit) = self.units.get_mut(id) {
                    unit.position = position;
                }
            }
        }
        Ok(())
    }

    // === Shop and XP ===

    pub fn check_refresh_shop(&self, player: PlayerId) -> Result<(), ActionError> {
        self.players[player].economy.check_refresh(&self.config)
    }

    /// Pay for and perform a reroll. Returns the number of slots filled.
    pub fn refresh_shop(&mut self, player: PlayerId) -> Result<usize, ActionError> {
        let state = &mut self.players[player];
        state.economy.pay_refresh(&self.config)?;
        let level = state.economy.level;
        Ok(state
            .shop
            .refresh(&mut self.pool, level, &self.config, &mut self.rng.shop))
    }

    pub fn check_buy_xp(&self, player: PlayerId) -> Result<(), ActionError> {
        self.players[player].economy.check_buy_xp(&self.config)
    }

    /// Buy XP. Returns levels gained.
    pub fn buy_xp(&mut self, player: PlayerId) -> Result<u8, ActionError> {
        let gained = self.players[player].economy.buy_xp(&self.config)?;
        if gained > 0 {
            debug!(%player, level = self.players[player].economy.level, "level up");
        }
        Ok(gained)
    }

    /// Flip the shop lock. Returns the new lock state.
    pub fn toggle_shop_lock(&mut self, player: PlayerId) -> bool {
        self.players[player].shop.toggle_lock()
    }

    // === Combining ===

    /// Three units of one definition and star level, in position order.
    fn find_combinable(&self, player: PlayerId) -> Option<(DefinitionId, [UnitId; 3])> {
        let mut groups: SmallVec<[((DefinitionId, u8), SmallVec<[UnitId; 3]>); 16]> = SmallVec::new();

        for (_, id) in self.players[player].board.occupied() {
            let Some(unit) = self.units.get(id) else {
                continue;
            };
            if unit.star >= MAX_STAR {
                continue;
            }
            let key = (unit.definition, unit.star);
            let group = match groups.iter_mut().position(|(k, _)| *k == key) {
                Some(i) => &mut groups[i].1,
                None => {
                    groups.push((key, SmallVec::new()));
                    let last = groups.len() - 1;
                    &mut groups[last].1
                }
            };
            group.push(id);
            if group.len() == 3 {
                return Some((unit.definition, [group[0], group[1], group[2]]));
            }
        }
        None
    }

    /// Merge every triple of identical units, cascading to higher stars.
    ///
    /// The unit that comes first in position order (board before bench) is
    /// kept and upgraded in place; the other two are removed and their items
    /// move to the kept unit while it has free slots.
    pub fn combine_units(&mut self, player: PlayerId) -> Vec<Combination> {
        let mut done = Vec::new();

        while let Some((definition, [kept, a, b])) = self.find_combinable(player) {
            let mut items: SmallVec<[ItemId; 6]> = SmallVec::new();
            for consumed in [a, b] {
                if let Some(unit) = self.units.remove(consumed) {
                    // Each consumed unit sits on its own recorded position.
                    let removed = self.players[player].board.remove(unit.position);
                    debug_assert!(
                        matches!(removed, Ok(id) if id == consumed),
                        "stale position {:?} for {consumed}",
                        unit.position
                    );
                    items.extend(unit.items);
                }
            }

            let Some(unit) = self.units.get_mut(kept) else {
                break;
            };
            unit.star += 1;
            for item in items {
                if unit.items.len() >= MAX_ITEMS {
                    break;
                }
                unit.items.push(item);
            }
            debug!(%player, %definition, star = unit.star, "combined units");

            done.push(Combination {
                kept,
                consumed: [a, b],
                definition,
                new_star: unit.star,
            });
        }
        done
    }

    // === Elimination ===

    /// Return all of a player's units and offers to the pool.
    pub fn release_player(&mut self, player: PlayerId) {
        let state = &mut self.players[player];
        state.shop.clear(&mut self.pool);
        for id in state.board.clear() {
            if let Some(unit) = self.units.remove(id) {
                self.pool.release(unit.definition, unit.copies());
            }
        }
    }
}
