//! Shared, finite pool of purchasable unit copies.
//!
//! All players in one game draw from the same `ShopPool`. Every unit type
//! is minted a fixed number of copies at game start (by cost tier); a copy
//! is then either in the pool, in somebody's shop offer, or owned by a
//! player. Buying takes a copy out, selling puts copies back.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{GameConfig, GameRng, PoolError};
use crate::data::{DefinitionId, GameData};

/// Copies of every definition of one cost tier, sorted by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct TierBag {
    ids: Vec<DefinitionId>,
    remaining: Vec<u32>,
    minted: u32,
}

impl TierBag {
    fn total(&self) -> u32 {
        self.remaining.iter().sum()
    }
}

/// The shared pool owned by one game instance.
///
/// ```
/// use rust_autobattler::core::{GameConfig, GameRng};
/// use rust_autobattler::data::GameData;
/// use rust_autobattler::economy::ShopPool;
///
/// let data = GameData::standard_roster();
/// let config = GameConfig::default();
/// let mut pool = ShopPool::new(&data, &config);
/// let mut rng = GameRng::new(1);
///
/// let drawn = pool.draw(1, config.odds_for_level(1), &mut rng).unwrap();
/// assert_eq!(data.unit(drawn).unwrap().cost, 1);
/// assert_eq!(pool.remaining(drawn), 28);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopPool {
    tiers: Vec<TierBag>,
    /// Definition -> (tier index, index within tier).
    lookup: FxHashMap<DefinitionId, (usize, usize)>,
}

impl ShopPool {
    /// Mint the starting copies for every definition in `data`.
    #[must_use]
    pub fn new(data: &GameData, config: &GameConfig) -> Self {
        let tier_count = config.cost_tiers().max(config.copies_per_cost.len());
        let mut tiers = Vec::with_capacity(tier_count);
        let mut lookup = FxHashMap::default();

        for tier in 0..tier_count {
            let cost = (tier + 1) as u8;
            let ids = data.units_of_cost(cost).to_vec();
            let minted = config.copies_for_cost(cost);
            for (i, id) in ids.iter().enumerate() {
                lookup.insert(*id, (tier, i));
            }
            tiers.push(TierBag {
                remaining: vec![minted; ids.len()],
                ids,
                minted,
            });
        }

        Self { tiers, lookup }
    }

    /// Copies of `definition` currently in the pool.
    #[must_use]
    pub fn remaining(&self, definition: DefinitionId) -> u32 {
        self.lookup
            .get(&definition)
            .map_or(0, |&(tier, i)| self.tiers[tier].remaining[i])
    }

    /// Copies of `definition` minted at game start.
    #[must_use]
    pub fn minted(&self, definition: DefinitionId) -> u32 {
        self.lookup
            .get(&definition)
            .map_or(0, |&(tier, _)| self.tiers[tier].minted)
    }

    /// Copies left across a whole cost tier.
    #[must_use]
    pub fn tier_remaining(&self, cost: u8) -> u32 {
        usize::from(cost)
            .checked_sub(1)
            .and_then(|tier| self.tiers.get(tier))
            .map_or(0, TierBag::total)
    }

    /// Every pooled definition in cost-then-id order.
    pub fn definitions(&self) -> impl Iterator<Item = DefinitionId> + '_ {
        self.tiers.iter().flat_map(|bag| bag.ids.iter().copied())
    }

    /// Draw one copy using a cost-tier odds row.
    ///
    /// A tier is rolled from `odds`; if it has no copies left the draw
    /// falls back to the next cheaper tier that does. Within a tier, each
    /// physical copy is equally likely. The drawn copy leaves the pool.
    pub fn draw(&mut self, level: u8, odds: &[f64], rng: &mut GameRng) -> Result<DefinitionId, PoolError> {
        let rolled = rng
            .choose_weighted(odds)
            .ok_or(PoolError::Exhausted { level })?;

        let tier = (0..=rolled.min(self.tiers.len().saturating_sub(1)))
            .rev()
            .find(|&t| self.tiers.get(t).is_some_and(|bag| bag.total() > 0))
            .ok_or(PoolError::Exhausted { level })?;

        let bag = &mut self.tiers[tier];
        let i = rng
            .choose_by_count(&bag.remaining)
            .ok_or(PoolError::Exhausted { level })?;
        bag.remaining[i] -= 1;
        Ok(bag.ids[i])
    }

    /// Remove `copies` copies of a specific definition.
    pub fn take(&mut self, definition: DefinitionId, copies: u32) -> Result<(), PoolError> {
        let &(tier, i) = self
            .lookup
            .get(&definition)
            .ok_or(PoolError::NoCopies(definition))?;
        let slot = &mut self.tiers[tier].remaining[i];
        if *slot < copies {
            return Err(PoolError::NoCopies(definition));
        }
        *slot -= copies;
        Ok(())
    }

    /// Return copies to the pool.
    ///
    /// Releasing more than was taken breaks conservation; debug builds
    /// panic, release builds cap at the minted total.
    pub fn release(&mut self, definition: DefinitionId, copies: u32) {
        if let Some(&(tier, i)) = self.lookup.get(&definition) {
            let bag = &mut self.tiers[tier];
            let returned = bag.remaining[i] + copies;
            debug_assert!(
                returned <= bag.minted,
                "over-release of {definition}: {returned} > {} minted",
                bag.minted
            );
            bag.remaining[i] = returned.min(bag.minted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GameData, GameConfig, ShopPool) {
        let data = GameData::standard_roster();
        let config = GameConfig::default();
        let pool = ShopPool::new(&data, &config);
        (data, config, pool)
    }

    #[test]
    fn test_minted_by_cost() {
        let (data, _, pool) = setup();
        let one = data.units_of_cost(1)[0];
        let five = data.units_of_cost(5)[0];

        assert_eq!(pool.minted(one), 29);
        assert_eq!(pool.remaining(one), 29);
        assert_eq!(pool.minted(five), 10);
        assert_eq!(pool.tier_remaining(1), 29 * 8);
    }

    #[test]
    fn test_draw_follows_level_odds() {
        let (data, config, mut pool) = setup();
        let mut rng = GameRng::new(9);

        for _ in 0..50 {
            let id = pool.draw(3, config.odds_for_level(3), &mut rng).unwrap();
            let cost = data.unit(id).unwrap().cost;
            assert!(cost == 1 || cost == 2);
        }
    }

    #[test]
    fn test_draw_falls_back_to_cheaper_tier() {
        let (data, _, mut pool) = setup();
        for id in data.units_of_cost(2).to_vec() {
            pool.take(id, 22).unwrap();
        }
        let mut rng = GameRng::new(4);

        let id = pool.draw(3, &[0.0, 1.0], &mut rng).unwrap();
        assert_eq!(data.unit(id).unwrap().cost, 1);
    }

    #[test]
    fn test_exhausted_pool() {
        let (data, _, mut pool) = setup();
        for id in data.units_of_cost(1).to_vec() {
            pool.take(id, 29).unwrap();
        }
        let mut rng = GameRng::new(4);

        assert_eq!(
            pool.draw(1, &[1.0], &mut rng),
            Err(PoolError::Exhausted { level: 1 })
        );
    }

    #[test]
    fn test_take_and_release() {
        let (data, _, mut pool) = setup();
        let id = data.units_of_cost(4)[0];

        pool.take(id, 3).unwrap();
        assert_eq!(pool.remaining(id), 9);
        assert_eq!(pool.take(id, 10), Err(PoolError::NoCopies(id)));

        pool.release(id, 3);
        assert_eq!(pool.remaining(id), 12);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "over-release")]
    fn test_releasing_more_than_taken_panics() {
        let (data, _, mut pool) = setup();
        let id = data.units_of_cost(4)[0];

        pool.take(id, 2).unwrap();
        pool.release(id, 3);
    }

    #[test]
    fn test_draw_is_deterministic() {
        let (_, config, pool) = setup();
        let mut a = pool.clone();
        let mut b = pool;
        let mut rng_a = GameRng::new(77);
        let mut rng_b = GameRng::new(77);

        for level in 1..=11 {
            let odds = config.odds_for_level(level);
            assert_eq!(a.draw(level, odds, &mut rng_a), b.draw(level, odds, &mut rng_b));
        }
    }
}
