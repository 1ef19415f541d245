//! A player's shop: a row of offer slots drawn from the shared pool.
//!
//! Offered copies are reserved: they are out of the pool until the slot is
//! bought (the copy moves to the bench) or the shop is refreshed (the copy
//! goes back). Buying one slot leaves the others untouched.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::pool::ShopPool;
use crate::core::{GameConfig, GameRng, PoolError};
use crate::data::DefinitionId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shop {
    offers: Vec<Option<DefinitionId>>,
    locked: bool,
}

impl Shop {
    /// An empty, unlocked shop with `size` slots.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            offers: vec![None; size],
            locked: false,
        }
    }

    #[must_use]
    pub fn offers(&self) -> &[Option<DefinitionId>] {
        &self.offers
    }

    #[must_use]
    pub fn offer(&self, slot: usize) -> Option<DefinitionId> {
        self.offers.get(slot).copied().flatten()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.offers.len()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Flip the lock and return the new state.
    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.locked
    }

    /// Empty a slot and hand back what it held. The copy stays out of the pool.
    pub fn take(&mut self, slot: usize) -> Option<DefinitionId> {
        self.offers.get_mut(slot).and_then(Option::take)
    }

    /// Return every outstanding offer to the pool and leave the slots empty.
    pub fn clear(&mut self, pool: &mut ShopPool) {
        for offer in &mut self.offers {
            if let Some(id) = offer.take() {
                pool.release(id, 1);
            }
        }
    }

    /// Return the current offers, then draw a full row.
    ///
    /// Draws are without replacement. When the pool runs dry the remaining
    /// slots stay empty; that short draw is not an error. Returns the
    /// number of slots filled.
    pub fn refresh(&mut self, pool: &mut ShopPool, level: u8, config: &GameConfig, rng: &mut GameRng) -> usize {
        self.clear(pool);
        let odds = config.odds_for_level(level);

        let mut filled = 0;
        for offer in &mut self.offers {
            match pool.draw(level, odds, rng) {
                Ok(id) => {
                    *offer = Some(id);
                    filled += 1;
                }
                Err(PoolError::Exhausted { .. }) | Err(PoolError::NoCopies(_)) => {
                    warn!(level, filled, "pool exhausted, short shop draw");
                    break;
                }
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GameData;

    fn setup() -> (GameData, GameConfig, ShopPool) {
        let data = GameData::standard_roster();
        let config = GameConfig::default();
        let pool = ShopPool::new(&data, &config);
        (data, config, pool)
    }

    fn pool_total(pool: &ShopPool) -> u32 {
        (1..=5).map(|c| pool.tier_remaining(c)).sum()
    }

    #[test]
    fn test_refresh_fills_every_slot() {
        let (_, config, mut pool) = setup();
        let mut shop = Shop::new(config.shop_size);
        let mut rng = GameRng::new(5);
        let before = pool_total(&pool);

        assert_eq!(shop.refresh(&mut pool, 1, &config, &mut rng), 5);
        assert!(shop.offers().iter().all(Option::is_some));
        assert_eq!(pool_total(&pool), before - 5);
    }

    #[test]
    fn test_refresh_returns_old_offers() {
        let (_, config, mut pool) = setup();
        let mut shop = Shop::new(config.shop_size);
        let mut rng = GameRng::new(5);
        let before = pool_total(&pool);

        shop.refresh(&mut pool, 4, &config, &mut rng);
        shop.refresh(&mut pool, 4, &config, &mut rng);
        assert_eq!(pool_total(&pool), before - 5);

        shop.clear(&mut pool);
        assert_eq!(pool_total(&pool), before);
    }

    #[test]
    fn test_take_leaves_other_slots() {
        let (_, config, mut pool) = setup();
        let mut shop = Shop::new(config.shop_size);
        let mut rng = GameRng::new(5);
        shop.refresh(&mut pool, 1, &config, &mut rng);

        let taken = shop.take(2);
        assert!(taken.is_some());
        assert_eq!(shop.offer(2), None);
        assert_eq!(shop.take(2), None);
        assert_eq!(shop.offers().iter().filter(|o| o.is_some()).count(), 4);
    }

    #[test]
    fn test_short_draw() {
        let (data, config, mut pool) = setup();
        let ids = data.units_of_cost(1).to_vec();
        for id in &ids[1..] {
            pool.take(*id, 29).unwrap();
        }
        pool.take(ids[0], 27).unwrap();

        let mut shop = Shop::new(config.shop_size);
        let mut rng = GameRng::new(5);
        assert_eq!(shop.refresh(&mut pool, 1, &config, &mut rng), 2);
        assert_eq!(shop.offer(0), Some(ids[0]));
        assert_eq!(shop.offer(2), None);
    }

    #[test]
    fn test_lock_toggle() {
        let mut shop = Shop::new(5);
        assert!(shop.toggle_lock());
        assert!(shop.is_locked());
        assert!(!shop.toggle_lock());
    }
}
