//! Per-player gold, XP and leveling.
//!
//! The round update runs in a fixed order so totals stay auditable:
//!
//! 1. base gold, streak gold and win gold from the previous combat
//! 2. interest on the resulting bank
//! 3. passive XP plus any XP queued since the last update, with level-ups

use serde::{Deserialize, Serialize};

use crate::core::{ActionError, GameConfig};

/// How a player's last combat ended, from their side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatOutcome {
    Win,
    Loss,
    Draw,
}

/// Gold and XP granted by one round update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeReport {
    pub base: u32,
    pub streak: u32,
    pub win: u32,
    pub interest: u32,
    pub xp: u32,
    pub levels_gained: u8,
}

impl IncomeReport {
    #[must_use]
    pub fn total_gold(&self) -> u32 {
        self.base + self.streak + self.win + self.interest
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerEconomy {
    pub gold: u32,
    pub level: u8,
    pub xp: u32,
    pub win_streak: u32,
    pub loss_streak: u32,
    pub last_outcome: Option<CombatOutcome>,

    /// XP granted outside the shop (augments), applied at step 3.
    pub pending_xp: u32,

    /// Rerolls that cost no gold.
    pub free_rerolls: u32,
}

impl PlayerEconomy {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let mut economy = Self {
            gold: config.starting_gold,
            level: config.starting_level,
            xp: 0,
            win_streak: 0,
            loss_streak: 0,
            last_outcome: None,
            pending_xp: 0,
            free_rerolls: 0,
        };
        economy.xp = config.xp_to_reach(economy.level).unwrap_or(0);
        economy
    }

    /// XP still needed for the next level, `None` at max level.
    #[must_use]
    pub fn xp_to_next(&self, config: &GameConfig) -> Option<u32> {
        if self.level >= config.max_level {
            return None;
        }
        config
            .xp_to_reach(self.level + 1)
            .map(|needed| needed.saturating_sub(self.xp))
    }

    /// Add XP and apply every level-up it unlocks. Returns levels gained.
    pub fn gain_xp(&mut self, amount: u32, config: &GameConfig) -> u8 {
        self.xp += amount;
        let start = self.level;
        while self.level < config.max_level {
            match config.xp_to_reach(self.level + 1) {
                Some(needed) if self.xp >= needed => self.level += 1,
                _ => break,
            }
        }
        self.level - start
    }

    /// Take gold, or fail without touching the bank.
    pub fn spend(&mut self, amount: u32) -> Result<(), ActionError> {
        self.check_gold(amount)?;
        self.gold -= amount;
        Ok(())
    }

    pub fn check_gold(&self, amount: u32) -> Result<(), ActionError> {
        if self.gold < amount {
            return Err(ActionError::InsufficientGold {
                needed: amount,
                available: self.gold,
            });
        }
        Ok(())
    }

    pub fn check_buy_xp(&self, config: &GameConfig) -> Result<(), ActionError> {
        if self.level >= config.max_level {
            return Err(ActionError::MaxLevel(self.level));
        }
        self.check_gold(config.xp_purchase_cost)
    }

    /// Buy XP for gold.
    pub fn buy_xp(&mut self, config: &GameConfig) -> Result<u8, ActionError> {
        self.check_buy_xp(config)?;
        self.gold -= config.xp_purchase_cost;
        Ok(self.gain_xp(config.xp_purchase_amount, config))
    }

    /// A refresh is affordable with a free reroll or enough gold.
    pub fn check_refresh(&self, config: &GameConfig) -> Result<(), ActionError> {
        if self.free_rerolls > 0 {
            return Ok(());
        }
        self.check_gold(config.refresh_cost)
    }

    /// Pay for a refresh, consuming a free reroll first.
    pub fn pay_refresh(&mut self, config: &GameConfig) -> Result<(), ActionError> {
        self.check_refresh(config)?;
        if self.free_rerolls > 0 {
            self.free_rerolls -= 1;
        } else {
            self.gold -= config.refresh_cost;
        }
        Ok(())
    }

    /// Update streaks from a combat result.
    pub fn record_combat(&mut self, outcome: CombatOutcome) {
        match outcome {
            CombatOutcome::Win => {
                self.win_streak += 1;
                self.loss_streak = 0;
            }
            CombatOutcome::Loss => {
                self.loss_streak += 1;
                self.win_streak = 0;
            }
            CombatOutcome::Draw => {
                self.win_streak = 0;
                self.loss_streak = 0;
            }
        }
        self.last_outcome = Some(outcome);
    }

    /// The ordered per-round update.
    ///
    /// `passive_xp` is false for the first round of a game.
    pub fn round_income(&mut self, config: &GameConfig, passive_xp: bool) -> IncomeReport {
        let mut report = IncomeReport {
            base: config.gold_per_round,
            streak: config.streak_gold_for(self.win_streak.max(self.loss_streak)),
            win: if self.last_outcome == Some(CombatOutcome::Win) {
                config.win_gold
            } else {
                0
            },
            ..IncomeReport::default()
        };
        self.gold += report.base + report.streak + report.win;

        report.interest = config.interest_for(self.gold);
        self.gold += report.interest;

        let passive = if passive_xp && self.level < config.max_level {
            config.passive_xp_per_round
        } else {
            0
        };
        report.xp = passive + std::mem::take(&mut self.pending_xp);
        report.levels_gained = self.gain_xp(report.xp, config);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_economy() {
        let config = GameConfig::default().with_starting_level(3);
        let economy = PlayerEconomy::new(&config);

        assert_eq!(economy.level, 3);
        assert_eq!(economy.xp, 6);
        assert_eq!(economy.xp_to_next(&config), Some(4));
    }

    #[test]
    fn test_buy_xp_levels_up() {
        let config = GameConfig::default().with_starting_gold(10);
        let mut economy = PlayerEconomy::new(&config);

        assert_eq!(economy.buy_xp(&config), Ok(1));
        assert_eq!(economy.level, 2);
        assert_eq!(economy.xp, 4);
        assert_eq!(economy.gold, 6);
    }

    #[test]
    fn test_buy_xp_rejections() {
        let config = GameConfig::default().with_starting_gold(3);
        let mut economy = PlayerEconomy::new(&config);
        assert_eq!(
            economy.buy_xp(&config),
            Err(ActionError::InsufficientGold { needed: 4, available: 3 })
        );

        economy.level = config.max_level;
        economy.gold = 50;
        assert_eq!(economy.check_buy_xp(&config), Err(ActionError::MaxLevel(11)));
    }

    #[test]
    fn test_free_reroll_is_used_first() {
        let config = GameConfig::default();
        let mut economy = PlayerEconomy::new(&config);
        economy.free_rerolls = 1;

        economy.pay_refresh(&config).unwrap();
        assert_eq!(economy.free_rerolls, 0);
        assert_eq!(economy.gold, 0);
        assert!(economy.pay_refresh(&config).is_err());
    }

    #[test]
    fn test_round_income_order() {
        let config = GameConfig::default().with_starting_gold(16);
        let mut economy = PlayerEconomy::new(&config);
        economy.record_combat(CombatOutcome::Win);
        economy.record_combat(CombatOutcome::Win);
        economy.record_combat(CombatOutcome::Win);

        let report = economy.round_income(&config, true);

        // 16 + 5 base + 1 streak + 1 win = 23, then 2 interest.
        assert_eq!(report.base, 5);
        assert_eq!(report.streak, 1);
        assert_eq!(report.win, 1);
        assert_eq!(report.interest, 2);
        assert_eq!(economy.gold, 25);
        assert_eq!(report.total_gold(), 9);
        assert_eq!(report.xp, 2);
        assert_eq!(economy.level, 2);
    }

    #[test]
    fn test_pending_xp_is_consumed() {
        let config = GameConfig::default();
        let mut economy = PlayerEconomy::new(&config);
        economy.pending_xp = 4;

        let report = economy.round_income(&config, false);
        assert_eq!(report.xp, 4);
        assert_eq!(economy.pending_xp, 0);
        assert_eq!(economy.level, 2);
    }

    #[test]
    fn test_streaks() {
        let config = GameConfig::default();
        let mut economy = PlayerEconomy::new(&config);
        economy.record_combat(CombatOutcome::Loss);
        economy.record_combat(CombatOutcome::Loss);
        assert_eq!(economy.loss_streak, 2);

        economy.record_combat(CombatOutcome::Win);
        assert_eq!(economy.loss_streak, 0);
        assert_eq!(economy.win_streak, 1);

        economy.record_combat(CombatOutcome::Draw);
        assert_eq!(economy.win_streak, 0);
    }
}
