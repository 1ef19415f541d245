//! Game configuration.
//!
//! Every patch-dependent number lives here: economy constants, the shop-odds
//! table, pool sizes, XP curve, round damage. The engine never hardcodes
//! them. Configs can be built in code with the `with_*` methods or loaded
//! from TOML, where any omitted field keeps its default:
//!
//! ```
//! use rust_autobattler::core::GameConfig;
//!
//! let config = GameConfig::from_toml_str(
//!     r#"
//!     player_count = 4
//!     refresh_cost = 1
//!
//!     [combat]
//!     steepness = 4.0
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.player_count, 4);
//! assert_eq!(config.refresh_cost, 1);
//! assert_eq!(config.shop_size, 5);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Gold paid for holding a win or loss streak of at least `min_streak`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakBonus {
    pub min_streak: u32,
    pub gold: u32,
}

/// Tuning for the statistical combat resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Power multiplier per star level (index 0 = 1-star).
    pub star_multipliers: Vec<f64>,

    /// Slope of the logistic win curve over the normalized power gap.
    pub steepness: f64,

    /// Survival chance floor for each unit on the winning side.
    pub min_survivor_fraction: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            star_multipliers: vec![1.0, 1.8, 3.24],
            steepness: 6.0,
            min_survivor_fraction: 0.15,
        }
    }
}

/// Complete configuration for one game instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Lobby ===
    /// Number of players in the lobby.
    pub player_count: usize,

    /// Round ceiling. The game ends after this round's combat.
    pub max_rounds: u32,

    /// Decision steps per planning phase before the planning timer fires.
    pub planning_step_limit: u32,

    // === Player progression ===
    pub starting_health: u32,
    pub starting_gold: u32,
    pub starting_level: u8,
    pub max_level: u8,

    /// Cumulative XP needed to reach each level (index 0 = level 1).
    pub xp_thresholds: Vec<u32>,

    /// Board unit cap per level (index 0 = level 1).
    pub board_cap_by_level: Vec<usize>,

    // === Economy ===
    pub gold_per_round: u32,

    /// One interest gold per this much banked gold.
    pub interest_step: u32,
    pub interest_cap: u32,

    /// Extra gold for winning the previous round's combat.
    pub win_gold: u32,

    /// Streak gold table; the highest matching entry applies.
    pub streak_gold: Vec<StreakBonus>,

    pub xp_purchase_cost: u32,
    pub xp_purchase_amount: u32,

    /// XP granted at each round start after the first.
    pub passive_xp_per_round: u32,

    // === Shop and pool ===
    pub refresh_cost: u32,
    pub shop_size: usize,

    /// Cost-tier odds per level (row = level - 1, column = cost - 1).
    pub shop_odds: Vec<Vec<f64>>,

    /// Copies minted per unit definition, by cost (index 0 = 1-cost).
    pub copies_per_cost: Vec<u32>,

    /// Gold withheld when selling an upgraded unit that costs more than 1.
    pub upgraded_sale_penalty: u32,

    // === Rounds ===
    /// Base loss damage per round (index 0 = round 1); the last entry repeats.
    pub round_damage: Vec<u32>,

    pub carousel_rounds: Vec<u32>,
    pub augment_rounds: Vec<u32>,
    pub enable_carousel: bool,
    pub enable_augments: bool,

    /// Matchmaking avoids this many most recent opponents when it can.
    pub recent_opponent_window: usize,

    pub combat: CombatConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 8,
            max_rounds: 48,
            planning_step_limit: 20,
            starting_health: 100,
            starting_gold: 0,
            starting_level: 1,
            max_level: 11,
            xp_thresholds: vec![0, 2, 6, 10, 20, 36, 56, 80, 108, 136, 176],
            board_cap_by_level: (1..=11).collect(),
            gold_per_round: 5,
            interest_step: 10,
            interest_cap: 5,
            win_gold: 1,
            streak_gold: vec![
                StreakBonus { min_streak: 3, gold: 1 },
                StreakBonus { min_streak: 5, gold: 2 },
                StreakBonus { min_streak: 6, gold: 3 },
            ],
            xp_purchase_cost: 4,
            xp_purchase_amount: 4,
            passive_xp_per_round: 2,
            refresh_cost: 2,
            shop_size: 5,
            shop_odds: vec![
                vec![1.00, 0.00, 0.00, 0.00, 0.00],
                vec![1.00, 0.00, 0.00, 0.00, 0.00],
                vec![0.75, 0.25, 0.00, 0.00, 0.00],
                vec![0.55, 0.30, 0.15, 0.00, 0.00],
                vec![0.45, 0.33, 0.20, 0.02, 0.00],
                vec![0.30, 0.40, 0.25, 0.05, 0.00],
                vec![0.19, 0.30, 0.35, 0.15, 0.01],
                vec![0.16, 0.20, 0.35, 0.25, 0.04],
                vec![0.09, 0.15, 0.30, 0.30, 0.16],
                vec![0.05, 0.10, 0.20, 0.40, 0.25],
                vec![0.01, 0.02, 0.12, 0.50, 0.35],
            ],
            copies_per_cost: vec![29, 22, 18, 12, 10],
            upgraded_sale_penalty: 1,
            round_damage: vec![
                0, 0, 0, 2, 2, 2, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6, 6, 7, 7, 7, 7,
            ],
            carousel_rounds: vec![9, 18, 27, 36],
            augment_rounds: vec![6, 13, 20],
            enable_carousel: true,
            enable_augments: true,
            recent_opponent_window: 3,
            combat: CombatConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing fields keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Set the lobby size.
    #[must_use]
    pub fn with_player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    /// Set the round ceiling.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set the planning timer, in decision steps.
    #[must_use]
    pub fn with_planning_step_limit(mut self, steps: u32) -> Self {
        self.planning_step_limit = steps;
        self
    }

    /// Set the gold every player starts with.
    #[must_use]
    pub fn with_starting_gold(mut self, gold: u32) -> Self {
        self.starting_gold = gold;
        self
    }

    /// Set the level every player starts at.
    #[must_use]
    pub fn with_starting_level(mut self, level: u8) -> Self {
        self.starting_level = level;
        self
    }

    /// Enable or disable carousel rounds.
    #[must_use]
    pub fn with_carousel(mut self, enabled: bool) -> Self {
        self.enable_carousel = enabled;
        self
    }

    /// Enable or disable augment rounds.
    #[must_use]
    pub fn with_augments(mut self, enabled: bool) -> Self {
        self.enable_augments = enabled;
        self
    }

    /// Check that the tables are consistent with each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        let levels = usize::from(self.max_level);

        if !(2..=8).contains(&self.player_count) {
            return invalid(format!("player_count must be 2-8, got {}", self.player_count));
        }
        if self.max_level == 0 {
            return invalid("max_level must be at least 1".to_string());
        }
        if self.starting_level == 0 || self.starting_level > self.max_level {
            return invalid(format!(
                "starting_level {} outside 1..={}",
                self.starting_level, self.max_level
            ));
        }
        if self.starting_health == 0 {
            return invalid("starting_health must be positive".to_string());
        }
        if self.max_rounds == 0 || self.planning_step_limit == 0 {
            return invalid("max_rounds and planning_step_limit must be positive".to_string());
        }
        if self.xp_thresholds.len() != levels {
            return invalid(format!(
                "xp_thresholds has {} entries, expected {levels}",
                self.xp_thresholds.len()
            ));
        }
        if self.xp_thresholds.windows(2).any(|w| w[0] > w[1]) {
            return invalid("xp_thresholds must be non-decreasing".to_string());
        }
        if self.board_cap_by_level.len() != levels {
            return invalid(format!(
                "board_cap_by_level has {} entries, expected {levels}",
                self.board_cap_by_level.len()
            ));
        }
        if self
            .board_cap_by_level
            .iter()
            .any(|&cap| cap > crate::board::BOARD_CELLS)
        {
            return invalid("board cap cannot exceed the number of board cells".to_string());
        }
        if self.shop_size == 0 {
            return invalid("shop_size must be positive".to_string());
        }
        if self.shop_odds.len() != levels {
            return invalid(format!(
                "shop_odds has {} rows, expected {levels}",
                self.shop_odds.len()
            ));
        }
        let tiers = self.shop_odds[0].len();
        for (i, row) in self.shop_odds.iter().enumerate() {
            if row.len() != tiers {
                return invalid(format!("shop_odds row {} has {} tiers, expected {tiers}", i + 1, row.len()));
            }
            if row.iter().any(|p| *p < 0.0) || row.iter().sum::<f64>() <= 0.0 {
                return invalid(format!("shop_odds row {} needs non-negative odds with a positive sum", i + 1));
            }
        }
        if self.copies_per_cost.len() < tiers {
            return invalid(format!(
                "copies_per_cost covers {} tiers, shop_odds uses {tiers}",
                self.copies_per_cost.len()
            ));
        }
        if self.round_damage.is_empty() {
            return invalid("round_damage must not be empty".to_string());
        }
        if self.combat.star_multipliers.len() != 3 {
            return invalid("combat.star_multipliers needs one entry per star level".to_string());
        }
        if !(0.0..=1.0).contains(&self.combat.min_survivor_fraction) || self.combat.steepness <= 0.0 {
            return invalid("combat tuning out of range".to_string());
        }
        Ok(())
    }

    // === Table lookups ===

    /// Number of cost tiers the shop can roll.
    #[must_use]
    pub fn cost_tiers(&self) -> usize {
        self.shop_odds.first().map_or(0, Vec::len)
    }

    /// Cumulative XP needed to reach `level`.
    #[must_use]
    pub fn xp_to_reach(&self, level: u8) -> Option<u32> {
        let index = usize::from(level).checked_sub(1)?;
        self.xp_thresholds.get(index).copied()
    }

    /// Board unit cap at `level`.
    #[must_use]
    pub fn board_cap(&self, level: u8) -> usize {
        let index = usize::from(level.max(1)) - 1;
        self.board_cap_by_level
            .get(index)
            .or_else(|| self.board_cap_by_level.last())
            .copied()
            .unwrap_or(0)
    }

    /// Cost-tier odds at `level`.
    #[must_use]
    pub fn odds_for_level(&self, level: u8) -> &[f64] {
        let index = usize::from(level.max(1)) - 1;
        self.shop_odds
            .get(index)
            .or_else(|| self.shop_odds.last())
            .map_or(&[], Vec::as_slice)
    }

    /// Copies minted per definition of the given cost.
    #[must_use]
    pub fn copies_for_cost(&self, cost: u8) -> u32 {
        usize::from(cost)
            .checked_sub(1)
            .and_then(|i| self.copies_per_cost.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Base damage for losing `round`.
    #[must_use]
    pub fn round_damage_for(&self, round: u32) -> u32 {
        let index = (round.max(1) - 1) as usize;
        self.round_damage
            .get(index)
            .or_else(|| self.round_damage.last())
            .copied()
            .unwrap_or(0)
    }

    /// Streak gold for a streak of the given length.
    #[must_use]
    pub fn streak_gold_for(&self, streak: u32) -> u32 {
        self.streak_gold
            .iter()
            .filter(|bonus| streak >= bonus.min_streak)
            .map(|bonus| bonus.gold)
            .max()
            .unwrap_or(0)
    }

    /// Interest earned on a bank of `gold`.
    #[must_use]
    pub fn interest_for(&self, gold: u32) -> u32 {
        if self.interest_step == 0 {
            return 0;
        }
        (gold / self.interest_step).min(self.interest_cap)
    }

    /// Gold refunded when selling a unit of `cost` at `star` level.
    #[must_use]
    pub fn sale_value(&self, cost: u8, star: u8) -> u32 {
        let copies = 3u32.pow(u32::from(star.max(1)) - 1);
        let gross = u32::from(cost) * copies;
        if star > 1 && cost > 1 {
            gross.saturating_sub(self.upgraded_sale_penalty)
        } else {
            gross
        }
    }

    #[must_use]
    pub fn is_carousel_round(&self, round: u32) -> bool {
        self.enable_carousel && self.carousel_rounds.contains(&round)
    }

    #[must_use]
    pub fn is_augment_round(&self, round: u32) -> bool {
        self.enable_augments && self.augment_rounds.contains(&round)
    }
}
