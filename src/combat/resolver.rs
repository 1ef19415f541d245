//! Statistical combat resolution.
//!
//! Combat is not simulated tick by tick. Each side gets one aggregate power
//! score; the winner is drawn from a logistic curve over the normalized
//! power gap, and the winner's survivors are drawn per unit with a chance
//! that grows with the margin. The result is a pure function of the two
//! snapshots, the base damage, the seed and the tuning.

use serde::{Deserialize, Serialize};

use super::snapshot::{BoardSnapshot, UnitSnapshot};
use crate::core::{CombatConfig, GameRng};

/// One side of a matchup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    #[must_use]
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Outcome of one matchup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    /// `None` is a draw.
    pub winner: Option<Side>,
    pub home_survivors: usize,
    pub away_survivors: usize,

    /// Health the loser loses. Zero on a draw.
    pub damage: u32,

    pub home_power: f64,
    pub away_power: f64,
}

impl CombatResult {
    #[must_use]
    pub fn loser(&self) -> Option<Side> {
        self.winner.map(Side::opponent)
    }

    #[must_use]
    pub fn survivors(&self, side: Side) -> usize {
        match side {
            Side::Home => self.home_survivors,
            Side::Away => self.away_survivors,
        }
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Power of one unit: base × star multiplier × (1 + item bonus).
#[must_use]
pub fn unit_power(unit: &UnitSnapshot, config: &CombatConfig) -> f64 {
    let star_index = usize::from(unit.star.max(1) - 1);
    let multiplier = config
        .star_multipliers
        .get(star_index)
        .or_else(|| config.star_multipliers.last())
        .copied()
        .unwrap_or(1.0);
    (unit.base_power * multiplier * (1.0 + unit.item_bonus)).max(0.0)
}

/// Aggregate power of a side, trait bonus included.
#[must_use]
pub fn board_power(board: &BoardSnapshot, config: &CombatConfig) -> f64 {
    let raw: f64 = board.units.iter().map(|u| unit_power(u, config)).sum();
    raw * (1.0 + board.trait_bonus.max(0.0))
}

/// Chance that the home side wins, from the two aggregate powers.
///
/// Strictly increasing in `home` and decreasing in `away`; exactly one half
/// when the two are equal.
#[must_use]
pub fn win_probability(home: f64, away: f64, steepness: f64) -> f64 {
    let total = home + away;
    if total <= 0.0 {
        return 0.5;
    }
    let gap = (home - away) / total;
    1.0 / (1.0 + (-steepness * gap).exp())
}

/// Resolve one matchup.
///
/// - Neither side has power: draw, nobody survives, no damage.
/// - One side has no power: the other side wins.
/// - Otherwise the winner is drawn from [`win_probability`].
///
/// The loser never has survivors and the winner always keeps at least its
/// strongest unit. Damage is `base_damage` plus the star levels of the
/// winner's survivors.
#[must_use]
pub fn resolve(
    home: &BoardSnapshot,
    away: &BoardSnapshot,
    base_damage: u32,
    seed: u64,
    config: &CombatConfig,
) -> CombatResult {
    let home_power = board_power(home, config);
    let away_power = board_power(away, config);
    let mut rng = GameRng::new(seed);

    let winner = match (home_power > 0.0, away_power > 0.0) {
        (false, false) => {
            return CombatResult {
                winner: None,
                home_survivors: 0,
                away_survivors: 0,
                damage: 0,
                home_power,
                away_power,
            };
        }
        (true, false) => Side::Home,
        (false, true) => Side::Away,
        (true, true) => {
            if rng.gen_bool(win_probability(home_power, away_power, config.steepness)) {
                Side::Home
            } else {
                Side::Away
            }
        }
    };

    let (winning_board, margin) = match winner {
        Side::Home => (home, (home_power - away_power) / (home_power + away_power)),
        Side::Away => (away, (away_power - home_power) / (home_power + away_power)),
    };
    let survive_chance = margin.clamp(config.min_survivor_fraction, 1.0);

    let mut survived: Vec<bool> = winning_board
        .units
        .iter()
        .map(|_| rng.gen_bool(survive_chance))
        .collect();
    if !survived.iter().any(|s| *s) {
        if let Some(strongest) = strongest_unit(winning_board, config) {
            survived[strongest] = true;
        }
    }

    let survivors = survived.iter().filter(|s| **s).count();
    let star_damage: u32 = winning_board
        .units
        .iter()
        .zip(&survived)
        .filter(|(_, s)| **s)
        .map(|(u, _)| u32::from(u.star))
        .sum();

    let (home_survivors, away_survivors) = match winner {
        Side::Home => (survivors, 0),
        Side::Away => (0, survivors),
    };
    CombatResult {
        winner: Some(winner),
        home_survivors,
        away_survivors,
        damage: base_damage + star_damage,
        home_power,
        away_power,
    }
}

/// Index of the most powerful unit; the first one wins ties.
fn strongest_unit(board: &BoardSnapshot, config: &CombatConfig) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, unit) in board.units.iter().enumerate() {
        let power = unit_power(unit, config);
        if best.map_or(true, |(_, p)| power > p) {
            best = Some((i, power));
        }
    }
    best.map(|(i, _)| i)
}
