//! Combat resolver properties over captured boards.

use rust_autobattler::board::Position;
use rust_autobattler::combat::{resolve, BoardSnapshot, Side, UnitSnapshot};
use rust_autobattler::core::CombatConfig;
use rust_autobattler::data::DefinitionId;

fn unit(base_power: f64, star: u8) -> UnitSnapshot {
    UnitSnapshot {
        definition: DefinitionId::new(1),
        star,
        cost: 1,
        position: Position::board(0, 0).unwrap(),
        items: Vec::new(),
        base_power,
        item_bonus: 0.0,
    }
}

fn board(powers: &[f64]) -> BoardSnapshot {
    BoardSnapshot {
        player: None,
        units: powers.iter().map(|p| unit(*p, 1)).collect(),
        trait_bonus: 0.0,
    }
}

fn home_wins(home: &BoardSnapshot, away: &BoardSnapshot, trials: u64) -> u64 {
    let config = CombatConfig::default();
    (0..trials)
        .filter(|seed| resolve(home, away, 2, *seed, &config).winner == Some(Side::Home))
        .count() as u64
}

#[test]
fn test_outcome_is_pure_function_of_inputs() {
    let config = CombatConfig::default();
    let home = board(&[30.0, 20.0, 10.0]);
    let away = board(&[25.0, 25.0]);
    for seed in [0, 1, 99, u64::MAX] {
        let first = resolve(&home, &away, 3, seed, &config);
        let second = resolve(&home.clone(), &away.clone(), 3, seed, &config);
        assert_eq!(first, second);
    }
}

#[test]
fn test_stronger_board_wins_more_often() {
    let away = board(&[20.0, 20.0]);
    let even = home_wins(&board(&[20.0, 20.0]), &away, 400);
    let stronger = home_wins(&board(&[30.0, 30.0]), &away, 400);
    let dominant = home_wins(&board(&[60.0, 60.0]), &away, 400);

    assert!(stronger > even, "{stronger} vs {even}");
    assert!(dominant > stronger, "{dominant} vs {stronger}");
    assert!(dominant > 340);
}

#[test]
fn test_zero_power_boards_draw() {
    let config = CombatConfig::default();
    let home = board(&[0.0, 0.0]);
    let away = board(&[0.0]);
    for seed in 0..20 {
        let result = resolve(&home, &away, 5, seed, &config);
        assert_eq!(result.winner, None);
        assert_eq!(result.home_survivors, 0);
        assert_eq!(result.away_survivors, 0);
        assert_eq!(result.damage, 0);
    }
}

#[test]
fn test_empty_board_never_wins() {
    let config = CombatConfig::default();
    let weak = board(&[0.5]);
    for seed in 0..50 {
        let result = resolve(&BoardSnapshot::empty(), &weak, 1, seed, &config);
        assert_eq!(result.winner, Some(Side::Away));
        assert_eq!(result.home_survivors, 0);
    }
}

#[test]
fn test_damage_counts_surviving_stars() {
    let config = CombatConfig {
        min_survivor_fraction: 1.0,
        ..CombatConfig::default()
    };
    let home = BoardSnapshot {
        player: None,
        units: vec![unit(10.0, 2), unit(10.0, 3)],
        trait_bonus: 0.0,
    };
    let result = resolve(&home, &BoardSnapshot::empty(), 4, 7, &config);
    assert_eq!(result.winner, Some(Side::Home));
    assert_eq!(result.home_survivors, 2);
    assert_eq!(result.damage, 4 + 2 + 3);
}

#[test]
fn test_trait_bonus_shifts_odds() {
    let away = board(&[20.0, 20.0]);
    let mut boosted = board(&[20.0, 20.0]);
    boosted.trait_bonus = 0.5;
    assert!(home_wins(&boosted, &away, 400) > home_wins(&board(&[20.0, 20.0]), &away, 400));
}
