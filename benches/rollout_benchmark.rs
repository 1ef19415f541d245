//! Benchmarks for whole episodes and the per-step hot paths.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use rust_autobattler::agents::{DecisionSource, GreedyAgent, RandomAgent};
use rust_autobattler::core::{GameConfig, PlayerId, PlayerMap};
use rust_autobattler::data::GameData;
use rust_autobattler::game::Game;
use rust_autobattler::rollout::{run_episode, RolloutConfig};

fn template() -> Game {
    Game::new(GameConfig::default(), Arc::new(GameData::standard_roster())).unwrap()
}

fn seats(source: Arc<dyn DecisionSource>) -> PlayerMap<Arc<dyn DecisionSource>> {
    PlayerMap::new(8, |_| Arc::clone(&source))
}

fn bench_random_episode(c: &mut Criterion) {
    let sources = seats(Arc::new(RandomAgent::new()));
    let config = RolloutConfig::new();
    let game = template();

    c.bench_function("episode_random_8p", |b| {
        b.iter(|| {
            let mut game = game.clone();
            black_box(run_episode(&mut game, black_box(42), &sources, &config).unwrap())
        });
    });
}

fn bench_greedy_episode(c: &mut Criterion) {
    let sources = seats(Arc::new(GreedyAgent));
    let config = RolloutConfig::new();
    let game = template();

    c.bench_function("episode_greedy_8p", |b| {
        b.iter(|| {
            let mut game = game.clone();
            black_box(run_episode(&mut game, black_box(42), &sources, &config).unwrap())
        });
    });
}

fn bench_mask_and_fork(c: &mut Criterion) {
    // Mid-game state so boards and benches are populated
    let mut game = template();
    let sources = seats(Arc::new(GreedyAgent));
    run_episode(&mut game, 9, &sources, &RolloutConfig::new().with_max_steps(60)).unwrap();
    let player = PlayerId::new(0);

    c.bench_function("action_mask", |b| {
        b.iter(|| black_box(game.action_mask(black_box(player))));
    });

    c.bench_function("snapshot", |b| {
        b.iter(|| black_box(game.snapshot(black_box(player))));
    });

    c.bench_function("fork", |b| {
        b.iter(|| black_box(game.fork()));
    });
}

criterion_group!(benches, bench_random_episode, bench_greedy_episode, bench_mask_and_fork);
criterion_main!(benches);
