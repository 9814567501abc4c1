//! Criterion benchmarks for cover evaluation.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, Criterion};
use tactical_cover::cover::{CoverEngine, CoverOptions, OccluderMap};
use tactical_cover::scenario::Scenario;

/// Square grid: a 2x2 attacker, a 3x3 target and a crowd in between
const CROWDED_SQUARE_TOML: &str = r#"
[grid]
size = 100.0

[[occupant]]
name = "giant"
x = 0.0
y = 400.0
size = "large"

[[occupant]]
name = "dragon"
x = 1200.0
y = 300.0
size = "huge"

[[occupant]]
name = "guard-1"
x = 600.0
y = 300.0

[[occupant]]
name = "guard-2"
x = 600.0
y = 500.0

[[occupant]]
name = "guard-3"
x = 800.0
y = 400.0

[[occupant]]
name = "guard-4"
x = 400.0
y = 200.0

[[wall]]
a = [1000.0, 0.0]
b = [1000.0, 350.0]

[[wall]]
a = [1000.0, 650.0]
b = [1000.0, 1000.0]
"#;

/// Gridless scene with round tokens
const GRIDLESS_CIRCLE_TOML: &str = r#"
[grid]
size = 100.0
topology = { type = "gridless" }

[config]
gridless_token_shape = "circle"

[[occupant]]
name = "archer"
x = 0.0
y = 0.0

[[occupant]]
name = "behemoth"
x = 1500.0
y = 0.0
size = "gargantuan"

[[occupant]]
name = "wolf"
x = 700.0
y = 100.0
"#;

fn bench_pair(c: &mut Criterion, label: &str, toml: &str, attacker: &str, target: &str) {
    let scenario = Scenario::from_toml_str(toml).unwrap();
    let ctx = scenario.context();
    let walls = scenario.wall_set();
    let occluders = scenario.occluders(&ctx);
    let engine = CoverEngine::new(&ctx, &walls, &occluders);
    let attacker = scenario.occupant(attacker).unwrap();
    let target = scenario.occupant(target).unwrap();

    c.bench_function(label, |b| {
        b.iter(|| engine.evaluate_cover(attacker, target, CoverOptions::default()));
    });
}

fn bench_crowded_square(c: &mut Criterion) {
    bench_pair(c, "cover_crowded_square", CROWDED_SQUARE_TOML, "giant", "dragon");
}

fn bench_gridless_circle(c: &mut Criterion) {
    bench_pair(c, "cover_gridless_circle", GRIDLESS_CIRCLE_TOML, "archer", "behemoth");
}

fn bench_occluder_build(c: &mut Criterion) {
    let scenario = Scenario::from_toml_str(CROWDED_SQUARE_TOML).unwrap();
    let ctx = scenario.context();
    c.bench_function("occluder_map_build", |b| {
        b.iter(|| OccluderMap::build(&ctx, &scenario.occupants));
    });
}

fn bench_all_targets(c: &mut Criterion) {
    let scenario = Scenario::from_toml_str(CROWDED_SQUARE_TOML).unwrap();
    let ctx = scenario.context();
    let walls = scenario.wall_set();
    let occluders = scenario.occluders(&ctx);
    let engine = CoverEngine::new(&ctx, &walls, &occluders);
    let attacker = scenario.occupant("giant").unwrap();
    c.bench_function("cover_all_targets", |b| {
        b.iter(|| engine.evaluate_targets(attacker, &scenario.occupants, CoverOptions::default()));
    });
}

criterion_group!(
    benches,
    bench_crowded_square,
    bench_gridless_circle,
    bench_occluder_build,
    bench_all_targets
);
criterion_main!(benches);
