// 平衡计算器与品质因子基准

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use winemaker::vineyard::{Aspect, Country, GrapeVariety, Overgrowth, Vineyard};
use winemaker::wine::{calculate_wine_balance, WineCharacteristics, BASE_BALANCED_RANGES, RANGE_ADJUSTMENTS, RULES};

fn sample_characteristics(count: usize) -> Vec<WineCharacteristics> {
    let mut rng = StdRng::seed_from_u64(2024);
    (0..count)
        .map(|_| WineCharacteristics::from_fn(|_| rng.gen_range(0.0..=1.0)))
        .collect()
}

fn bench_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("wine_balance");
    for count in [1usize, 100, 1000] {
        let samples = sample_characteristics(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &samples, |b, samples| {
            b.iter(|| {
                for characteristics in samples {
                    black_box(calculate_wine_balance(
                        black_box(characteristics),
                        &BASE_BALANCED_RANGES,
                        &RANGE_ADJUSTMENTS,
                        &RULES,
                    ));
                }
            })
        });
    }
    group.finish();
}

fn bench_vineyard_quality(c: &mut Criterion) {
    let vineyard = Vineyard {
        id: "bench".to_string(),
        name: "Bench Estate".to_string(),
        country: Country::Italy,
        region: "Piedmont".to_string(),
        altitude: 400.0,
        aspect: Aspect::South,
        hectares: 8.0,
        density: 4500.0,
        land_value: 600_000.0,
        grape: Some(GrapeVariety::Barbera),
        vine_age: Some(25.0),
        vineyard_prestige: 0.5,
        overgrowth: Overgrowth::default(),
    };

    c.bench_function("vineyard_grape_quality", |b| {
        b.iter(|| winemaker::get_vineyard_grape_quality_factors(black_box(&vineyard)))
    });
    c.bench_function("vineyard_prestige", |b| {
        b.iter(|| winemaker::bounded_vineyard_prestige_factor(black_box(&vineyard), black_box(120.0)))
    });
}

criterion_group!(benches, bench_balance, bench_vineyard_quality);
criterion_main!(benches);
