use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zmap_core::{
    BumpContext, BumpMode, ColumnStyle, CompressionScope, FeatureInterval, FeatureSet, IntervalIndex,
    NoopListener, Span,
};

/// Alignment-like column: short features scattered over a 1Mb region.
fn generate_column(count: usize, seed: u64) -> FeatureSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut set = FeatureSet::new("bench", ColumnStyle::default());
    set.add_features((0..count).map(|_| {
        let start = rng.gen_range(1..1_000_000u64);
        let len = rng.gen_range(50..2_000u64);
        FeatureInterval::new(start, start + len, 8.0).unwrap()
    }));
    set
}

fn bench_pack_by_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_by_overlap");

    for &count in &[1_000usize, 10_000, 100_000] {
        let template = generate_column(count, 42);
        group.bench_with_input(BenchmarkId::from_parameter(count), &template, |b, template| {
            let mut ctx = BumpContext::default();
            ctx.settings.max_window = f64::MAX;
            b.iter(|| {
                let mut set = template.clone();
                let outcome = set
                    .bump(&mut ctx, BumpMode::PackByOverlap, CompressionScope::WholeSequence, &mut NoopListener)
                    .unwrap();
                black_box(outcome)
            })
        });
    }

    group.finish();
}

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("modes_10k");
    let mut template = generate_column(10_000, 7);
    template.ensure_index();

    for mode in BumpMode::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(mode), &mode, |b, &mode| {
            let mut ctx = BumpContext::default();
            ctx.settings.max_window = f64::MAX;
            let mut set = template.clone();
            b.iter(|| {
                let outcome = set
                    .bump(&mut ctx, mode, CompressionScope::WholeSequence, &mut NoopListener)
                    .unwrap();
                black_box(outcome)
            })
        });
    }

    group.finish();
}

fn bench_index(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let items: Vec<(Span, usize)> = (0..100_000)
        .map(|i| {
            let start = rng.gen_range(1..10_000_000u64);
            (Span::new(start, start + 500).unwrap(), i)
        })
        .collect();

    c.bench_function("index_build_100k", |b| {
        b.iter(|| black_box(IntervalIndex::build(items.iter().copied())))
    });

    let index = IntervalIndex::build(items.iter().copied());
    c.bench_function("index_find_100k", |b| {
        b.iter(|| {
            let pos = rng.gen_range(1..10_000_000u64);
            black_box(index.find_first_at_or_after(pos))
        })
    });
}

criterion_group!(benches, bench_pack_by_overlap, bench_modes, bench_index);
criterion_main!(benches);
