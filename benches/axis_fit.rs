use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};

use shower_axis::{
    axis_fit::{fit_axis, FitMethod, FitParams},
    display_params::DisplayParams,
    hits::{event_store::EventEntry, Hit},
    navigation::event_cache::EventCache,
};

/// Centroids of `n` layers scattered around a random axis.
fn random_centroids(rng: &mut StdRng, n: usize) -> Vec<Point3<f64>> {
    let (ax, ay) = (rng.random_range(-40.0..40.0), rng.random_range(-40.0..40.0));
    (0..n)
        .map(|l| {
            Point3::new(
                ax + rng.random_range(-3.0..3.0),
                ay + rng.random_range(-3.0..3.0),
                0.5 + 15.0 * l as f64,
            )
        })
        .collect()
}

/// Full event: `hits_per_layer` Gaussian hits in each of the 15 slabs.
fn random_event(rng: &mut StdRng, hits_per_layer: usize) -> Vec<Hit> {
    let x = Normal::new(rng.random_range(-40.0..40.0), 6.0).unwrap();
    let y = Normal::new(rng.random_range(-40.0..40.0), 6.0).unwrap();
    let e = Exp::new(1.0).unwrap();

    (0..15)
        .flat_map(|layer| {
            (0..hits_per_layer)
                .map(|_| {
                    Hit::new(
                        x.sample(rng),
                        y.sample(rng),
                        0.5 + 15.0 * layer as f64,
                        layer,
                        e.sample(rng),
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Closed form against the iterative solver on the same centroids.
fn bench_fit_methods(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let samples = 1_000usize;

    let closed = FitParams::default();
    let newton = FitParams::builder()
        .method(FitMethod::Newton)
        .build()
        .unwrap();

    for (name, params) in [("closed_form", closed), ("newton", newton)] {
        c.bench_function(&format!("axis_fit/{name}/15_layers"), |b| {
            b.iter_batched(
                || {
                    // Pre-generate inputs to avoid RNG cost in the timed section
                    (0..samples)
                        .map(|_| random_centroids(&mut rng, 15))
                        .collect::<Vec<_>>()
                },
                |cases| {
                    for centroids in cases {
                        black_box(fit_axis(black_box(&centroids), &params));
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }
}

/// Complete per-event recomputation, as done on every navigation.
fn bench_event_recompute(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);
    let params = DisplayParams::default();

    for hits_per_layer in [20usize, 200] {
        c.bench_function(
            &format!("event_cache/compute/{hits_per_layer}_hits_per_layer"),
            |b| {
                b.iter_batched(
                    || EventEntry::from_hits(random_event(&mut rng, hits_per_layer)),
                    |entry| black_box(EventCache::compute(0, entry, &params).unwrap()),
                    BatchSize::SmallInput,
                )
            },
        );
    }
}

criterion_group!(benches, bench_fit_methods, bench_event_recompute);
criterion_main!(benches);
