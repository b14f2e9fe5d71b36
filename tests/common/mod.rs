#![allow(dead_code)]

use std::ops::Range;

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};

use shower_axis::hits::{event_store::InMemoryEventStore, Hit};

pub const PITCH: f64 = 15.0;
pub const FIRST_Z: f64 = 0.5;

pub fn layer_z(layer: usize) -> f64 {
    FIRST_Z + PITCH * layer as f64
}

/// Gaussian shower around a fixed lateral axis.
///
/// Every layer of `layers` receives `hits_per_layer` hits, laterally spread with standard
/// deviation `spread` around `axis`, with exponentially distributed energies of mean 1.
pub fn gaussian_shower(
    rng: &mut StdRng,
    axis: (f64, f64),
    spread: f64,
    hits_per_layer: usize,
    layers: Range<usize>,
) -> Vec<Hit> {
    let x = Normal::new(axis.0, spread).unwrap();
    let y = Normal::new(axis.1, spread).unwrap();
    let energy = Exp::new(1.0).unwrap();

    layers
        .flat_map(|layer| {
            (0..hits_per_layer)
                .map(|_| {
                    Hit::new(
                        x.sample(rng),
                        y.sample(rng),
                        layer_z(layer),
                        layer,
                        energy.sample(rng) + 1e-3,
                    )
                    .with_readout(rng.random_range(0..2000), 0, 0, 0)
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// `n` hits of identical energy `energy` scattered uniformly over the sensor of `layer`.
pub fn uniform_layer(rng: &mut StdRng, layer: usize, n: usize, energy: f64) -> Vec<Hit> {
    (0..n)
        .map(|_| {
            Hit::new(
                rng.random_range(-90.0..90.0),
                rng.random_range(-90.0..90.0),
                layer_z(layer),
                layer,
                energy,
            )
        })
        .collect()
}

/// Twelve unit-energy hits symmetric around `(cx, cy)`, so that the layer centroid is exact.
pub fn cross_cluster(layer: usize, cx: f64, cy: f64) -> Vec<Hit> {
    const OFFSETS: [(f64, f64); 12] = [
        (-2.0, 0.0),
        (-1.0, 0.0),
        (1.0, 0.0),
        (2.0, 0.0),
        (0.0, -2.0),
        (0.0, -1.0),
        (0.0, 1.0),
        (0.0, 2.0),
        (-1.0, -1.0),
        (1.0, 1.0),
        (-1.0, 1.0),
        (1.0, -1.0),
    ];
    OFFSETS
        .iter()
        .map(|(dx, dy)| Hit::new(cx + dx, cy + dy, layer_z(layer), layer, 1.0))
        .collect()
}

/// Event with three valid layers centred on `(10, 10)`, `(10, 10)` and `(12, 8)`.
pub fn reference_event() -> Vec<Hit> {
    let mut hits = cross_cluster(0, 10.0, 10.0);
    hits.extend(cross_cluster(1, 10.0, 10.0));
    hits.extend(cross_cluster(2, 12.0, 8.0));
    hits
}

/// Store of five events: three showers, one empty entry at index 2, and one event with a
/// single valid layer at index 4.
pub fn mixed_store() -> InMemoryEventStore {
    let mut axis_a = cross_cluster(3, -20.0, 15.0);
    axis_a.extend(cross_cluster(4, -20.0, 15.0));

    let mut axis_b = cross_cluster(6, 40.0, -5.0);
    axis_b.extend(cross_cluster(7, 40.0, -5.0));
    axis_b.extend(cross_cluster(8, 40.0, -5.0));

    InMemoryEventStore::new(vec![
        reference_event(),
        axis_a,
        vec![],
        axis_b,
        cross_cluster(5, 0.0, 0.0),
    ])
}
