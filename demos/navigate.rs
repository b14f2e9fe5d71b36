//! Interactive browsing of synthetic calorimeter events in the terminal.
//!
//! Usage:
//!   cargo run --example navigate [-- <N_EVENTS>]
//!
//! Commands: `n` (Next), `p` (Prev), `g` (Go To), `q` (quit).
//! Set `RUST_LOG=debug` to see per-layer centroids and the fit summary.
use std::env;
use std::io::{BufRead, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};
use tracing_subscriber::EnvFilter;

use shower_axis::{
    axis_scan::scan_events,
    hits::{event_store::InMemoryEventStore, Hit},
    navigation::{
        event_cache::EventCache,
        prompt::StdinPrompt,
        render::{RenderSink, Scene},
    },
    DisplayParams, NavCommand, NavigationController, ShowerError,
};

/// Prints every presented event on stdout.
struct TerminalRenderer;

impl RenderSink for TerminalRenderer {
    fn invalidate(&mut self) {
        println!();
    }

    fn present(&mut self, cache: &EventCache, scene: &Scene) {
        println!("{cache:#}");
        let overlay = match &scene.beam_line {
            Some(line) => format!(
                "{} points from z = {} to z = {}",
                line.polyline().len(),
                line.start.z,
                line.end.z
            ),
            None => "none".to_string(),
        };
        println!(
            "{} hit boxes ({} saturated), axis overlay: {overlay}",
            scene.len(),
            scene.saturated_count(),
        );
    }
}

/// Random electromagnetic-like showers; every fifth event is left empty.
fn synthetic_events(n_events: usize) -> Vec<Vec<Hit>> {
    let mut rng = StdRng::seed_from_u64(42_u64);
    let energy = Exp::new(0.5).unwrap();

    (0..n_events)
        .map(|ev| {
            if ev % 5 == 4 {
                return Vec::new();
            }
            let x = Normal::new(rng.random_range(-50.0..50.0), 5.0).unwrap();
            let y = Normal::new(rng.random_range(-50.0..50.0), 5.0).unwrap();
            let start = rng.random_range(0..5);
            let stop = rng.random_range(start + 1..15);
            (start..stop)
                .flat_map(|layer| {
                    let n = rng.random_range(3..40);
                    (0..n)
                        .map(|_| {
                            Hit::new(
                                x.sample(&mut rng),
                                y.sample(&mut rng),
                                0.5 + 15.0 * layer as f64,
                                layer,
                                energy.sample(&mut rng),
                            )
                            .with_readout(rng.random_range(0..30), 0, 0, 0)
                        })
                        .collect::<Vec<_>>()
                })
                .collect()
        })
        .collect()
}

fn read_command<R: BufRead, W: Write>(
    prompt: &mut StdinPrompt<R, W>,
) -> Result<Option<NavCommand>, ShowerError> {
    loop {
        match prompt.read_line("[n]ext [p]rev [g]o to [q]uit > ")? {
            None | Some("q") => return Ok(None),
            Some("n") => return Ok(Some(NavCommand::Next)),
            Some("p") => return Ok(Some(NavCommand::Prev)),
            Some("g") => return Ok(Some(NavCommand::GoTo)),
            Some(_) => {}
        }
    }
}

fn main() -> Result<(), ShowerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let n_events = env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);

    let params = DisplayParams::default();
    println!("{params:#}");

    let store = InMemoryEventStore::new(synthetic_events(n_events));
    println!("{}", scan_events(&store, &params).summary());

    let mut nav = NavigationController::with_renderer(store, params, TerminalRenderer);
    let mut prompt = StdinPrompt::stdio();

    // failures are logged by the controller and leave the display unchanged
    let _ = nav.start();
    while let Some(command) = read_command(&mut prompt)? {
        let _ = nav.dispatch(command, &mut prompt);
    }
    Ok(())
}
