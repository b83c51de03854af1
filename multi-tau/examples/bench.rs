use std::time::Instant;

use multi_tau::{correlate_columns, evaluate_all, CorrelatorConfig};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

const N_ROWS: usize = 2_000_000;
const N_COLS: usize = 8;
const SEQUENTIAL: bool = false;

/// Ornstein-Uhlenbeck-like AR(1) signal, correlation time ~ 1 / (1 - PHI).
const PHI: f64 = 0.99;

fn main() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(42);
    let columns: Vec<Vec<f64>> = (0..N_COLS)
        .map(|_| {
            let mut x = 0.0;
            (0..N_ROWS)
                .map(|_| {
                    x = PHI * x + rng.gen_range(-1.0..1.0);
                    x
                })
                .collect()
        })
        .collect();

    let config = CorrelatorConfig::default();

    println!(
        "Rows: {}  |  Columns: {}  |  Levels: {}  |  Points: {}  |  Averaging: {}",
        N_ROWS,
        N_COLS,
        config.num_levels,
        config.points_per_level,
        config.min_samples_to_average
    );
    println!("{}", "-".repeat(70));

    let t0 = Instant::now();
    let correlators = correlate_columns(&columns, &config, SEQUENTIAL, &|| {}).unwrap();
    let ingest = t0.elapsed().as_secs_f64();

    let t1 = Instant::now();
    let results = evaluate_all(&correlators, true, SEQUENTIAL);
    let evaluate = t1.elapsed().as_secs_f64();

    let per_sample = ingest / (N_ROWS * N_COLS) as f64 * 1e9;
    println!(
        "Ingest: {:.3} s  |  {:.1} ns/sample  |  Evaluate: {:.6} s",
        ingest, per_sample, evaluate
    );
    println!("Output points per column: {}", results[0].len());
}
