//! Compares every regression variant on a synthetic housing table.
//!
//! Run with `RUST_LOG=info cargo run --example compare`, or pass the path of
//! a headered numeric CSV and the name of its target column.

use std::error::Error;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

use regeval::datasets::{CsvProvider, InMemoryProvider, Table};
use regeval::pipeline::ComparisonParams;

fn synthetic_housing(n_rows: usize) -> Result<Table, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(0);
    let noise = Normal::new(0., 15.)?;
    let rooms = Uniform::new(1., 8.);
    let area = Uniform::new(30., 250.);
    let age = Uniform::new(0., 90.);

    let mut columns = vec![
        ("Rooms".to_string(), Vec::with_capacity(n_rows)),
        ("Area".to_string(), Vec::with_capacity(n_rows)),
        ("Age".to_string(), Vec::with_capacity(n_rows)),
        ("Estimate".to_string(), Vec::with_capacity(n_rows)),
        ("Distance".to_string(), Vec::with_capacity(n_rows)),
        ("SalePrice".to_string(), Vec::with_capacity(n_rows)),
    ];
    for _ in 0..n_rows {
        let r: f64 = rooms.sample(&mut rng);
        let a: f64 = area.sample(&mut rng);
        let g: f64 = age.sample(&mut rng);
        let d: f64 = 1. + 20. * Uniform::new(0., 1.).sample(&mut rng);
        let estimate = 1.8 * a + 10. * r + noise.sample(&mut rng);
        let price = 2. * a + 12. * r - 0.5 * g - 3. * d.ln() * d + noise.sample(&mut rng);
        for (column, value) in columns.iter_mut().zip([r, a, g, estimate, d, price]) {
            column.1.push(value);
        }
    }
    Ok(Table::new(columns, "SalePrice")?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let params = ComparisonParams::new();

    // A CSV of unknown layout falls back to its first feature column for the
    // single-feature regime.
    let report = match args.as_slice() {
        [_, path, target] => params.run_with_provider(&CsvProvider::new(path, target))?,
        _ => params
            .simple_feature("Estimate")
            .run_with_provider(&InMemoryProvider::new(synthetic_housing(200)?))?,
    };
    println!("{}", report);
    Ok(())
}
