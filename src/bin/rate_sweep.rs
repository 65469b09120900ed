//! Sweep a uniform APR across the whole cohort and report the objective
//!
//! Sanity-check surface for the optimizer: evaluates cohort interest income
//! at each grid point in parallel so the shape of the objective is visible
//! before trusting a multivariate search result.

use anyhow::Context;
use clap::Parser;
use loan_pricing::{CohortSimulator, LinearBooking, WriteOffTable};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "rate_sweep", about = "Evaluate cohort income over a uniform APR grid")]
struct Args {
    /// Cohort CSV (columns: amount,term,score,apr)
    #[arg(long, default_value = "data/loans.csv")]
    cohort: PathBuf,

    /// Write-off CSV (one column per score, one row per period)
    #[arg(long, default_value = "data/write_off.csv")]
    write_offs: PathBuf,

    #[arg(long, default_value_t = 0.145)]
    lower: f64,

    #[arg(long, default_value_t = 0.355)]
    upper: f64,

    /// Number of grid points between lower and upper inclusive
    #[arg(long, default_value_t = 43)]
    points: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    anyhow::ensure!(args.points >= 2, "need at least 2 grid points");
    anyhow::ensure!(args.lower < args.upper, "lower must be below upper");

    let cohort = loan_pricing::cohort::load_cohort(&args.cohort)
        .map_err(|e| anyhow::anyhow!("failed to load cohort: {e}"))?;
    let write_offs = WriteOffTable::from_csv_path(&args.write_offs)
        .map_err(|e| anyhow::anyhow!("failed to load write-off table: {e}"))?;

    let booking = LinearBooking;
    let simulator = CohortSimulator::new(&cohort, &write_offs, &booking);
    simulator.validate().context("cohort failed validation")?;

    let step = (args.upper - args.lower) / (args.points - 1) as f64;
    let grid: Vec<f64> = (0..args.points).map(|i| args.lower + step * i as f64).collect();

    let start = Instant::now();
    let incomes: Vec<(f64, f64)> = grid
        .par_iter()
        .map(|&apr| {
            let aprs = vec![apr; cohort.len()];
            simulator.evaluate(&aprs).map(|objective| (apr, -objective))
        })
        .collect::<Result<_, _>>()?;
    println!("Swept {} points in {:?}\n", incomes.len(), start.elapsed());

    println!("{:>8} {:>16}", "APR", "Interest");
    for (apr, income) in &incomes {
        println!("{:>8.4} {:>16.2}", apr, income);
    }

    if let Some((best_apr, best_income)) = incomes
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
    {
        println!("\nBest uniform APR: {:.4} (interest {:.2})", best_apr, best_income);
    }

    Ok(())
}
