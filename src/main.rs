//! Loan Pricing CLI
//!
//! Loads a loan cohort and write-off table, runs the APR optimization, and
//! writes the cohort back out with an `optimum_apr` column. Optionally dumps
//! convergence diagnostics as JSON.

use anyhow::{bail, Context};
use clap::Parser;
use loan_pricing::{
    optimizer::NelderMeadOptions, CohortSimulator, LinearBooking, PricingOptimizer, RateBounds,
    WriteOffTable,
};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "loan_pricing", about = "Optimize per-loan APRs for a cohort")]
struct Args {
    /// Cohort CSV (columns: amount,term,score,apr)
    #[arg(long, default_value = "data/loans.csv")]
    cohort: PathBuf,

    /// Write-off CSV (one column per score, one row per period)
    #[arg(long, default_value = "data/write_off.csv")]
    write_offs: PathBuf,

    /// Minimum allowed APR, applied to every loan
    #[arg(long, default_value_t = 0.145)]
    lower: f64,

    /// Maximum allowed APR, applied to every loan
    #[arg(long, default_value_t = 0.355)]
    upper: f64,

    /// Optimizer iteration budget
    #[arg(long, default_value_t = 10_000)]
    max_iterations: usize,

    /// Convergence tolerance on the objective spread
    #[arg(long, default_value_t = 1e-9)]
    tolerance: f64,

    /// Output CSV with the optimum_apr column attached
    #[arg(long, default_value = "priced_cohort.csv")]
    output: PathBuf,

    /// Optional JSON file for convergence diagnostics
    #[arg(long)]
    diagnostics: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunDiagnostics {
    loans: usize,
    objective_at_initial: f64,
    objective_at_optimum: f64,
    total_interest: f64,
    iterations: usize,
    objective_evaluations: usize,
    converged: bool,
    execution_time_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();

    log::info!("loading cohort from {}", args.cohort.display());
    let mut cohort = loan_pricing::cohort::load_cohort(&args.cohort)
        .map_err(|e| anyhow::anyhow!("failed to load cohort: {e}"))?;
    log::info!("loaded {} loans", cohort.len());

    let write_offs = WriteOffTable::from_csv_path(&args.write_offs)
        .map_err(|e| anyhow::anyhow!("failed to load write-off table: {e}"))?;
    log::info!("loaded {} write-off curves", write_offs.len());

    if cohort.is_empty() {
        bail!("cohort is empty, nothing to price");
    }

    let booking = LinearBooking;
    let simulator = CohortSimulator::new(&cohort, &write_offs, &booking);
    simulator.validate().context("cohort failed validation")?;

    let initial = simulator.initial_aprs();
    let bounds = RateBounds::uniform(args.lower, args.upper, cohort.len())?;
    let objective_at_initial = simulator.evaluate(&initial)?;

    let optimizer = PricingOptimizer::new(NelderMeadOptions {
        max_iterations: args.max_iterations,
        tolerance: args.tolerance,
        ..Default::default()
    });

    log::info!("running optimization over {} loans", cohort.len());
    let opt_start = Instant::now();
    let outcome = optimizer.optimize(&simulator, &initial, &bounds)?;
    let elapsed = opt_start.elapsed();

    println!(
        "Optimization {} in {:?} ({} iterations, {} evaluations)",
        if outcome.convergence.converged {
            "converged"
        } else {
            "did NOT converge"
        },
        elapsed,
        outcome.convergence.iterations,
        outcome.convergence.objective_evaluations,
    );
    println!(
        "Cohort interest income: {:.2} (was {:.2} at quoted rates)",
        -outcome.objective, -objective_at_initial
    );

    // Attach the optimum back onto the cohort records
    for (loan, &apr) in cohort.iter_mut().zip(&outcome.optimum_apr) {
        loan.optimum_apr = Some(apr);
    }

    let mut file = File::create(&args.output)
        .with_context(|| format!("unable to create {}", args.output.display()))?;
    writeln!(file, "amount,term,score,apr,optimum_apr")?;
    for loan in &cohort {
        writeln!(
            file,
            "{},{},{},{},{:.6}",
            loan.amount,
            loan.term,
            loan.score,
            loan.apr,
            loan.optimum_apr.unwrap_or(loan.apr),
        )?;
    }
    println!("Priced cohort written to {}", args.output.display());

    if let Some(path) = &args.diagnostics {
        let diag = RunDiagnostics {
            loans: cohort.len(),
            objective_at_initial,
            objective_at_optimum: outcome.objective,
            total_interest: -outcome.objective,
            iterations: outcome.convergence.iterations,
            objective_evaluations: outcome.convergence.objective_evaluations,
            converged: outcome.convergence.converged,
            execution_time_ms: start.elapsed().as_millis() as u64,
        };
        serde_json::to_writer_pretty(File::create(path)?, &diag)?;
        println!("Diagnostics written to {}", path.display());
    }

    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
