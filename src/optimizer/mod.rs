//! Pricing optimizer: revenue-maximizing APR search under per-loan bounds

mod bounds;
mod nelder_mead;

pub use bounds::RateBounds;
pub use nelder_mead::{ConvergenceInfo, NelderMeadOptions, TerminationReason};

use crate::error::PricingError;
use crate::simulation::CohortSimulator;
use log::{debug, warn};

/// Outcome of a pricing run
#[derive(Debug, Clone)]
pub struct PricingOutcome {
    /// Revenue-maximizing APR vector, in cohort order
    pub optimum_apr: Vec<f64>,
    /// Final objective value (negated cohort interest)
    pub objective: f64,
    pub convergence: ConvergenceInfo,
}

/// Wraps the cohort simulator as a minimization objective and runs the
/// bound-constrained direct search. Maximizing interest income is expressed
/// as minimizing its negative, which `CohortSimulator::evaluate` already
/// returns.
pub struct PricingOptimizer {
    options: NelderMeadOptions,
}

impl PricingOptimizer {
    pub fn new(options: NelderMeadOptions) -> Self {
        Self { options }
    }

    /// Optimize the APR vector for a validated cohort.
    ///
    /// The initial guess must lie inside its bounds; the cohort is
    /// re-validated here so a malformed loan aborts before the search
    /// starts. Budget exhaustion still returns the best vector found, with
    /// `converged = false` in the diagnostics.
    pub fn optimize(
        &self,
        simulator: &CohortSimulator,
        initial: &[f64],
        bounds: &RateBounds,
    ) -> Result<PricingOutcome, PricingError> {
        if bounds.dimension() != simulator.cohort_size() {
            return Err(PricingError::BoundsViolation(format!(
                "bounds cover {} loans, cohort has {}",
                bounds.dimension(),
                simulator.cohort_size()
            )));
        }
        bounds.check_initial(initial)?;
        simulator.validate()?;

        let start_objective = simulator.evaluate(initial)?;
        debug!("objective at initial guess: {:.6}", start_objective);

        let result = nelder_mead::nelder_mead(initial, bounds, self.options, |aprs| {
            simulator.evaluate(aprs)
        })?;

        if !result.convergence.converged {
            warn!(
                "optimizer exhausted {} iterations without meeting tolerance (best objective {:.6})",
                result.convergence.iterations, result.objective
            );
        } else {
            debug!(
                "converged after {} iterations / {} evaluations",
                result.convergence.iterations, result.convergence.objective_evaluations
            );
        }

        Ok(PricingOutcome {
            optimum_apr: result.x,
            objective: result.objective,
            convergence: result.convergence,
        })
    }
}

impl Default for PricingOptimizer {
    fn default() -> Self {
        Self::new(NelderMeadOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{WriteOffCurve, WriteOffTable};
    use crate::booking::LinearBooking;
    use crate::cohort::Loan;

    fn zero_write_offs() -> WriteOffTable {
        let mut table = WriteOffTable::new();
        table.insert("good", WriteOffCurve::flat(0.0, 13).unwrap());
        table.insert("bad", WriteOffCurve::flat(0.0, 13).unwrap());
        table
    }

    #[test]
    fn test_end_to_end_two_loan_cohort() {
        let cohort = vec![
            Loan::new(1000.0, 12, "good", 0.20),
            Loan::new(2000.0, 6, "bad", 0.20),
        ];
        let table = zero_write_offs();
        let booking = LinearBooking;
        let simulator = CohortSimulator::new(&cohort, &table, &booking);

        let initial = vec![0.20, 0.20];
        let bounds = RateBounds::uniform(0.145, 0.355, 2).unwrap();

        let start = simulator.evaluate(&initial).unwrap();
        assert!(start < 0.0);

        let outcome = PricingOptimizer::default()
            .optimize(&simulator, &initial, &bounds)
            .unwrap();

        // Never worse than the starting guess, and inside the box
        assert!(outcome.objective <= start);
        for (i, &apr) in outcome.optimum_apr.iter().enumerate() {
            assert!(apr >= bounds.lower[i] && apr <= bounds.upper[i]);
        }
    }

    #[test]
    fn test_rejects_initial_guess_outside_bounds() {
        let cohort = vec![Loan::new(1000.0, 12, "good", 0.10)];
        let table = zero_write_offs();
        let booking = LinearBooking;
        let simulator = CohortSimulator::new(&cohort, &table, &booking);

        let bounds = RateBounds::uniform(0.145, 0.355, 1).unwrap();
        let err = PricingOptimizer::default()
            .optimize(&simulator, &[0.10], &bounds)
            .unwrap_err();

        assert!(matches!(err, PricingError::BoundsViolation(_)));
    }

    #[test]
    fn test_malformed_cohort_aborts_before_search() {
        let cohort = vec![Loan::new(-1000.0, 12, "good", 0.20)];
        let table = zero_write_offs();
        let booking = LinearBooking;
        let simulator = CohortSimulator::new(&cohort, &table, &booking);

        let bounds = RateBounds::uniform(0.145, 0.355, 1).unwrap();
        let err = PricingOptimizer::default()
            .optimize(&simulator, &[0.20], &bounds)
            .unwrap_err();

        assert!(matches!(err, PricingError::InvalidLoan { .. }));
    }

    #[test]
    fn test_budget_exhaustion_reports_unconverged() {
        let cohort = vec![
            Loan::new(1000.0, 12, "good", 0.20),
            Loan::new(2000.0, 6, "bad", 0.30),
        ];
        let table = zero_write_offs();
        let booking = LinearBooking;
        let simulator = CohortSimulator::new(&cohort, &table, &booking);

        let bounds = RateBounds::uniform(0.145, 0.355, 2).unwrap();
        let optimizer = PricingOptimizer::new(NelderMeadOptions {
            max_iterations: 1,
            ..Default::default()
        });

        let outcome = optimizer
            .optimize(&simulator, &[0.20, 0.30], &bounds)
            .unwrap();

        assert!(!outcome.convergence.converged);
        assert_eq!(outcome.convergence.reason, TerminationReason::MaxIterations);
        assert_eq!(outcome.optimum_apr.len(), 2);
    }
}
