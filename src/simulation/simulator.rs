//! Cohort simulator: the optimizer's objective function
//!
//! Holds references to the immutable cohort, write-off table, and booking
//! model, and evaluates candidate APR vectors. Each evaluation recomputes
//! every trajectory from scratch; the simulator carries no state between
//! calls, which the optimizer's black-box sampling depends on.

use crate::assumptions::WriteOffTable;
use crate::booking::BookingModel;
use crate::cohort::Loan;
use crate::error::PricingError;
use rayon::prelude::*;
use super::engine::AmortizationEngine;
use super::trajectory::{CohortResult, LoanSimulation};

pub struct CohortSimulator<'a> {
    cohort: &'a [Loan],
    write_offs: &'a WriteOffTable,
    booking: &'a dyn BookingModel,
    engine: AmortizationEngine,
}

impl<'a> CohortSimulator<'a> {
    pub fn new(
        cohort: &'a [Loan],
        write_offs: &'a WriteOffTable,
        booking: &'a dyn BookingModel,
    ) -> Self {
        Self {
            cohort,
            write_offs,
            booking,
            engine: AmortizationEngine::new(),
        }
    }

    pub fn cohort_size(&self) -> usize {
        self.cohort.len()
    }

    /// Starting APR vector taken from the cohort's quoted rates
    pub fn initial_aprs(&self) -> Vec<f64> {
        self.cohort.iter().map(|loan| loan.apr).collect()
    }

    /// Pre-flight validation of the whole cohort against the write-off
    /// table. Run once before optimization so evaluation-time failures are
    /// limited to APR-driven degeneracies.
    pub fn validate(&self) -> Result<(), PricingError> {
        for (index, loan) in self.cohort.iter().enumerate() {
            loan.validate()
                .map_err(|reason| PricingError::InvalidLoan { index, reason })?;

            let curve = self.write_offs.get(&loan.score).ok_or_else(|| {
                PricingError::invalid_loan(
                    index,
                    format!("no write-off curve for score '{}'", loan.score),
                )
            })?;

            if !curve.covers_term(loan.term) {
                return Err(PricingError::invalid_loan(
                    index,
                    format!(
                        "write-off curve for score '{}' covers {} periods, term {} needs {}",
                        loan.score,
                        curve.len(),
                        loan.term,
                        loan.term + 1
                    ),
                ));
            }
        }
        Ok(())
    }

    fn simulate_loan(&self, index: usize, apr: f64) -> Result<LoanSimulation, PricingError> {
        let loan = &self.cohort[index];
        let curve = self.write_offs.get(&loan.score).ok_or_else(|| {
            PricingError::invalid_loan(index, format!("no write-off curve for score '{}'", loan.score))
        })?;

        // Interest income scales with the amount actually expected to book
        let booking_prob = self.booking.probability(apr);
        let effective_amount = loan.amount * booking_prob;

        self.engine
            .simulate(effective_amount, loan.term, apr, curve)
            .map_err(|err| match err {
                // Engine validation doesn't know the cohort position
                PricingError::InvalidLoan { reason, .. } => PricingError::InvalidLoan { index, reason },
                other => other,
            })
    }

    /// Objective evaluation: negated cohort-wide interest at the candidate
    /// APR vector.
    ///
    /// Serial, deterministic accumulation — repeated calls with the same
    /// vector return the same scalar bit-for-bit, which the optimizer's
    /// cross-candidate comparisons require.
    pub fn evaluate(&self, aprs: &[f64]) -> Result<f64, PricingError> {
        self.check_dimension(aprs)?;

        let mut total = 0.0;
        for index in 0..self.cohort.len() {
            total += self.simulate_loan(index, aprs[index])?.total_interest;
        }
        Ok(-total)
    }

    /// Full cohort simulation retaining every trajectory, for reporting
    /// after optimization. Loans are independent, so this runs per-loan in
    /// parallel; the objective path stays serial.
    pub fn simulate(&self, aprs: &[f64]) -> Result<CohortResult, PricingError> {
        self.check_dimension(aprs)?;

        let loans: Vec<LoanSimulation> = (0..self.cohort.len())
            .into_par_iter()
            .map(|index| self.simulate_loan(index, aprs[index]))
            .collect::<Result<_, _>>()?;

        Ok(CohortResult::from_loans(loans))
    }

    fn check_dimension(&self, aprs: &[f64]) -> Result<(), PricingError> {
        if aprs.len() != self.cohort.len() {
            return Err(PricingError::DimensionMismatch {
                expected: self.cohort.len(),
                actual: aprs.len(),
            });
        }
        Ok(())
    }
}
