//! Amortization engine: monthly balance recurrence for a single loan
//!
//! Turns (amount, term, APR, write-off curve) into a full balance/interest/
//! default trajectory and a total-interest scalar. Periods 0 and 1 are
//! special-cased: the recurrence `balance_start[t] = balance_end[t-1]` has no
//! prior value before period 1, and period 0 exists only to seed a starting
//! write-off adjustment before interest begins accruing.

use crate::assumptions::WriteOffCurve;
use crate::error::PricingError;
use super::trajectory::{BalanceTrajectory, LoanSimulation};

/// Monthly rates below this make the annuity denominator numerically
/// meaningless; they are reported as degenerate rather than simulated.
const MIN_MONTHLY_RATE: f64 = 1e-12;

/// Stateless amortization engine. Every simulation recomputes the full
/// trajectory from its arguments; nothing is carried between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortizationEngine;

impl AmortizationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Effective monthly nominal rate for an annual rate, compounded down
    /// rather than naively divided by 12.
    ///
    /// Returns NaN for apr < -1; `simulate` rejects that as degenerate.
    #[inline]
    pub fn monthly_rate(apr: f64) -> f64 {
        (1.0 + apr).powf(1.0 / 12.0) - 1.0
    }

    /// Fixed monthly contractual repayment via the standard annuity formula.
    /// Undefined when the monthly rate is zero; callers must guard.
    #[inline]
    pub fn annuity_repayment(amount: f64, term: u32, monthly_rate: f64) -> f64 {
        amount * monthly_rate / (1.0 - (1.0 + monthly_rate).powi(-(term as i32)))
    }

    /// Simulate one loan's full trajectory.
    ///
    /// `apr` is whatever the optimizer proposed — possibly negative or above
    /// 1 — so degeneracy is checked here, not assumed away. Input validation
    /// (positive amount, term >= 1, curve covering term + 1 periods) runs
    /// before the recurrence starts so a malformed loan never produces a
    /// partial trajectory.
    ///
    /// Period 0 applies the curve's first entry as a rate against the
    /// amount: `balance_end[0] = amount * (1 - curve[0])`. Terminal balances
    /// are not forced to zero; failing to amortize is a modeling signal left
    /// to the caller.
    pub fn simulate(
        &self,
        amount: f64,
        term: u32,
        apr: f64,
        curve: &WriteOffCurve,
    ) -> Result<LoanSimulation, PricingError> {
        Self::validate_inputs(amount, term, curve)?;

        let monthly_rate = Self::monthly_rate(apr);
        if !monthly_rate.is_finite() || monthly_rate.abs() < MIN_MONTHLY_RATE {
            return Err(PricingError::NumericDegeneracy { apr, monthly_rate });
        }

        let repayment = Self::annuity_repayment(amount, term, monthly_rate);
        if !repayment.is_finite() {
            return Err(PricingError::NumericDegeneracy { apr, monthly_rate });
        }

        let mut trajectory = BalanceTrajectory::with_term(term);

        // Period 0: anchor, no interest accrual, rate-based write-off only
        trajectory.push(0.0, 0.0, amount * (1.0 - curve.rate(0)));

        // Period 1: first real period, seeded from the disbursed amount
        let interest_1 = monthly_rate * amount;
        let default_1 = curve.rate(1) * amount;
        trajectory.push(amount, interest_1, amount + interest_1 - repayment - default_1);

        // Periods 2..=term: balance chains off the prior period's end
        for month in 2..=term as usize {
            let balance_start = trajectory.balance_end[month - 1];
            let interest = monthly_rate * balance_start;
            let default = curve.rate(month) * balance_start;
            let balance_end = balance_start + interest - repayment - default;
            trajectory.push(balance_start, interest, balance_end);
        }

        let total_interest = trajectory.total_interest();

        Ok(LoanSimulation {
            effective_amount: amount,
            apr,
            monthly_rate,
            monthly_repayment: repayment,
            trajectory,
            total_interest,
        })
    }

    fn validate_inputs(amount: f64, term: u32, curve: &WriteOffCurve) -> Result<(), PricingError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PricingError::invalid_loan(
                0,
                format!("amount must be positive, got {}", amount),
            ));
        }
        if term < 1 {
            return Err(PricingError::invalid_loan(0, "term must be at least 1 month"));
        }
        if !curve.covers_term(term) {
            return Err(PricingError::invalid_loan(
                0,
                format!(
                    "write-off curve covers {} periods, term {} needs {}",
                    curve.len(),
                    term,
                    term + 1
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn zero_curve(periods: usize) -> WriteOffCurve {
        WriteOffCurve::flat(0.0, periods).unwrap()
    }

    #[test]
    fn test_trajectory_length_is_term_plus_one() {
        let engine = AmortizationEngine::new();
        let sim = engine.simulate(1000.0, 12, 0.20, &zero_curve(13)).unwrap();

        assert_eq!(sim.trajectory.balance_start.len(), 13);
        assert_eq!(sim.trajectory.interest_accrued.len(), 13);
        assert_eq!(sim.trajectory.balance_end.len(), 13);
    }

    #[test]
    fn test_recurrence_invariant() {
        let engine = AmortizationEngine::new();
        let curve = WriteOffCurve::flat(0.002, 25).unwrap();
        let sim = engine.simulate(5000.0, 24, 0.18, &curve).unwrap();

        let traj = &sim.trajectory;
        assert_eq!(traj.balance_start[0], 0.0);
        assert_relative_eq!(traj.balance_start[1], 5000.0);
        for t in 2..=24 {
            assert_relative_eq!(traj.balance_start[t], traj.balance_end[t - 1]);
        }
    }

    #[test]
    fn test_period_zero_write_off_is_rate_based() {
        let engine = AmortizationEngine::new();
        let curve = WriteOffCurve::new(vec![0.10, 0.0, 0.0]).unwrap();
        let sim = engine.simulate(1000.0, 2, 0.20, &curve).unwrap();

        assert_relative_eq!(sim.trajectory.balance_end[0], 900.0);
        assert_eq!(sim.trajectory.interest_accrued[0], 0.0);
    }

    #[test]
    fn test_zero_rate_is_numeric_degeneracy() {
        let engine = AmortizationEngine::new();
        // apr = 0 gives (1+0)^(1/12) - 1 = 0 exactly
        let err = engine.simulate(1000.0, 12, 0.0, &zero_curve(13)).unwrap_err();
        assert!(matches!(err, PricingError::NumericDegeneracy { .. }));
    }

    #[test]
    fn test_apr_below_minus_one_is_numeric_degeneracy() {
        let engine = AmortizationEngine::new();
        let err = engine.simulate(1000.0, 12, -1.5, &zero_curve(13)).unwrap_err();
        assert!(matches!(err, PricingError::NumericDegeneracy { .. }));
    }

    #[test]
    fn test_short_curve_rejected_before_simulation() {
        let engine = AmortizationEngine::new();
        let err = engine.simulate(1000.0, 12, 0.20, &zero_curve(12)).unwrap_err();
        assert!(matches!(err, PricingError::InvalidLoan { .. }));
    }

    #[test]
    fn test_term_one_skips_general_recurrence() {
        let engine = AmortizationEngine::new();
        let sim = engine.simulate(1000.0, 1, 0.20, &zero_curve(2)).unwrap();

        assert_eq!(sim.trajectory.periods(), 2);
        // Single repayment covers the whole balance plus one month's interest
        assert_relative_eq!(
            sim.monthly_repayment,
            1000.0 * (1.0 + sim.monthly_rate),
            epsilon = 1e-9
        );
        assert_relative_eq!(sim.trajectory.balance_end[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_write_off_amortizes_to_zero() {
        let engine = AmortizationEngine::new();
        let sim = engine.simulate(1000.0, 12, 0.20, &zero_curve(13)).unwrap();

        // With no defaults the annuity schedule retires the balance exactly
        assert_relative_eq!(*sim.trajectory.balance_end.last().unwrap(), 0.0, epsilon = 1e-8);
        assert!(sim.total_interest > 0.0);
    }

    #[test]
    fn test_higher_write_off_strictly_lowers_interest() {
        let engine = AmortizationEngine::new();
        let low = WriteOffCurve::flat(0.001, 13).unwrap();
        let high = WriteOffCurve::flat(0.010, 13).unwrap();

        let sim_low = engine.simulate(1000.0, 12, 0.20, &low).unwrap();
        let sim_high = engine.simulate(1000.0, 12, 0.20, &high).unwrap();

        assert!(sim_high.total_interest < sim_low.total_interest);
    }
}
