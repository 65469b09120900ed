//! Trajectory output structures for loan simulations

use serde::{Deserialize, Serialize};

/// Month-by-month balance and interest profile for one loan.
///
/// All three sequences have length `term + 1`. Period 0 is the
/// pre-disbursement anchor: no interest accrues and `balance_start[0] = 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceTrajectory {
    /// Principal balance at the start of each period
    pub balance_start: Vec<f64>,

    /// Interest accrued during each period
    pub interest_accrued: Vec<f64>,

    /// Balance at the end of each period, after interest accrual,
    /// contractual repayment, and write-off
    pub balance_end: Vec<f64>,
}

impl BalanceTrajectory {
    /// Pre-allocate for a loan with the given term
    pub fn with_term(term: u32) -> Self {
        let periods = term as usize + 1;
        Self {
            balance_start: Vec::with_capacity(periods),
            interest_accrued: Vec::with_capacity(periods),
            balance_end: Vec::with_capacity(periods),
        }
    }

    /// Number of periods recorded (term + 1 once simulation completes)
    pub fn periods(&self) -> usize {
        self.balance_start.len()
    }

    pub fn push(&mut self, balance_start: f64, interest: f64, balance_end: f64) {
        self.balance_start.push(balance_start);
        self.interest_accrued.push(interest);
        self.balance_end.push(balance_end);
    }

    /// Total interest accrued over the loan's life
    pub fn total_interest(&self) -> f64 {
        self.interest_accrued.iter().sum()
    }
}

/// Result of simulating a single loan at a candidate APR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSimulation {
    /// Booking-adjusted principal actually simulated
    pub effective_amount: f64,

    /// APR the loan was simulated at
    pub apr: f64,

    /// Effective monthly rate derived from the APR
    pub monthly_rate: f64,

    /// Fixed contractual monthly repayment
    pub monthly_repayment: f64,

    /// Full month-by-month profile
    pub trajectory: BalanceTrajectory,

    /// Sum of interest accrued across all periods
    pub total_interest: f64,
}

/// Cohort-wide simulation output at one candidate APR vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortResult {
    /// Per-loan simulations, in cohort order
    pub loans: Vec<LoanSimulation>,

    /// Negated sum of all loans' interest. Negative so a minimizer of this
    /// value maximizes income; the sign convention is load-bearing.
    pub total_interest: f64,
}

impl CohortResult {
    pub fn from_loans(loans: Vec<LoanSimulation>) -> Self {
        let total: f64 = loans.iter().map(|l| l.total_interest).sum();
        Self {
            loans,
            total_interest: -total,
        }
    }
}
