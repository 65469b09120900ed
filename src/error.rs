//! Error taxonomy for cohort pricing
//!
//! Validation problems are raised before a loan's recurrence starts, and
//! numeric degeneracies are surfaced as typed errors instead of NaN values
//! leaking into the aggregate objective.

use thiserror::Error;

/// Errors that can occur during simulation or optimization
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A loan failed pre-simulation validation. A malformed cohort cannot be
    /// partially priced: skipping a loan would desync the APR and bounds
    /// vectors, so this aborts the whole run.
    #[error("loan {index}: {reason}")]
    InvalidLoan { index: usize, reason: String },

    /// The annuity repayment formula is undefined: the effective monthly
    /// rate is zero/near-zero or the computed repayment is non-finite.
    #[error("annuity repayment undefined at apr {apr}: monthly rate {monthly_rate}")]
    NumericDegeneracy { apr: f64, monthly_rate: f64 },

    /// Inverted bound pair, non-finite bound, or an initial guess outside
    /// its box. Rejected before any objective evaluation.
    #[error("invalid rate bounds: {0}")]
    BoundsViolation(String),

    /// APR vector length does not match the cohort.
    #[error("expected {expected} APRs, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl PricingError {
    /// Helper for loan-level validation failures
    pub fn invalid_loan(index: usize, reason: impl Into<String>) -> Self {
        PricingError::InvalidLoan {
            index,
            reason: reason.into(),
        }
    }
}
