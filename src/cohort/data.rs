//! Loan data structures matching the cohort CSV format

use serde::{Deserialize, Serialize};

/// A single loan record from the pricing cohort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Principal amount disbursed at period 1
    pub amount: f64,

    /// Contractual term in months
    pub term: u32,

    /// Borrower score category, keys into the write-off table
    pub score: String,

    /// Offered APR; during optimization this is only the starting guess
    pub apr: f64,

    /// Revenue-maximizing APR, attached after optimization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimum_apr: Option<f64>,
}

impl Loan {
    pub fn new(amount: f64, term: u32, score: impl Into<String>, apr: f64) -> Self {
        Self {
            amount,
            term,
            score: score.into(),
            apr,
            optimum_apr: None,
        }
    }

    /// Validate the standalone loan invariants (amount > 0, term >= 1).
    /// Curve coverage is checked against the write-off table by the
    /// simulator, which knows both sides.
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(format!("amount must be positive, got {}", self.amount));
        }
        if self.term < 1 {
            return Err("term must be at least 1 month".to_string());
        }
        Ok(())
    }
}
