//! Loan Pricing - cohort-level APR optimization against write-off curves
//!
//! This library provides:
//! - Month-by-month loan amortization with score-indexed write-off curves
//! - Cohort-level interest income simulation under a booking model
//! - Bound-constrained, derivative-free APR optimization
//! - CSV loading for loan cohorts and write-off tables

pub mod assumptions;
pub mod booking;
pub mod cohort;
pub mod error;
pub mod optimizer;
pub mod simulation;

// Re-export commonly used types
pub use assumptions::{WriteOffCurve, WriteOffTable};
pub use booking::{BookingModel, LinearBooking};
pub use cohort::Loan;
pub use error::PricingError;
pub use optimizer::{PricingOptimizer, PricingOutcome, RateBounds};
pub use simulation::{AmortizationEngine, CohortSimulator};
