//! Loan amortization simulation and the cohort-level objective

mod engine;
mod simulator;
mod trajectory;

pub use engine::AmortizationEngine;
pub use simulator::CohortSimulator;
pub use trajectory::{BalanceTrajectory, CohortResult, LoanSimulation};
