//! Loan cohort records and CSV loading

mod data;
pub mod loader;

pub use data::Loan;
pub use loader::{load_cohort, load_cohort_from_reader};
