//! Write-off (default) curve assumptions keyed by borrower score

pub mod loader;

use std::collections::HashMap;
use std::path::Path;

/// Per-period default rates for one score category, indexed by period.
/// Index 0 is the pre-disbursement anchor period.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOffCurve {
    rates: Vec<f64>,
}

impl WriteOffCurve {
    /// Build a curve, checking every rate lies in [0, 1]
    pub fn new(rates: Vec<f64>) -> Result<Self, String> {
        for (period, &rate) in rates.iter().enumerate() {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!(
                    "write-off rate at period {} out of [0, 1]: {}",
                    period, rate
                ));
            }
        }
        Ok(Self { rates })
    }

    /// Flat curve, handy for tests and no-default baselines
    pub fn flat(rate: f64, periods: usize) -> Result<Self, String> {
        Self::new(vec![rate; periods])
    }

    /// Number of periods the curve covers
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Default rate for a given period
    #[inline]
    pub fn rate(&self, period: usize) -> f64 {
        self.rates[period]
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// True when the curve covers periods 0..=term
    pub fn covers_term(&self, term: u32) -> bool {
        self.rates.len() >= term as usize + 1
    }
}

/// Container for all modelled write-off curves, one per score category.
/// Loaded once and immutable for the duration of an optimization run.
#[derive(Debug, Clone, Default)]
pub struct WriteOffTable {
    curves: HashMap<String, WriteOffCurve>,
}

impl WriteOffTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, score: impl Into<String>, curve: WriteOffCurve) {
        self.curves.insert(score.into(), curve);
    }

    /// Look up the curve for a score category
    pub fn get(&self, score: &str) -> Option<&WriteOffCurve> {
        self.curves.get(score)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Load the table from a CSV file with one column per score category
    pub fn from_csv_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        loader::load_write_off_table(path)
    }
}
