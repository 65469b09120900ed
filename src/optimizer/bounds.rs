//! Per-loan box constraints on the APR vector

use crate::error::PricingError;

/// Independent `lower[i] <= apr[i] <= upper[i]` constraints, one pair per
/// loan. Bounds need not be identical across loans.
#[derive(Debug, Clone, PartialEq)]
pub struct RateBounds {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl RateBounds {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, PricingError> {
        if lower.is_empty() || lower.len() != upper.len() {
            return Err(PricingError::BoundsViolation(
                "lower/upper must have the same non-zero length".to_string(),
            ));
        }
        for i in 0..lower.len() {
            if !lower[i].is_finite() || !upper[i].is_finite() || lower[i] > upper[i] {
                return Err(PricingError::BoundsViolation(format!(
                    "invalid bound pair at index {}: [{}, {}]",
                    i, lower[i], upper[i]
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// Same [lower, upper] band applied to every loan
    pub fn uniform(lower: f64, upper: f64, len: usize) -> Result<Self, PricingError> {
        Self::new(vec![lower; len], vec![upper; len])
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    /// Clamp a candidate vector into the box
    pub fn clamp(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .enumerate()
            .map(|(i, v)| v.clamp(self.lower[i], self.upper[i]))
            .collect()
    }

    /// Check an initial guess sits inside its box. Out-of-bounds starting
    /// points are rejected, not clamped.
    pub fn check_initial(&self, x: &[f64]) -> Result<(), PricingError> {
        if x.len() != self.dimension() {
            return Err(PricingError::BoundsViolation(format!(
                "initial vector has {} entries, bounds have {}",
                x.len(),
                self.dimension()
            )));
        }
        for (i, &v) in x.iter().enumerate() {
            if v < self.lower[i] || v > self.upper[i] {
                return Err(PricingError::BoundsViolation(format!(
                    "initial guess {} at index {} outside [{}, {}]",
                    v, i, self.lower[i], self.upper[i]
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_pair() {
        assert!(RateBounds::new(vec![0.3], vec![0.1]).is_err());
        assert!(RateBounds::new(vec![0.1, 0.5], vec![0.3, 0.2]).is_err());
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        assert!(RateBounds::new(vec![0.1], vec![0.3, 0.4]).is_err());
        assert!(RateBounds::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_clamp() {
        let bounds = RateBounds::uniform(0.145, 0.355, 2).unwrap();
        assert_eq!(bounds.clamp(&[0.05, 0.50]), vec![0.145, 0.355]);
        assert_eq!(bounds.clamp(&[0.20, 0.30]), vec![0.20, 0.30]);
    }

    #[test]
    fn test_check_initial() {
        let bounds = RateBounds::uniform(0.145, 0.355, 2).unwrap();
        assert!(bounds.check_initial(&[0.20, 0.20]).is_ok());
        assert!(bounds.check_initial(&[0.10, 0.20]).is_err());
        assert!(bounds.check_initial(&[0.20]).is_err());
    }
}
