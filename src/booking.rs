//! Booking probability models
//!
//! The probability that an offered rate actually books a loan. The trait is
//! the seam where a data-driven model plugs in without touching the
//! simulator.

/// Maps an offered APR to an expected booking probability
pub trait BookingModel: Sync {
    fn probability(&self, apr: f64) -> f64;
}

/// Faux placeholder model: `1 - apr`. Not calibrated to anything and not
/// clamped to [0, 1] — pathological APRs produce out-of-range values, a
/// known limitation that stands until a fitted model replaces this.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearBooking;

impl BookingModel for LinearBooking {
    #[inline]
    fn probability(&self, apr: f64) -> f64 {
        1.0 - apr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_booking() {
        let model = LinearBooking;
        assert_relative_eq!(model.probability(0.20), 0.80);
        assert_relative_eq!(model.probability(0.355), 0.645);
    }

    #[test]
    fn test_placeholder_is_not_clamped() {
        let model = LinearBooking;
        assert!(model.probability(1.5) < 0.0);
        assert!(model.probability(-0.5) > 1.0);
    }
}
