//! Bound-constrained Nelder-Mead simplex search
//!
//! Derivative-free: the objective is a non-smooth composition of curve
//! lookups and amortization recurrences, so no gradient is assumed. Every
//! candidate vertex is clamped into the bounds box before evaluation. The
//! objective is fallible; validation or degeneracy errors abort the search.

use crate::error::PricingError;
use serde::{Deserialize, Serialize};
use super::bounds::RateBounds;

/// Why the search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Objective spread and simplex diameter fell below tolerance
    ObjectiveTolerance,
    /// Iteration budget exhausted before tolerance was met
    MaxIterations,
}

/// Convergence metadata for an optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceInfo {
    pub iterations: usize,
    pub objective_evaluations: usize,
    pub converged: bool,
    pub reason: TerminationReason,
}

#[derive(Debug, Clone, Copy)]
pub struct NelderMeadOptions {
    pub max_iterations: usize,
    /// Initial vertex offset as a fraction of each coordinate's bound width
    pub initial_step: f64,
    pub reflection: f64,
    pub expansion: f64,
    pub contraction: f64,
    pub shrink: f64,
    pub tolerance: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            initial_step: 0.08,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            tolerance: 1e-9,
        }
    }
}

/// Best point found, its objective value, and how the search ended
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub x: Vec<f64>,
    pub objective: f64,
    pub convergence: ConvergenceInfo,
}

pub fn nelder_mead<F>(
    initial: &[f64],
    bounds: &RateBounds,
    options: NelderMeadOptions,
    mut objective_fn: F,
) -> Result<SearchResult, PricingError>
where
    F: FnMut(&[f64]) -> Result<f64, PricingError>,
{
    let dim = bounds.dimension();
    if initial.len() != dim {
        return Err(PricingError::BoundsViolation(format!(
            "initial vector has {} entries, bounds have {}",
            initial.len(),
            dim
        )));
    }

    let mut simplex = Vec::with_capacity(dim + 1);
    let mut values = Vec::with_capacity(dim + 1);
    let mut evals = 0usize;

    let x0 = initial.to_vec();
    values.push(objective_fn(&x0)?);
    simplex.push(x0.clone());
    evals += 1;

    // Offset each coordinate in turn; flip direction at the upper bound so
    // the starting simplex is never degenerate
    for d in 0..dim {
        let mut x = x0.clone();
        let step = (bounds.upper[d] - bounds.lower[d]).abs() * options.initial_step.max(1e-4);
        x[d] = (x[d] + step).min(bounds.upper[d]);
        if (x[d] - x0[d]).abs() < 1e-14 {
            x[d] = (x[d] - step).max(bounds.lower[d]);
        }
        let x = bounds.clamp(&x);
        values.push(objective_fn(&x)?);
        simplex.push(x);
        evals += 1;
    }

    let mut iterations = 0usize;
    let mut reason = TerminationReason::MaxIterations;
    let mut converged = false;

    for iter in 0..options.max_iterations {
        iterations = iter + 1;

        let mut order: Vec<usize> = (0..simplex.len()).collect();
        order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let spread = (values[dim] - values[0]).abs();

        let centroid: Vec<f64> = (0..dim)
            .map(|d| simplex.iter().take(dim).map(|x| x[d]).sum::<f64>() / dim as f64)
            .collect();

        let max_vertex_dist = simplex
            .iter()
            .map(|x| {
                x.iter()
                    .zip(centroid.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0_f64, f64::max);

        if spread <= options.tolerance && max_vertex_dist <= options.tolerance {
            converged = true;
            reason = TerminationReason::ObjectiveTolerance;
            break;
        }

        // Reflection
        let xr: Vec<f64> = (0..dim)
            .map(|d| centroid[d] + options.reflection * (centroid[d] - simplex[dim][d]))
            .collect();
        let xr = bounds.clamp(&xr);
        let fr = objective_fn(&xr)?;
        evals += 1;

        if fr < values[0] {
            // Expansion
            let xe: Vec<f64> = (0..dim)
                .map(|d| centroid[d] + options.expansion * (xr[d] - centroid[d]))
                .collect();
            let xe = bounds.clamp(&xe);
            let fe = objective_fn(&xe)?;
            evals += 1;

            if fe < fr {
                simplex[dim] = xe;
                values[dim] = fe;
            } else {
                simplex[dim] = xr;
                values[dim] = fr;
            }
            continue;
        }

        if fr < values[dim - 1] {
            simplex[dim] = xr;
            values[dim] = fr;
            continue;
        }

        // Contraction toward the worst vertex
        let xc: Vec<f64> = (0..dim)
            .map(|d| centroid[d] + options.contraction * (simplex[dim][d] - centroid[d]))
            .collect();
        let xc = bounds.clamp(&xc);
        let fc = objective_fn(&xc)?;
        evals += 1;

        if fc < values[dim] {
            simplex[dim] = xc;
            values[dim] = fc;
            continue;
        }

        // Shrink everything toward the best vertex
        for i in 1..=dim {
            for d in 0..dim {
                simplex[i][d] = simplex[0][d] + options.shrink * (simplex[i][d] - simplex[0][d]);
            }
            simplex[i] = bounds.clamp(&simplex[i]);
            values[i] = objective_fn(&simplex[i])?;
            evals += 1;
        }
    }

    let mut order: Vec<usize> = (0..simplex.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    Ok(SearchResult {
        x: simplex[order[0]].clone(),
        objective: values[order[0]],
        convergence: ConvergenceInfo {
            iterations,
            objective_evaluations: evals,
            converged,
            reason,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_interior_minimum() {
        let bounds = RateBounds::new(vec![-1.0, -1.0], vec![1.0, 1.0]).unwrap();
        let out = nelder_mead(&[0.9, 0.9], &bounds, NelderMeadOptions::default(), |x| {
            Ok((x[0] - 0.25).powi(2) + (x[1] + 0.4).powi(2))
        })
        .unwrap();

        assert!(out.convergence.converged);
        assert!((out.x[0] - 0.25).abs() < 1e-4);
        assert!((out.x[1] + 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_respects_bounds_when_minimum_is_outside() {
        let bounds = RateBounds::new(vec![0.0], vec![1.0]).unwrap();
        // Unconstrained minimum at -2, so the search should pin to the lower bound
        let out = nelder_mead(&[0.5], &bounds, NelderMeadOptions::default(), |x| {
            Ok((x[0] + 2.0).powi(2))
        })
        .unwrap();

        assert!(out.x[0] >= 0.0);
        assert!(out.x[0] < 1e-3);
    }

    #[test]
    fn test_budget_exhaustion_is_flagged_not_silent() {
        let bounds = RateBounds::new(vec![-1.0, -1.0], vec![1.0, 1.0]).unwrap();
        let options = NelderMeadOptions {
            max_iterations: 2,
            ..Default::default()
        };
        let out = nelder_mead(&[0.9, 0.9], &bounds, options, |x| {
            Ok(x[0].powi(2) + x[1].powi(2))
        })
        .unwrap();

        assert!(!out.convergence.converged);
        assert_eq!(out.convergence.reason, TerminationReason::MaxIterations);
        assert_eq!(out.convergence.iterations, 2);
        // Best-so-far is still returned
        assert!(out.objective.is_finite());
    }

    #[test]
    fn test_objective_error_aborts_search() {
        let bounds = RateBounds::new(vec![-1.0], vec![1.0]).unwrap();
        let result = nelder_mead(&[0.5], &bounds, NelderMeadOptions::default(), |x| {
            Err(PricingError::NumericDegeneracy {
                apr: x[0],
                monthly_rate: 0.0,
            })
        });

        assert!(result.is_err());
    }
}
