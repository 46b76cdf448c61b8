//! Scalar Newton–Raphson root finder.

use spall_core::SolveError;

/// A scalar residual with an analytic derivative.
pub trait ResidualFunction {
    /// Residual value and derivative at `x`.
    fn evaluate(&self, x: f64) -> (f64, f64);
}

/// Newton–Raphson iteration on a [`ResidualFunction`].
///
/// Convergence is declared when `|r| <= tolerance * max(1, |x|)` — an
/// absolute test near zero that scales with the iterate far from it, so
/// the same tolerance works across the energy magnitudes a shock run
/// visits. Exceeding the iteration cap is fatal: the solver reports the
/// last residual and the caller attaches the offending entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonRaphson {
    /// Convergence tolerance on the scaled residual.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: u32,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-9,
            max_iterations: 100,
        }
    }
}

impl NewtonRaphson {
    /// Create a solver with an explicit tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Iterate from `initial` until convergence or the cap.
    pub fn solve(
        &self,
        function: &dyn ResidualFunction,
        initial: f64,
    ) -> Result<f64, SolveError> {
        let mut x = initial;
        for _ in 0..self.max_iterations {
            let (residual, derivative) = function.evaluate(x);
            if residual.abs() <= self.tolerance * x.abs().max(1.0) {
                return Ok(x);
            }
            if derivative == 0.0 || !derivative.is_finite() {
                return Err(SolveError::SingularDerivative { at: x });
            }
            x -= residual / derivative;
        }
        let (residual, _) = function.evaluate(x);
        Err(SolveError::NonConvergence {
            iterations: self.max_iterations,
            residual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Quadratic {
        target: f64,
    }

    impl ResidualFunction for Quadratic {
        fn evaluate(&self, x: f64) -> (f64, f64) {
            (x * x - self.target, 2.0 * x)
        }
    }

    struct Stuck;

    impl ResidualFunction for Stuck {
        fn evaluate(&self, _x: f64) -> (f64, f64) {
            (1.0, 1.0)
        }
    }

    struct Flat;

    impl ResidualFunction for Flat {
        fn evaluate(&self, _x: f64) -> (f64, f64) {
            (1.0, 0.0)
        }
    }

    #[test]
    fn finds_square_roots() {
        let solver = NewtonRaphson::default();
        let root = solver.solve(&Quadratic { target: 2.0 }, 1.0).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn reports_non_convergence_with_last_residual() {
        let solver = NewtonRaphson::new(1e-12, 8);
        let err = solver.solve(&Stuck, 0.0).unwrap_err();
        match err {
            SolveError::NonConvergence {
                iterations,
                residual,
            } => {
                assert_eq!(iterations, 8);
                assert_eq!(residual, 1.0);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }

    #[test]
    fn reports_singular_derivative() {
        let solver = NewtonRaphson::default();
        let err = solver.solve(&Flat, 3.0).unwrap_err();
        assert!(matches!(err, SolveError::SingularDerivative { at } if at == 3.0));
    }

    #[test]
    fn already_converged_input_returns_immediately() {
        let solver = NewtonRaphson::default();
        let root = solver.solve(&Quadratic { target: 4.0 }, 2.0).unwrap();
        assert_eq!(root, 2.0);
    }

    proptest! {
        #[test]
        fn quadratic_roots_converge_from_reasonable_guesses(
            target in 0.1f64..1e6,
            guess_scale in 0.2f64..5.0,
        ) {
            let solver = NewtonRaphson::default();
            let guess = target.sqrt() * guess_scale;
            let root = solver.solve(&Quadratic { target }, guess).unwrap();
            prop_assert!((root - target.sqrt()).abs() / target.sqrt() < 1e-8);
        }
    }
}
