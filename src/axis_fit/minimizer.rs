//! # Bounded Newton minimizer for two-parameter objectives
//!
//! Iterative minimizer used by the [`FitMethod::Newton`](crate::axis_fit::FitMethod::Newton)
//! path of the axis fit. Gradient and Hessian are estimated by central finite differences with a
//! per-parameter step, the Newton step is solved through a Cholesky factorization, and a
//! step-halving line search guarantees the objective never increases.
//!
//! Convergence is declared when the **estimated distance to minimum**
//!
//! ```text
//! edm = ½ · gᵀ H⁻¹ g
//! ```
//!
//! falls below the tolerance. The run is always bounded: it stops after `max_iterations`
//! Newton steps or `max_function_calls` objective evaluations, whichever comes first, and
//! reports `converged = false` in that case. A Hessian that is not positive definite also
//! terminates the run without convergence.
use nalgebra::{Matrix2, Vector2};

/// Line-search halvings tried before a Newton step is abandoned.
const MAX_HALVINGS: usize = 30;

/// Objective evaluations needed to estimate gradient and Hessian at one point.
const CALLS_PER_DERIVATIVE: usize = 8;

/// Limits of one minimization run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizerSettings {
    pub step: Vector2<f64>,
    pub max_iterations: usize,
    pub max_function_calls: usize,
    pub edm_tolerance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizerOutcome {
    pub minimum: Vector2<f64>,
    pub value: f64,
    pub converged: bool,
    pub iterations: usize,
    pub function_calls: usize,
    pub edm: f64,
}

struct CountedFcn<F> {
    f: F,
    calls: usize,
}

impl<F: Fn(&Vector2<f64>) -> f64> CountedFcn<F> {
    fn eval(&mut self, p: &Vector2<f64>) -> f64 {
        self.calls += 1;
        (self.f)(p)
    }

    /// Central-difference gradient and Hessian at `p`, where `fp = f(p)`.
    fn derivatives(
        &mut self,
        p: &Vector2<f64>,
        fp: f64,
        h: &Vector2<f64>,
    ) -> (Vector2<f64>, Matrix2<f64>) {
        let e0 = Vector2::new(h[0], 0.0);
        let e1 = Vector2::new(0.0, h[1]);

        let f0p = self.eval(&(p + e0));
        let f0m = self.eval(&(p - e0));
        let f1p = self.eval(&(p + e1));
        let f1m = self.eval(&(p - e1));

        let fpp = self.eval(&(p + e0 + e1));
        let fpm = self.eval(&(p + e0 - e1));
        let fmp = self.eval(&(p - e0 + e1));
        let fmm = self.eval(&(p - e0 - e1));

        let g = Vector2::new((f0p - f0m) / (2.0 * h[0]), (f1p - f1m) / (2.0 * h[1]));

        let h00 = (f0p - 2.0 * fp + f0m) / (h[0] * h[0]);
        let h11 = (f1p - 2.0 * fp + f1m) / (h[1] * h[1]);
        let h01 = (fpp - fpm - fmp + fmm) / (4.0 * h[0] * h[1]);

        (g, Matrix2::new(h00, h01, h01, h11))
    }
}

/// Minimize `f` starting from `start`.
///
/// Arguments
/// -----------------
/// * `f`: Objective function of two parameters.
/// * `start`: Initial parameter values.
/// * `settings`: Finite-difference steps, iteration/call budgets and EDM tolerance.
///
/// Return
/// ----------
/// * A [`MinimizerOutcome`] holding the best point reached, its objective value, the
///   convergence flag and the work spent. The outcome is terminal even when not converged.
pub fn newton_minimize<F>(
    f: F,
    start: Vector2<f64>,
    settings: &MinimizerSettings,
) -> MinimizerOutcome
where
    F: Fn(&Vector2<f64>) -> f64,
{
    let mut fcn = CountedFcn { f, calls: 0 };
    let mut p = start;
    let mut fp = fcn.eval(&p);
    let mut edm = f64::INFINITY;
    let mut iterations = 0;

    let outcome = |p, fp, converged, iterations, function_calls, edm| MinimizerOutcome {
        minimum: p,
        value: fp,
        converged,
        iterations,
        function_calls,
        edm,
    };

    while iterations < settings.max_iterations {
        if fcn.calls + CALLS_PER_DERIVATIVE > settings.max_function_calls {
            break;
        }
        iterations += 1;

        let (g, hess) = fcn.derivatives(&p, fp, &settings.step);
        let Some(chol) = hess.cholesky() else {
            return outcome(p, fp, false, iterations, fcn.calls, edm);
        };
        let newton_dir = chol.solve(&g);
        edm = 0.5 * g.dot(&newton_dir);

        if edm < settings.edm_tolerance {
            return outcome(p, fp, true, iterations, fcn.calls, edm);
        }

        let mut lambda = 1.0;
        let mut accepted = false;
        for _ in 0..MAX_HALVINGS {
            if fcn.calls >= settings.max_function_calls {
                break;
            }
            let trial = p - newton_dir * lambda;
            let ft = fcn.eval(&trial);
            if ft <= fp {
                p = trial;
                fp = ft;
                accepted = true;
                break;
            }
            lambda *= 0.5;
        }

        if !accepted {
            break;
        }
    }

    outcome(p, fp, false, iterations, fcn.calls, edm)
}
