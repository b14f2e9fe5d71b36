//! # Shower axis fit
//!
//! This module fits the shower axis through the centroids of the valid layers. The axis is
//! constrained to run **parallel to the depth axis**, so it is fully described by its lateral
//! offset `(p0, p1)`:
//!
//! ```text
//! F(p0, p1) = Σ_ℓ [ (x_ℓ − p0)² + (y_ℓ − p1)² ]
//! ```
//!
//! The objective is a convex quadratic whose minimum is the arithmetic mean of the centroids.
//! Two solvers are available through [`FitMethod`]:
//!
//! - **`ClosedForm`** (default) – the mean of the centroids, exact and non-iterative. It is the
//!   reference the iterative path is checked against.
//! - **`Newton`** – the bounded finite-difference Newton minimizer of
//!   [`minimizer`](crate::axis_fit::minimizer), starting from `(-50, -100)` with a `0.01` step
//!   per parameter, for parity with numeric results of the legacy display.
//!
//! ## Preconditions
//!
//! A fit is attempted only with at least `min_points` (2) centroids. Fewer points means the fit
//! is **skipped** ([`fit_axis`] returns `None`), which is not an error.
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Point3;
//! use shower_axis::axis_fit::{fit_axis, FitParams};
//!
//! let centroids = [
//!     Point3::new(10.0, 10.0, 1.0),
//!     Point3::new(10.0, 10.0, 2.0),
//!     Point3::new(12.0, 8.0, 3.0),
//! ];
//! let fit = fit_axis(&centroids, &FitParams::default()).unwrap();
//! assert!((fit.p0 - 32.0 / 3.0).abs() < 1e-12);
//! assert!((fit.residual - 16.0 / 3.0).abs() < 1e-12);
//! ```
//!
//! ## See also
//!
//! * [`LineFitResult`] – Fitted offset, residual and convergence status.
//! * [`select_valid_layers`](crate::layers::validity::select_valid_layers) – Which centroids
//!   enter the fit.
use std::cmp::Ordering::Greater;
use std::fmt;

use nalgebra::{Point3, Vector2};

use crate::shower_errors::ShowerError;

pub mod line_fit_result;
pub mod minimizer;

use line_fit_result::LineFitResult;
use minimizer::{newton_minimize, MinimizerSettings};

/// Solver used to minimize the axis objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMethod {
    #[default]
    ClosedForm,
    Newton,
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitMethod::ClosedForm => write!(f, "closed form"),
            FitMethod::Newton => write!(f, "newton"),
        }
    }
}

/// Configuration of the axis fit.
///
/// Fields
/// -----------------
/// * `method` – solver, [`FitMethod::ClosedForm`] by default.
/// * `start` – starting point of the iterative solver.
/// * `step` – finite-difference step per parameter of the iterative solver.
/// * `max_iterations` – Newton iteration budget.
/// * `max_function_calls` – objective evaluation budget.
/// * `edm_tolerance` – convergence threshold on the estimated distance to minimum.
/// * `min_points` – minimum number of centroids for a fit to be attempted.
///
/// Defaults
/// -----------------
/// * `method`: closed form
/// * `start`: (-50, -100)
/// * `step`: (0.01, 0.01)
/// * `max_iterations`: 50
/// * `max_function_calls`: 200
/// * `edm_tolerance`: 1e-12
/// * `min_points`: 2
#[derive(Debug, Clone, PartialEq)]
pub struct FitParams {
    pub method: FitMethod,
    pub start: Vector2<f64>,
    pub step: Vector2<f64>,
    pub max_iterations: usize,
    pub max_function_calls: usize,
    pub edm_tolerance: f64,
    pub min_points: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        FitParams {
            method: FitMethod::ClosedForm,
            start: Vector2::new(-50.0, -100.0),
            step: Vector2::new(0.01, 0.01),
            max_iterations: 50,
            max_function_calls: 200,
            edm_tolerance: 1e-12,
            min_points: 2,
        }
    }
}

impl FitParams {
    pub fn builder() -> FitParamsBuilder {
        FitParamsBuilder::new()
    }

    fn minimizer_settings(&self) -> MinimizerSettings {
        MinimizerSettings {
            step: self.step,
            max_iterations: self.max_iterations,
            max_function_calls: self.max_function_calls,
            edm_tolerance: self.edm_tolerance,
        }
    }
}

impl fmt::Display for FitParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method {
            FitMethod::ClosedForm => {
                write!(f, "FitParams(closed form, min_points={})", self.min_points)
            }
            FitMethod::Newton => write!(
                f,
                "FitParams(newton, start=({}, {}), step=({}, {}), \
                 max_it={}, max_calls={}, edm<{:.1e}, min_points={})",
                self.start[0],
                self.start[1],
                self.step[0],
                self.step[1],
                self.max_iterations,
                self.max_function_calls,
                self.edm_tolerance,
                self.min_points
            ),
        }
    }
}

/// Builder for [`FitParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct FitParamsBuilder {
    params: FitParams,
}

impl FitParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: FitParams::default(),
        }
    }

    pub fn method(mut self, v: FitMethod) -> Self {
        self.params.method = v;
        self
    }
    pub fn start(mut self, p0: f64, p1: f64) -> Self {
        self.params.start = Vector2::new(p0, p1);
        self
    }
    pub fn step(mut self, s0: f64, s1: f64) -> Self {
        self.params.step = Vector2::new(s0, s1);
        self
    }
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.params.max_iterations = v;
        self
    }
    pub fn max_function_calls(mut self, v: usize) -> Self {
        self.params.max_function_calls = v;
        self
    }
    pub fn edm_tolerance(mut self, v: f64) -> Self {
        self.params.edm_tolerance = v;
        self
    }
    pub fn min_points(mut self, v: usize) -> Self {
        self.params.min_points = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `start` must be finite.
    /// * both `step` components and `edm_tolerance` must be `> 0`.
    /// * `max_iterations ≥ 1`, `max_function_calls ≥ 1`.
    /// * `min_points ≥ 2` (a line offset needs at least two centroids to be meaningful).
    pub fn build(self) -> Result<FitParams, ShowerError> {
        let p = &self.params;

        if !(p.start[0].is_finite() && p.start[1].is_finite()) {
            return Err(ShowerError::InvalidFitParameter(
                "start must be finite".into(),
            ));
        }
        if !Self::gt0(p.step[0]) || !Self::gt0(p.step[1]) {
            return Err(ShowerError::InvalidFitParameter("step must be > 0".into()));
        }
        if !Self::gt0(p.edm_tolerance) {
            return Err(ShowerError::InvalidFitParameter(
                "edm_tolerance must be > 0".into(),
            ));
        }
        if p.max_iterations == 0 {
            return Err(ShowerError::InvalidFitParameter(
                "max_iterations must be >= 1".into(),
            ));
        }
        if p.max_function_calls == 0 {
            return Err(ShowerError::InvalidFitParameter(
                "max_function_calls must be >= 1".into(),
            ));
        }
        if p.min_points < 2 {
            return Err(ShowerError::InvalidFitParameter(
                "min_points must be >= 2".into(),
            ));
        }

        Ok(self.params)
    }
}

/// Sum of squared transverse distances of `points` to the axis at `offset`.
pub fn axis_objective(points: &[Point3<f64>], offset: &Vector2<f64>) -> f64 {
    points
        .iter()
        .map(|c| (c.x - offset[0]).powi(2) + (c.y - offset[1]).powi(2))
        .sum()
}

/// Arithmetic mean of the lateral coordinates.
///
/// The sum is taken relative to the first point so that identical inputs give back that exact
/// value.
fn lateral_mean(points: &[Point3<f64>]) -> Vector2<f64> {
    let reference = Vector2::new(points[0].x, points[0].y);
    let shift: Vector2<f64> = points
        .iter()
        .map(|c| Vector2::new(c.x, c.y) - reference)
        .sum();
    reference + shift / points.len() as f64
}

/// Fit the axis through `centroids`.
///
/// Arguments
/// -----------------
/// * `centroids`: Energy-weighted centroids `(x, y, z)` of the valid layers.
/// * `params`: Solver selection and limits.
///
/// Return
/// ----------
/// * `None` when fewer than `params.min_points` centroids are given (fit skipped).
/// * `Some(LineFitResult)` otherwise. The iterative solver may report `converged = false`; the
///   closed form always converges.
pub fn fit_axis(centroids: &[Point3<f64>], params: &FitParams) -> Option<LineFitResult> {
    if centroids.len() < params.min_points.max(1) {
        return None;
    }

    let result = match params.method {
        FitMethod::ClosedForm => {
            let offset = lateral_mean(centroids);
            LineFitResult {
                p0: offset[0],
                p1: offset[1],
                converged: true,
                residual: axis_objective(centroids, &offset),
                n_points: centroids.len(),
                method: FitMethod::ClosedForm,
                iterations: 0,
                function_calls: 1,
            }
        }
        FitMethod::Newton => {
            let out = newton_minimize(
                |p| axis_objective(centroids, p),
                params.start,
                &params.minimizer_settings(),
            );
            LineFitResult {
                p0: out.minimum[0],
                p1: out.minimum[1],
                converged: out.converged,
                residual: out.value,
                n_points: centroids.len(),
                method: FitMethod::Newton,
                iterations: out.iterations,
                function_calls: out.function_calls,
            }
        }
    };

    Some(result)
}

#[cfg(test)]
mod axis_fit_test {
    use approx::assert_relative_eq;

    use super::*;

    fn scenario() -> Vec<Point3<f64>> {
        vec![
            Point3::new(10.0, 10.0, 1.0),
            Point3::new(10.0, 10.0, 2.0),
            Point3::new(12.0, 8.0, 3.0),
        ]
    }

    #[test]
    fn test_three_layer_scenario_closed_form() {
        let fit = fit_axis(&scenario(), &FitParams::default()).unwrap();
        assert!(fit.converged);
        assert_relative_eq!(fit.p0, 10.666666666666666, epsilon = 1e-12);
        assert_relative_eq!(fit.p1, 9.333333333333334, epsilon = 1e-12);
        assert_relative_eq!(fit.residual, 5.333333333333333, epsilon = 1e-12);
        assert_eq!(fit.n_points, 3);
    }

    #[test]
    fn test_newton_matches_closed_form() {
        let newton = FitParams::builder()
            .method(FitMethod::Newton)
            .build()
            .unwrap();
        let closed = fit_axis(&scenario(), &FitParams::default()).unwrap();
        let iter = fit_axis(&scenario(), &newton).unwrap();

        assert!(iter.converged);
        assert_eq!(iter.method, FitMethod::Newton);
        assert_relative_eq!(iter.p0, closed.p0, epsilon = 1e-6);
        assert_relative_eq!(iter.p1, closed.p1, epsilon = 1e-6);
        assert_relative_eq!(iter.residual, closed.residual, epsilon = 1e-6);
        assert!(iter.function_calls <= 200);
    }

    #[test]
    fn test_degenerate_centroids_exact() {
        let pts = vec![
            Point3::new(10.3, -7.1, 0.5),
            Point3::new(10.3, -7.1, 15.5),
            Point3::new(10.3, -7.1, 30.5),
        ];
        let fit = fit_axis(&pts, &FitParams::default()).unwrap();
        assert_eq!(fit.p0, 10.3);
        assert_eq!(fit.p1, -7.1);
        assert_eq!(fit.residual, 0.0);
    }

    #[test]
    fn test_too_few_points_skips() {
        assert!(fit_axis(&[], &FitParams::default()).is_none());
        assert!(fit_axis(&scenario()[..1], &FitParams::default()).is_none());
        assert!(fit_axis(&scenario()[..2], &FitParams::default()).is_some());
    }

    #[test]
    fn test_exhausted_budget_reports_non_convergence() {
        let params = FitParams::builder()
            .method(FitMethod::Newton)
            .max_iterations(1)
            .build()
            .unwrap();
        let fit = fit_axis(&scenario(), &params).unwrap();
        assert!(!fit.converged);
        assert!(fit.beam_line(210.0).is_none());
    }

    #[test]
    fn test_builder_validation() {
        assert_eq!(
            FitParams::builder().step(0.0, 0.01).build(),
            Err(ShowerError::InvalidFitParameter("step must be > 0".into()))
        );
        assert_eq!(
            FitParams::builder().min_points(1).build(),
            Err(ShowerError::InvalidFitParameter(
                "min_points must be >= 2".into()
            ))
        );
        assert!(FitParams::builder()
            .edm_tolerance(f64::NAN)
            .build()
            .is_err());
        assert!(FitParams::builder()
            .start(f64::INFINITY, 0.0)
            .build()
            .is_err());
    }
}
