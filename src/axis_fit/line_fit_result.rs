//! # Axis fit result and beam line overlay
//!
//! [`LineFitResult`] holds the lateral offset `(p0, p1)` of the fitted shower axis, a line
//! parallel to the depth axis (`x = p0`, `y = p1` for every `z`), together with the minimized
//! objective value and the convergence status of the solver.
//!
//! A converged result is turned into a [`BeamLine`], the segment
//! `(p0, p1, 0) → (p0, p1, depth)` handed to the renderer. An unconverged result is kept in the
//! cache for inspection but never produces an overlay.
use std::fmt;

use nalgebra::{Point3, Vector2};

use crate::{
    axis_fit::FitMethod,
    constants::{Millimeter, AXIS_POLYLINE_POINTS},
};

#[derive(Debug, Clone, PartialEq)]
pub struct LineFitResult {
    /// Lateral x offset of the axis.
    pub p0: Millimeter,
    /// Lateral y offset of the axis.
    pub p1: Millimeter,
    pub converged: bool,
    /// Sum of squared transverse distances of the fitted centroids to the axis.
    pub residual: f64,
    /// Number of centroids entering the fit.
    pub n_points: usize,
    pub method: FitMethod,
    pub iterations: usize,
    pub function_calls: usize,
}

impl LineFitResult {
    pub fn offset(&self) -> Vector2<f64> {
        Vector2::new(self.p0, self.p1)
    }

    /// Point of the axis at depth `z`.
    pub fn point_at(&self, z: Millimeter) -> Point3<f64> {
        Point3::new(self.p0, self.p1, z)
    }

    /// Transverse distance of `point` to the axis.
    pub fn transverse_distance(&self, point: &Point3<f64>) -> f64 {
        ((point.x - self.p0).powi(2) + (point.y - self.p1).powi(2)).sqrt()
    }

    /// Axis segment over `[0, depth]`, only for a converged fit.
    pub fn beam_line(&self, depth: Millimeter) -> Option<BeamLine> {
        self.converged.then(|| BeamLine {
            start: self.point_at(0.0),
            end: self.point_at(depth),
        })
    }
}

impl fmt::Display for LineFitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "axis x = {:.3} mm, y = {:.3} mm, residual = {:.4} ({} points, {}, {})",
            self.p0,
            self.p1,
            self.residual,
            self.n_points,
            self.method,
            if self.converged {
                "converged"
            } else {
                "NOT converged"
            }
        )
    }
}

/// Segment of the fitted axis drawn over the detector depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamLine {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl BeamLine {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// `n` evenly spaced points from `start` to `end`, both included when `n ≥ 2`.
    pub fn sample(&self, n: usize) -> Vec<Point3<f64>> {
        match n {
            0 => Vec::new(),
            1 => vec![self.start],
            _ => (0..n)
                .map(|i| {
                    let t = i as f64 / (n - 1) as f64;
                    self.start + (self.end - self.start) * t
                })
                .collect(),
        }
    }

    /// Polyline drawn by the display for the axis overlay.
    pub fn polyline(&self) -> Vec<Point3<f64>> {
        self.sample(AXIS_POLYLINE_POINTS)
    }
}

#[cfg(test)]
mod line_fit_result_test {
    use approx::assert_relative_eq;

    use super::*;

    fn result(converged: bool) -> LineFitResult {
        LineFitResult {
            p0: 3.0,
            p1: -4.0,
            converged,
            residual: 1.0,
            n_points: 3,
            method: FitMethod::ClosedForm,
            iterations: 0,
            function_calls: 0,
        }
    }

    #[test]
    fn test_beam_line_only_when_converged() {
        assert!(result(false).beam_line(210.0).is_none());

        let line = result(true).beam_line(210.0).unwrap();
        assert_eq!(line.start, Point3::new(3.0, -4.0, 0.0));
        assert_eq!(line.end, Point3::new(3.0, -4.0, 210.0));
        assert_relative_eq!(line.length(), 210.0);
    }

    #[test]
    fn test_sample_includes_endpoints() {
        let line = result(true).beam_line(210.0).unwrap();
        let pts = line.polyline();
        assert_eq!(pts.len(), 1000);
        assert_eq!(pts[0], line.start);
        assert_relative_eq!(pts[999].z, 210.0);
        assert!(pts.iter().all(|p| p.x == 3.0 && p.y == -4.0));
        assert!(line.sample(0).is_empty());
        assert_eq!(line.sample(1), vec![line.start]);
    }

    #[test]
    fn test_transverse_distance() {
        let r = result(true);
        assert_relative_eq!(r.transverse_distance(&Point3::new(6.0, 0.0, 99.0)), 5.0);
    }
}
