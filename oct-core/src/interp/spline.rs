//! Natural cubic spline interpolation
//!
//! Resamples wavelength-indexed spectra onto the evenly spaced optical
//! frequency axis that depth reconstruction assumes.

use crate::error::ProcessError;

/// Natural cubic spline over strictly increasing knots.
///
/// Construction solves the tridiagonal system for the second derivatives
/// once; each evaluation is a binary search plus one cubic polynomial.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    /// Strictly increasing sample positions.
    xs: Vec<f64>,
    /// Sample values.
    ys: Vec<f64>,
    /// Second derivatives at each knot.
    y2s: Vec<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline to the given knots.
    ///
    /// # Arguments
    /// * `xs` - Strictly increasing sample positions
    /// * `ys` - Sample values, same length as `xs`
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, ProcessError> {
        if xs.len() != ys.len() {
            return Err(ProcessError::LengthMismatch {
                expected: xs.len(),
                got: ys.len(),
            });
        }
        if xs.len() < 4 {
            return Err(ProcessError::InvalidConfig(format!(
                "cubic interpolation needs at least 4 samples, got {}",
                xs.len()
            )));
        }
        for i in 1..xs.len() {
            if xs[i] <= xs[i - 1] {
                return Err(ProcessError::AxisNotIncreasing(i));
            }
        }

        let n = xs.len();
        let mut y2s = vec![0.0; n];
        let mut u = vec![0.0; n - 1];

        // Forward sweep of the tridiagonal system; natural boundary
        // conditions leave y2s[0] and y2s[n-1] at zero.
        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2s[i - 1] + 2.0;
            y2s[i] = (sig - 1.0) / p;
            u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }

        // Back substitution
        for k in (0..n - 2).rev() {
            y2s[k + 1] = y2s[k + 1] * y2s[k + 2] + u[k + 1];
        }

        Ok(Self { xs, ys, y2s })
    }

    /// Evaluate the spline at `x`.
    ///
    /// Queries outside the knot range fail with `OutOfRange`; resampling
    /// must never extrapolate.
    pub fn evaluate(&self, x: f64) -> Result<f64, ProcessError> {
        let n = self.xs.len();
        if x < self.xs[0] || x > self.xs[n - 1] {
            return Err(ProcessError::OutOfRange {
                value: x,
                min: self.xs[0],
                max: self.xs[n - 1],
            });
        }

        // Binary search for the enclosing interval
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        Ok(a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2s[lo] + (b * b * b - b) * self.y2s[hi]) * h * h / 6.0)
    }

    /// Evaluate the spline at every position of a target axis.
    pub fn evaluate_axis(&self, targets: &[f64]) -> Result<Vec<f64>, ProcessError> {
        targets.iter().map(|&x| self.evaluate(x)).collect()
    }
}
