//! Natural cubic spline interpolation
//!
//! One-dimensional interpolant over a strictly increasing domain, used by
//! the trajectory generator to connect its anchor points in the local
//! frame. Twice differentiable through every anchor.

extern crate nalgebra as na;

use crate::common::{PlannerError, PlannerResult};

/// Piecewise cubic y(x) through the given knots, natural boundary
/// conditions at both ends
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl CubicSpline {
    /// Fit the spline. The domain must be strictly increasing; the
    /// tridiagonal system is solved through nalgebra.
    pub fn new(x: &[f64], y: &[f64]) -> PlannerResult<Self> {
        let nx = x.len();
        if nx != y.len() || nx < 3 {
            return Err(PlannerError::NumericalError(format!(
                "spline needs at least 3 matched knots, got {} x {}",
                nx,
                y.len()
            )));
        }
        let mut h = Vec::with_capacity(nx - 1);
        for i in 0..nx - 1 {
            let hi = x[i + 1] - x[i];
            if hi <= 0.0 {
                return Err(PlannerError::NumericalError(format!(
                    "spline domain not strictly increasing at knot {}",
                    i
                )));
            }
            h.push(hi);
        }

        let a = y.to_vec();
        let a_mat = Self::calc_a(&h);
        let b_vec = Self::calc_b(&h, &a);

        let a_inv = a_mat.try_inverse().ok_or_else(|| {
            PlannerError::NumericalError("singular spline system".to_string())
        })?;
        let c_na = a_inv * b_vec;

        let c: Vec<f64> = c_na.iter().cloned().collect();
        let mut b = Vec::with_capacity(nx - 1);
        let mut d = Vec::with_capacity(nx - 1);
        for i in 0..nx - 1 {
            d.push((c[i + 1] - c[i]) / (3.0 * h[i]));
            b.push((a[i + 1] - a[i]) / h[i] - h[i] * (c[i + 1] + 2.0 * c[i]) / 3.0);
        }

        Ok(CubicSpline {
            x: x.to_vec(),
            a,
            b,
            c,
            d,
        })
    }

    /// Evaluate y(t)
    pub fn eval(&self, t: f64) -> f64 {
        let i = self.search_index(t);
        let dx = t - self.x[i];
        self.a[i] + self.b[i] * dx + self.c[i] * dx.powi(2) + self.d[i] * dx.powi(3)
    }

    /// First derivative y'(t)
    pub fn eval_d(&self, t: f64) -> f64 {
        let i = self.search_index(t);
        let dx = t - self.x[i];
        self.b[i] + 2.0 * self.c[i] * dx + 3.0 * self.d[i] * dx.powi(2)
    }

    fn search_index(&self, t: f64) -> usize {
        for i in 0..self.x.len() - 1 {
            if self.x[i] <= t && t < self.x[i + 1] {
                return i;
            }
        }
        self.x.len() - 2
    }

    fn calc_a(h: &[f64]) -> na::DMatrix<f64> {
        let nx = h.len() + 1;
        let mut a = na::DMatrix::from_diagonal_element(nx, nx, 0.0);
        a[(0, 0)] = 1.0;
        for i in 0..nx - 1 {
            if i != nx - 2 {
                a[(i + 1, i + 1)] = 2.0 * (h[i] + h[i + 1]);
            }
            a[(i + 1, i)] = h[i];
            a[(i, i + 1)] = h[i];
        }
        a[(0, 1)] = 0.0;
        a[(nx - 1, nx - 2)] = 0.0;
        a[(nx - 1, nx - 1)] = 1.0;
        a
    }

    fn calc_b(h: &[f64], a: &[f64]) -> na::DVector<f64> {
        let nx = h.len() + 1;
        let mut b = na::DVector::zeros(nx);
        for i in 0..nx - 2 {
            b[i + 1] =
                3.0 * (a[i + 2] - a[i + 1]) / h[i + 1] - 3.0 * (a[i + 1] - a[i]) / h[i];
        }
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolates_through_knots() {
        let x = vec![-1.0, 0.0, 10.0, 20.5, 30.0];
        let y = vec![0.5, 0.0, -2.0, 3.0, 1.0];
        let spline = CubicSpline::new(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert!(
                (spline.eval(*xi) - yi).abs() < 1e-9,
                "spline missed knot at x = {}",
                xi
            );
        }
    }

    #[test]
    fn test_linear_data_stays_linear() {
        let x = vec![0.0, 10.0, 20.0, 30.0];
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v + 1.0).collect();
        let spline = CubicSpline::new(&x, &y).unwrap();
        for t in [2.5, 13.0, 27.9] {
            assert!((spline.eval(t) - (0.5 * t + 1.0)).abs() < 1e-9);
            assert!((spline.eval_d(t) - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_continuous_between_segments() {
        let x = vec![0.0, 1.0, 2.0, 4.0, 7.0];
        let y = vec![0.0, 2.0, -1.0, 3.0, 0.0];
        let spline = CubicSpline::new(&x, &y).unwrap();
        // Value and slope agree from both sides of an interior knot
        let eps = 1e-7;
        let left = spline.eval(2.0 - eps);
        let right = spline.eval(2.0 + eps);
        assert!((left - right).abs() < 1e-5);
        let dl = spline.eval_d(2.0 - eps);
        let dr = spline.eval_d(2.0 + eps);
        assert!((dl - dr).abs() < 1e-4);
    }

    #[test]
    fn test_rejects_non_increasing_domain() {
        let x = vec![0.0, 5.0, 5.0, 10.0];
        let y = vec![0.0, 1.0, 2.0, 3.0];
        assert!(CubicSpline::new(&x, &y).is_err());
        let x = vec![0.0, 5.0, 4.0, 10.0];
        assert!(CubicSpline::new(&x, &y).is_err());
    }

    #[test]
    fn test_rejects_too_few_knots() {
        assert!(CubicSpline::new(&[0.0, 1.0], &[0.0, 1.0]).is_err());
        assert!(CubicSpline::new(&[0.0], &[0.0]).is_err());
    }
}
