//! Piecewise-linear interpolation with a constant fill value outside the knots.

use crate::error::DetectorError;

/// Linear interpolator over ascending knots.
///
/// Queries outside `[x_min, x_max]` (and NaN queries) return `fill_value` rather
/// than extrapolating.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
    fill_value: f64,
}

impl LinearInterpolator {
    pub fn new(x: Vec<f64>, y: Vec<f64>, fill_value: f64) -> Result<Self, DetectorError> {
        if x.is_empty() {
            return Err(DetectorError::InvalidCurve("no samples".to_string()));
        }
        if x.len() != y.len() {
            return Err(DetectorError::InvalidCurve(format!(
                "{} abscissae but {} values",
                x.len(),
                y.len()
            )));
        }
        if x.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(DetectorError::InvalidCurve(
                "frequencies must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { x, y, fill_value })
    }

    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.x.len();
        if !(x >= self.x[0] && x <= self.x[n - 1]) {
            return self.fill_value;
        }
        // First knot strictly greater than x; x == x_max lands on the last segment.
        let upper = self.x.partition_point(|&xi| xi <= x).min(n - 1);
        if upper == 0 {
            return self.y[0];
        }
        linear_interp((self.x[upper - 1], self.y[upper - 1]), (self.x[upper], self.y[upper]), x)
    }

    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

fn linear_interp(a: (f64, f64), b: (f64, f64), x: f64) -> f64 {
    let (x0, y0) = a;
    let (x1, y1) = b;
    if x == x1 {
        return y1;
    }
    let u = (x - x0) / (x1 - x0);
    y0 + u * (y1 - y0)
}
