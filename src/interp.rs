//! Piecewise-linear interpolation over tabulated functions.
//!
//! Queries outside the tabulated domain return `None`; callers decide how
//! to extend the function (the CDF tables clamp to 0 and 1).

use crate::error::{ensure_finite, Result, UncertaintyError};

/// Linear interpolant through `(xs[i], ys[i])`.
///
/// `xs` must be non-decreasing. Repeated abscissae are allowed; a query
/// landing exactly on a repeated abscissa takes the rightmost ordinate.
///
/// # Examples
/// ```
/// use u_strata::interp::LinearInterpolator;
///
/// let f = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 10.0, 40.0]).unwrap();
/// assert_eq!(f.eval(0.5), Some(5.0));
/// assert_eq!(f.eval(1.5), Some(25.0));
/// assert_eq!(f.eval(2.5), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Builds the interpolant.
    ///
    /// # Errors
    /// - `MismatchedLength` if `xs` and `ys` differ in length.
    /// - `InvalidParameter` if fewer than two points are given or `xs`
    ///   decreases anywhere.
    /// - `NonFinite` if any coordinate is NaN/∞.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(UncertaintyError::MismatchedLength {
                values: xs.len(),
                weights: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(UncertaintyError::InvalidParameter(format!(
                "interpolation table needs at least 2 points, got {}",
                xs.len()
            )));
        }
        ensure_finite(&xs, "abscissa")?;
        ensure_finite(&ys, "ordinate")?;
        if xs.windows(2).any(|w| w[1] < w[0]) {
            return Err(UncertaintyError::InvalidParameter(
                "interpolation abscissae must be non-decreasing".into(),
            ));
        }
        Ok(Self { xs, ys })
    }

    /// Interpolated value at `x`, or `None` outside `[xs[0], xs[n-1]]`
    /// (including NaN queries).
    pub fn eval(&self, x: f64) -> Option<f64> {
        let (lo, hi) = self.domain();
        if !(x >= lo && x <= hi) {
            return None;
        }
        // First abscissa strictly greater than x; xs[0] <= x so i >= 1.
        let i = self.xs.partition_point(|&v| v <= x);
        if i == self.xs.len() {
            return self.ys.last().copied();
        }
        let (x0, x1) = (self.xs[i - 1], self.xs[i]);
        let (y0, y1) = (self.ys[i - 1], self.ys[i]);
        let t = (x - x0) / (x1 - x0);
        Some(y0 + t * (y1 - y0))
    }

    /// Tabulated domain `(xs[0], xs[n-1])`.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn monotone_table_gives_monotone_interpolant(
            steps in proptest::collection::vec((0.01_f64..5.0, 0.0_f64..5.0), 2..30),
            a in 0.0_f64..1.0,
            b in 0.0_f64..1.0,
        ) {
            let mut xs = vec![0.0];
            let mut ys = vec![0.0];
            for (dx, dy) in &steps {
                xs.push(xs.last().unwrap() + dx);
                ys.push(ys.last().unwrap() + dy);
            }
            let (lo, hi) = (xs[0], *xs.last().unwrap());
            let f = LinearInterpolator::new(xs, ys).unwrap();
            let (p, q) = if a <= b { (a, b) } else { (b, a) };
            let xp = lo + p * (hi - lo);
            let xq = lo + q * (hi - lo);
            let (fp, fq) = (f.eval(xp), f.eval(xq));
            prop_assume!(fp.is_some() && fq.is_some());
            prop_assert!(fp.unwrap() <= fq.unwrap() + 1e-9);
        }
    }
}
