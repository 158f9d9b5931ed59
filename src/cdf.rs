//! Fitted density model with tabulated CDF and inverse CDF.
//!
//! [`CdfModel`] is the probabilistic half of [`Distribution`] and of each
//! bound of a [`ProbabilityBox`]. It owns a [`KernelDensity`] and two
//! interpolation tables derived from it:
//!
//! - **CDF**: support grid → cumulative probability, non-decreasing, exactly
//!   0 at the first grid point and 1 at the last.
//! - **Inverse CDF**: probability grid `linspace(0, 1, len(support))` →
//!   support value.
//!
//! [`Distribution`]: crate::distribution::Distribution
//! [`ProbabilityBox`]: crate::pbox::ProbabilityBox

use crate::error::Result;
use crate::interp::LinearInterpolator;
use crate::kde::{KdeConfig, KernelDensity};
use crate::stats;

/// Tabulated probabilities this close to 0 or 1 are stored as exactly 0 or 1.
const TAIL_SNAP: f64 = 1e-12;

/// A kernel density estimate with its CDF and inverse-CDF tables.
#[derive(Debug, Clone, PartialEq)]
pub struct CdfModel {
    kde: KernelDensity,
    cdf: LinearInterpolator,
    icdf: LinearInterpolator,
}

impl CdfModel {
    /// Fits a density to `values` and tabulates its CDF and inverse.
    ///
    /// # Errors
    /// See [`KernelDensity::fit`].
    pub fn fit(values: &[f64], weights: Option<&[f64]>, config: &KdeConfig) -> Result<Self> {
        Self::from_kde(KernelDensity::fit(values, weights, config)?)
    }

    /// Tabulates the CDF and inverse CDF of an already fitted density.
    pub fn from_kde(kde: KernelDensity) -> Result<Self> {
        let support = kde.support().to_vec();
        let probabilities = cdf_table(&kde);
        let grid = stats::linspace(0.0, 1.0, support.len());
        let quantiles = invert_table(&support, &probabilities, &grid);

        let cdf = LinearInterpolator::new(support, probabilities)?;
        let icdf = LinearInterpolator::new(grid, quantiles)?;
        Ok(Self { kde, cdf, icdf })
    }

    pub fn kde(&self) -> &KernelDensity {
        &self.kde
    }

    /// Density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        self.kde.evaluate(x)
    }

    /// Cumulative probability at `x`, clamped to `0.0` below the support
    /// and `1.0` above it. NaN queries return NaN.
    pub fn cdf(&self, x: f64) -> f64 {
        if let Some(p) = self.cdf.eval(x) {
            return p;
        }
        let (lo, _) = self.cdf.domain();
        if x.is_nan() {
            f64::NAN
        } else if x < lo {
            0.0
        } else {
            1.0
        }
    }

    /// Support value at probability `p`; `p` is clamped to `[0, 1]`.
    pub fn inverse_cdf(&self, p: f64) -> f64 {
        let (lo, hi) = self.icdf.domain();
        let p = if p.is_nan() { p } else { p.clamp(lo, hi) };
        self.icdf.eval(p).unwrap_or(f64::NAN)
    }

    /// First and last support grid points.
    pub fn support_bounds(&self) -> (f64, f64) {
        self.cdf.domain()
    }

    /// Density-weighted mean over `points`: `Σ xᵢ·f(xᵢ) / Σ f(xᵢ)`.
    ///
    /// Returns `None` when the density vanishes at every point.
    pub fn discrete_mean(&self, points: &[f64]) -> Option<f64> {
        let density = self.kde.evaluate_many(points);
        stats::weighted_mean(points, &density)
    }

    /// Density-weighted standard deviation over `points` about `mean`.
    ///
    /// Returns `None` when the density vanishes at every point.
    pub fn discrete_std_dev(&self, points: &[f64], mean: f64) -> Option<f64> {
        let density = self.kde.evaluate_many(points);
        let deviations: Vec<f64> = points.iter().map(|x| (x - mean) * (x - mean)).collect();
        stats::weighted_mean(&deviations, &density).map(f64::sqrt)
    }
}

/// Kernel-integral CDF on the support grid, forced non-decreasing,
/// rescaled to span exactly `[0, 1]`, with negligible tails snapped.
fn cdf_table(kde: &KernelDensity) -> Vec<f64> {
    let mut running = f64::NEG_INFINITY;
    let raw: Vec<f64> = kde
        .support()
        .iter()
        .map(|&x| {
            running = running.max(kde.cumulative(x));
            running
        })
        .collect();

    let first = raw[0];
    let span = raw[raw.len() - 1] - first;
    if span <= 0.0 {
        return raw;
    }
    raw.iter()
        .map(|c| {
            let p = ((c - first) / span).clamp(0.0, 1.0);
            if p < TAIL_SNAP {
                0.0
            } else if p > 1.0 - TAIL_SNAP {
                1.0
            } else {
                p
            }
        })
        .collect()
}

/// Inverts a non-decreasing `(support, cdf)` table at each probability of
/// `grid`, taking the leftmost crossing on flat stretches.
fn invert_table(support: &[f64], cdf: &[f64], grid: &[f64]) -> Vec<f64> {
    let last = support.len() - 1;
    grid.iter()
        .map(|&p| {
            let k = cdf.partition_point(|&c| c < p).min(last);
            if k == 0 {
                return support[0];
            }
            let (c0, c1) = (cdf[k - 1], cdf[k]);
            if c1 <= c0 {
                return support[k];
            }
            let t = (p - c0) / (c1 - c0);
            support[k - 1] + t * (support[k] - support[k - 1])
        })
        .collect()
}
