//! Kernel-density distributions over a stratified sampling space.
//!
//! A [`Distribution`] fits a weighted KDE to raw samples and couples it with
//! a [`SamplingSpace`] spanning `[min(values), max(values)]`. Moments and
//! quantiles are computed **over the current discretisation**, not from the
//! continuous estimate, so their resolution follows the stratum count:
//!
//! - `mean = Σ sᵢ·f(sᵢ) / Σ f(sᵢ)` over strata `sᵢ`.
//! - `quantile(p)` scans the strata from the nearer tail: upward for
//!   `p ≤ 0.5`, downward for `p > 0.5`.

use rand::Rng;
use tracing::debug;

use crate::cdf::CdfModel;
use crate::error::{Result, UncertaintyError};
use crate::kde::KdeConfig;
use crate::random::uniform_probabilities;
use crate::space::{SamplingSpace, Stratified};

/// Default tail probability cut away by [`Distribution::prune_interval`].
pub const DEFAULT_PRUNE_TAIL: f64 = 1e-5;

/// A probability distribution estimated from weighted samples.
///
/// # Examples
/// ```
/// use u_strata::{Distribution, Stratified};
///
/// let d = Distribution::new(&[1.0, 1.0, 1.0, 2.0, 3.0], None, Some(5), 0.1).unwrap();
/// assert_eq!(d.stratum_count(), 5);
/// assert_eq!(d.cdf(0.5), 0.0);
/// assert_eq!(d.cdf(10.0), 1.0);
/// let mean = d.mean();
/// assert!((1.0..=3.0).contains(&mean));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    space: SamplingSpace,
    model: CdfModel,
}

impl Distribution {
    /// Fits a distribution with the default kernel and bandwidth rule.
    ///
    /// `num_strata` defaults to `values.len()`; `adjust` scales the
    /// bandwidth (see [`DEFAULT_BANDWIDTH_ADJUST`](crate::kde::DEFAULT_BANDWIDTH_ADJUST)).
    ///
    /// # Errors
    /// - `EmptyInput` if `values` is empty.
    /// - `MismatchedLength` if `weights` has a different length.
    /// - `InvalidStrata` if `num_strata == Some(0)`.
    /// - `NonFinite`, `InvalidWeights`, `InvalidParameter` for bad inputs.
    pub fn new(
        values: &[f64],
        weights: Option<&[f64]>,
        num_strata: Option<usize>,
        adjust: f64,
    ) -> Result<Self> {
        Self::with_config(values, weights, num_strata, &KdeConfig::with_adjust(adjust))
    }

    /// Fits a distribution with a full density configuration.
    ///
    /// # Errors
    /// See [`Distribution::new`].
    pub fn with_config(
        values: &[f64],
        weights: Option<&[f64]>,
        num_strata: Option<usize>,
        config: &KdeConfig,
    ) -> Result<Self> {
        let model = CdfModel::fit(values, weights, config)?;
        let (lo, hi) = model.kde().sample_range();
        let space = SamplingSpace::new(lo, hi, num_strata.unwrap_or(values.len()))?;
        Ok(Self { space, model })
    }

    pub fn minimum(&self) -> f64 {
        self.space.minimum()
    }

    pub fn maximum(&self) -> f64 {
        self.space.maximum()
    }

    /// The fitted density and its CDF tables.
    pub fn model(&self) -> &CdfModel {
        &self.model
    }

    /// Density at each of `points`; not restricted to the sampling space.
    pub fn evaluate_density(&self, points: &[f64]) -> Vec<f64> {
        self.model.kde().evaluate_many(points)
    }

    /// Cumulative probability at `x`.
    ///
    /// Queries below the estimate's support return `0.0`, above it `1.0`.
    pub fn cdf(&self, x: f64) -> f64 {
        self.model.cdf(x)
    }

    /// [`cdf`](Self::cdf) at each of `points`.
    pub fn cdf_many(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.model.cdf(x)).collect()
    }

    /// Inverse-CDF lookup; `p` is clamped to `[0, 1]`.
    pub fn inverse_cdf(&self, p: f64) -> f64 {
        self.model.inverse_cdf(p)
    }

    /// Density-weighted mean over the current strata.
    ///
    /// A collapsed range returns its single value. If the density vanishes
    /// on every stratum the exact mean of the estimate is returned.
    pub fn mean(&self) -> f64 {
        if self.space.is_degenerate() {
            return self.space.minimum();
        }
        self.model
            .discrete_mean(self.space.points())
            .unwrap_or_else(|| self.model.kde().mean())
    }

    /// Density-weighted standard deviation over the current strata.
    ///
    /// `0.0` for a collapsed range. If the density vanishes on every
    /// stratum the exact standard deviation of the estimate is returned.
    pub fn std_dev(&self) -> f64 {
        if self.space.is_degenerate() {
            return 0.0;
        }
        let mean = self.mean();
        self.model
            .discrete_std_dev(self.space.points(), mean)
            .unwrap_or_else(|| self.model.kde().std_dev())
    }

    /// Stratum-resolution quantile.
    ///
    /// For `p > 0.5` the strata are scanned from the top down and the first
    /// value with `cdf ≤ p` is returned (lowest stratum if none). Otherwise
    /// they are scanned from the bottom up and the first value with
    /// `cdf ≥ p` is returned (highest stratum if none).
    pub fn quantile(&self, p: f64) -> f64 {
        directional_quantile(self.space.points(), p, |x| self.model.cdf(x))
    }

    /// Draws `n` values by inverse-transform sampling.
    ///
    /// # Examples
    /// ```
    /// use u_strata::Distribution;
    /// use u_strata::random::create_rng;
    ///
    /// let d = Distribution::new(&[0.0, 1.0, 2.0, 3.0], None, None, 0.1).unwrap();
    /// let draws = d.draw_random_samples(100, &mut create_rng(1));
    /// assert_eq!(draws.len(), 100);
    /// ```
    pub fn draw_random_samples<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        uniform_probabilities(n, rng)
            .into_iter()
            .map(|p| self.model.inverse_cdf(p))
            .collect()
    }

    /// Narrows the sampling space to `[quantile(tail), quantile(1 − tail)]`,
    /// keeping the stratum count. The density is not refitted.
    ///
    /// # Errors
    /// - `InvalidParameter` if `tail` is outside `(0, 0.5]`.
    /// - `InvalidRange` if the quantiles come out inverted; the space is
    ///   left unchanged.
    pub fn prune_interval(&mut self, tail: f64) -> Result<()> {
        if !(tail > 0.0 && tail <= 0.5) {
            return Err(UncertaintyError::InvalidParameter(format!(
                "prune tail probability must be in (0, 0.5], got {tail}"
            )));
        }
        let lower = self.quantile(tail);
        let upper = self.quantile(1.0 - tail);
        debug!(tail, lower, upper, "pruning distribution range");
        self.space.resize(lower, upper)
    }
}

impl Stratified for Distribution {
    fn sampling_space(&self) -> &SamplingSpace {
        &self.space
    }

    fn sampling_space_mut(&mut self) -> &mut SamplingSpace {
        &mut self.space
    }
}

/// Quantile scan over ascending `points`, starting from the tail nearer `p`.
pub(crate) fn directional_quantile<F>(points: &[f64], p: f64, cdf: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let lowest = points[0];
    let highest = points[points.len() - 1];
    if p > 0.5 {
        points
            .iter()
            .rev()
            .copied()
            .find(|&x| cdf(x) <= p)
            .unwrap_or(lowest)
    } else {
        points
            .iter()
            .copied()
            .find(|&x| cdf(x) >= p)
            .unwrap_or(highest)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(60))]

        #[test]
        fn cdf_non_decreasing_over_strata(
            values in proptest::collection::vec(-100.0_f64..100.0, 2..40),
            strata in 2_usize..80,
        ) {
            let d = Distribution::new(&values, None, Some(strata), 0.1).unwrap();
            let mut prev = 0.0;
            for &x in d.sample_space() {
                let c = d.cdf(x);
                prop_assert!((0.0..=1.0).contains(&c));
                prop_assert!(c >= prev);
                prev = c;
            }
        }

        #[test]
        fn quantile_monotone_within_each_scan_direction(
            values in proptest::collection::vec(-100.0_f64..100.0, 2..40),
            a in 0.0_f64..=1.0,
            b in 0.0_f64..=1.0,
        ) {
            let d = Distribution::new(&values, None, Some(50), 0.1).unwrap();
            let (p, q) = if a <= b { (a, b) } else { (b, a) };
            prop_assume!((p <= 0.5) == (q <= 0.5));
            prop_assert!(d.quantile(p) <= d.quantile(q));
        }

        #[test]
        fn quantile_monotone_on_fine_strata(
            offset in -50.0_f64..50.0,
            scale in 0.5_f64..20.0,
        ) {
            let values: Vec<f64> = (0..200)
                .map(|i| offset + scale * ((i * 7919) % 200) as f64 / 200.0)
                .collect();
            let d = Distribution::new(&values, None, Some(400), 0.1).unwrap();
            let mut prev = f64::NEG_INFINITY;
            for i in 0..=20 {
                let p = i as f64 / 20.0;
                let q = d.quantile(p);
                prop_assert!(q >= prev, "quantile({p}) = {q} < {prev}");
                prev = q;
            }
        }

        #[test]
        fn stratum_values_within_bounds(
            values in proptest::collection::vec(-100.0_f64..100.0, 1..40),
            p in 0.0_f64..=1.0,
        ) {
            let d = Distribution::new(&values, None, Some(25), 0.1).unwrap();
            let q = d.quantile(p);
            prop_assert!(q >= d.minimum() && q <= d.maximum());
            let m = d.mean();
            prop_assert!(m >= d.minimum() - 1e-9 && m <= d.maximum() + 1e-9);
        }
    }
}
