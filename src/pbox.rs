//! Probability boxes bounded by two independently fitted distributions.
//!
//! A [`ProbabilityBox`] holds two kernel-density bounds over one sampling
//! space spanning both samples. The raw bound CDFs may cross; every
//! envelope query returns the pointwise `[min, max]` of the two, so the
//! lower envelope never exceeds the upper one.

use tracing::debug;

use crate::cdf::CdfModel;
use crate::error::Result;
use crate::kde::KdeConfig;
use crate::space::{SamplingSpace, Stratified};

/// Imprecise distribution bounded by two candidate CDFs.
///
/// # Examples
/// ```
/// use u_strata::ProbabilityBox;
///
/// let low = [1.8, 2.0, 2.1, 2.3];
/// let high = [7.7, 8.0, 8.1, 8.4];
/// let pbox = ProbabilityBox::new(&low, None, &high, None, 50, 0.1).unwrap();
/// let [lower, upper] = pbox.cdf(5.0);
/// assert!(lower <= upper);
/// let [larger, smaller] = pbox.mean();
/// assert!(larger > smaller);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityBox {
    space: SamplingSpace,
    bound1: CdfModel,
    bound2: CdfModel,
}

impl ProbabilityBox {
    /// Fits both bounds with the default kernel and bandwidth rule.
    ///
    /// The sampling space spans the union of both samples' ranges with
    /// `num_strata` points.
    ///
    /// # Errors
    /// Any error of [`CdfModel::fit`] for either bound, or `InvalidStrata`
    /// if `num_strata == 0`.
    pub fn new(
        values1: &[f64],
        weights1: Option<&[f64]>,
        values2: &[f64],
        weights2: Option<&[f64]>,
        num_strata: usize,
        adjust: f64,
    ) -> Result<Self> {
        Self::with_config(
            values1,
            weights1,
            values2,
            weights2,
            num_strata,
            &KdeConfig::with_adjust(adjust),
        )
    }

    /// Fits both bounds with a full density configuration.
    ///
    /// # Errors
    /// See [`ProbabilityBox::new`].
    pub fn with_config(
        values1: &[f64],
        weights1: Option<&[f64]>,
        values2: &[f64],
        weights2: Option<&[f64]>,
        num_strata: usize,
        config: &KdeConfig,
    ) -> Result<Self> {
        let bound1 = CdfModel::fit(values1, weights1, config)?;
        let bound2 = CdfModel::fit(values2, weights2, config)?;
        let (lo1, hi1) = bound1.kde().sample_range();
        let (lo2, hi2) = bound2.kde().sample_range();
        let space = SamplingSpace::new(lo1.min(lo2), hi1.max(hi2), num_strata)?;
        debug!(
            minimum = space.minimum(),
            maximum = space.maximum(),
            num_strata,
            "built probability box"
        );
        Ok(Self {
            space,
            bound1,
            bound2,
        })
    }

    pub fn minimum(&self) -> f64 {
        self.space.minimum()
    }

    pub fn maximum(&self) -> f64 {
        self.space.maximum()
    }

    pub fn bound1(&self) -> &CdfModel {
        &self.bound1
    }

    pub fn bound2(&self) -> &CdfModel {
        &self.bound2
    }

    /// Densities of both bounds at `points`, `[bound1, bound2]`, without
    /// any envelope ordering.
    pub fn evaluate_density(&self, points: &[f64]) -> [Vec<f64>; 2] {
        [
            self.bound1.kde().evaluate_many(points),
            self.bound2.kde().evaluate_many(points),
        ]
    }

    /// Raw bound CDFs at `x`, `[cdf1, cdf2]`, each clamped to 0/1 outside
    /// its own support.
    pub fn bound_cdfs(&self, x: f64) -> [f64; 2] {
        [self.bound1.cdf(x), self.bound2.cdf(x)]
    }

    /// CDF envelope `[lower, upper]` at `x`.
    pub fn cdf(&self, x: f64) -> [f64; 2] {
        let [c1, c2] = self.bound_cdfs(x);
        [c1.min(c2), c1.max(c2)]
    }

    /// [`cdf`](Self::cdf) at each of `points`.
    pub fn cdf_many(&self, points: &[f64]) -> Vec<[f64; 2]> {
        points.iter().map(|&x| self.cdf(x)).collect()
    }

    /// Density-weighted means of both bounds over the current strata,
    /// larger first.
    ///
    /// A collapsed range returns its single value in both slots.
    pub fn mean(&self) -> [f64; 2] {
        if self.space.is_degenerate() {
            let v = self.space.minimum();
            return [v, v];
        }
        let [m1, m2] = self.bound_means();
        [m1.max(m2), m1.min(m2)]
    }

    /// Density-weighted standard deviations over the current strata, in
    /// the order of [`mean`](Self::mean): the larger-mean bound first.
    pub fn std_dev(&self) -> [f64; 2] {
        if self.space.is_degenerate() {
            return [0.0, 0.0];
        }
        let [m1, m2] = self.bound_means();
        let points = self.space.points();
        let s1 = self
            .bound1
            .discrete_std_dev(points, m1)
            .unwrap_or_else(|| self.bound1.kde().std_dev());
        let s2 = self
            .bound2
            .discrete_std_dev(points, m2)
            .unwrap_or_else(|| self.bound2.kde().std_dev());
        if m1 >= m2 {
            [s1, s2]
        } else {
            [s2, s1]
        }
    }

    /// Stratum-resolution quantiles of the lower and upper CDF envelopes.
    ///
    /// One scan over the strata, in the direction of
    /// [`Distribution::quantile`](crate::Distribution::quantile), resolves
    /// both slots: slot 0 against the lower envelope, slot 1 against the
    /// upper. A slot left unresolved takes the stratum at the end the scan
    /// reached (lowest for `p > 0.5`, highest otherwise).
    pub fn quantile(&self, p: f64) -> [f64; 2] {
        let points = self.space.points();
        let n = points.len();
        let descending = p > 0.5;
        let crossed = |c: f64| if descending { c <= p } else { c >= p };
        let mut found: [Option<f64>; 2] = [None, None];

        for i in 0..n {
            let x = if descending { points[n - 1 - i] } else { points[i] };
            let envelope = self.cdf(x);
            for (slot, c) in found.iter_mut().zip(envelope) {
                if slot.is_none() && crossed(c) {
                    *slot = Some(x);
                }
            }
            if found.iter().all(Option::is_some) {
                break;
            }
        }

        let fallback = if descending { points[0] } else { points[n - 1] };
        found.map(|slot| slot.unwrap_or(fallback))
    }

    /// Discrete means `[bound1, bound2]`, each falling back to the exact
    /// estimate mean when its density vanishes on every stratum.
    fn bound_means(&self) -> [f64; 2] {
        let points = self.space.points();
        [&self.bound1, &self.bound2].map(|bound| {
            bound
                .discrete_mean(points)
                .unwrap_or_else(|| bound.kde().mean())
        })
    }
}

impl Stratified for ProbabilityBox {
    fn sampling_space(&self) -> &SamplingSpace {
        &self.space
    }

    fn sampling_space_mut(&mut self) -> &mut SamplingSpace {
        &mut self.space
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(60))]

        #[test]
        fn envelope_ordered(
            values1 in proptest::collection::vec(-50.0_f64..50.0, 1..25),
            values2 in proptest::collection::vec(-50.0_f64..50.0, 1..25),
            x in -100.0_f64..100.0,
        ) {
            let pbox = ProbabilityBox::new(&values1, None, &values2, None, 30, 0.1).unwrap();
            let [lower, upper] = pbox.cdf(x);
            prop_assert!(lower <= upper);
            prop_assert!((0.0..=1.0).contains(&lower) && (0.0..=1.0).contains(&upper));
        }

        #[test]
        fn raw_bounds_non_decreasing(
            values1 in proptest::collection::vec(-50.0_f64..50.0, 1..25),
            values2 in proptest::collection::vec(-50.0_f64..50.0, 1..25),
        ) {
            let pbox = ProbabilityBox::new(&values1, None, &values2, None, 40, 0.1).unwrap();
            let mut prev = [0.0, 0.0];
            for &x in pbox.sample_space() {
                let c = pbox.bound_cdfs(x);
                prop_assert!(c[0] >= prev[0] && c[1] >= prev[1]);
                prev = c;
            }
        }

        #[test]
        fn mean_larger_first(
            values1 in proptest::collection::vec(-50.0_f64..50.0, 1..25),
            values2 in proptest::collection::vec(-50.0_f64..50.0, 1..25),
        ) {
            let pbox = ProbabilityBox::new(&values1, None, &values2, None, 30, 0.1).unwrap();
            let [first, second] = pbox.mean();
            prop_assert!(first >= second);
        }
    }
}
