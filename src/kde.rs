//! Weighted univariate kernel density estimation.
//!
//! # Model
//!
//! For samples `x₁…xₙ` with normalised weights `w₁…wₙ` (Σwᵢ = 1), kernel
//! `K` and bandwidth `h`:
//!
//! ```text
//! f(x) = Σ wᵢ · K((x − xᵢ)/h) / h
//! F(x) = Σ wᵢ · ∫₋∞^((x − xᵢ)/h) K(t) dt
//! ```
//!
//! # Bandwidth
//!
//! The bandwidth is chosen by a [`BandwidthRule`] from the *unweighted*
//! sample spread and then multiplied by [`KdeConfig::adjust`]. The spread
//! statistic is `A = min(s, IQR/1.349)` with `s` the sample standard
//! deviation, falling back to `s` when the IQR is zero.
//!
//! Reference: Silverman (1986), *Density Estimation for Statistics and
//! Data Analysis*, §3.4.2.
//!
//! # Support grid
//!
//! The fitted estimate carries a support grid spanning
//! `[min(x) − cut·h, max(x) + cut·h]`, on which CDF tables are built.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ensure_finite, Result, UncertaintyError};
use crate::kernel::KernelKind;
use crate::stats;

/// Default bandwidth multiplier applied to the rule-selected bandwidth.
pub const DEFAULT_BANDWIDTH_ADJUST: f64 = 0.1;

/// Default number of bandwidths the support extends past the data.
pub const DEFAULT_CUT: f64 = 10.0;

/// Smallest default support grid.
pub const MIN_DEFAULT_GRID: usize = 50;

/// IQR of the standard normal distribution.
const NORMAL_IQR: f64 = 1.349;

/// Rule for choosing the kernel bandwidth before `adjust` is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandwidthRule {
    /// `c_K · A · n^(−1/5)` with the kernel's normal-reference constant.
    #[default]
    NormalReference,
    /// Silverman's rule of thumb `0.9 · A · n^(−1/5)`.
    Silverman,
    /// A fixed bandwidth, still scaled by `adjust`.
    Fixed(f64),
}

/// Density estimation settings.
///
/// Deserialises with every field optional:
///
/// ```
/// use u_strata::kde::{BandwidthRule, KdeConfig};
/// use u_strata::kernel::KernelKind;
///
/// let config: KdeConfig = serde_json::from_str(
///     r#"{ "kernel": "epanechnikov", "bandwidth": { "fixed": 0.5 } }"#,
/// ).unwrap();
/// assert_eq!(config.kernel, KernelKind::Epanechnikov);
/// assert_eq!(config.bandwidth, BandwidthRule::Fixed(0.5));
/// assert_eq!(config.adjust, 0.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KdeConfig {
    pub kernel: KernelKind,
    pub bandwidth: BandwidthRule,
    /// Multiplier on the selected bandwidth; smaller values follow the
    /// samples more closely.
    pub adjust: f64,
    /// Support half-margin in bandwidths.
    pub cut: f64,
    /// Support grid length; `None` means `max(n, 50)`.
    pub grid_size: Option<usize>,
}

impl Default for KdeConfig {
    fn default() -> Self {
        Self {
            kernel: KernelKind::Gaussian,
            bandwidth: BandwidthRule::NormalReference,
            adjust: DEFAULT_BANDWIDTH_ADJUST,
            cut: DEFAULT_CUT,
            grid_size: None,
        }
    }
}

impl KdeConfig {
    /// Default configuration with a custom bandwidth multiplier.
    pub fn with_adjust(adjust: f64) -> Self {
        Self {
            adjust,
            ..Self::default()
        }
    }

    /// Checks every field against its admissible domain.
    ///
    /// # Errors
    /// `InvalidParameter` if `adjust ≤ 0`, `cut ≤ 0`, `grid_size < 2`, a
    /// fixed bandwidth is `≤ 0`, or any of them is not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.adjust.is_finite() || self.adjust <= 0.0 {
            return Err(UncertaintyError::InvalidParameter(format!(
                "bandwidth adjust must be a positive finite number, got {}",
                self.adjust
            )));
        }
        if !self.cut.is_finite() || self.cut <= 0.0 {
            return Err(UncertaintyError::InvalidParameter(format!(
                "support cut must be a positive finite number, got {}",
                self.cut
            )));
        }
        if let Some(size) = self.grid_size {
            if size < 2 {
                return Err(UncertaintyError::InvalidParameter(format!(
                    "support grid needs at least 2 points, got {size}"
                )));
            }
        }
        if let BandwidthRule::Fixed(h) = self.bandwidth {
            if !h.is_finite() || h <= 0.0 {
                return Err(UncertaintyError::InvalidParameter(format!(
                    "fixed bandwidth must be a positive finite number, got {h}"
                )));
            }
        }
        Ok(())
    }
}

/// Selects a bandwidth for `values` under `rule`, before `adjust`.
///
/// Returns `None` when the sample spread is zero (a single value, or all
/// values equal) and the rule depends on it.
///
/// # Examples
/// ```
/// use u_strata::kde::{select_bandwidth, BandwidthRule};
/// use u_strata::kernel::KernelKind;
///
/// let h = select_bandwidth(&[1.0, 2.0, 3.0, 4.0, 5.0], BandwidthRule::Silverman, KernelKind::Gaussian);
/// assert!(h.unwrap() > 0.0);
/// assert_eq!(select_bandwidth(&[2.0, 2.0], BandwidthRule::Silverman, KernelKind::Gaussian), None);
/// ```
pub fn select_bandwidth(values: &[f64], rule: BandwidthRule, kernel: KernelKind) -> Option<f64> {
    let constant = match rule {
        BandwidthRule::Fixed(h) => return Some(h),
        BandwidthRule::NormalReference => kernel.normal_reference_constant(),
        BandwidthRule::Silverman => 0.9,
    };
    let spread = sample_spread(values);
    if spread > 0.0 {
        Some(constant * spread * (values.len() as f64).powf(-0.2))
    } else {
        None
    }
}

/// `A = min(s, IQR/1.349)`, or `s` when the IQR vanishes; `0` for n < 2.
fn sample_spread(values: &[f64]) -> f64 {
    let std_dev = stats::sample_std_dev(values).unwrap_or(0.0);
    let iqr = stats::interquartile_range(values).unwrap_or(0.0) / NORMAL_IQR;
    if iqr > 0.0 {
        std_dev.min(iqr)
    } else {
        std_dev
    }
}

/// Validates optional weights against `len` values and normalises them to
/// sum to one. `None` yields uniform weights.
fn normalized_weights(weights: Option<&[f64]>, len: usize) -> Result<Vec<f64>> {
    let Some(weights) = weights else {
        return Ok(vec![1.0 / len as f64; len]);
    };
    if weights.len() != len {
        return Err(UncertaintyError::MismatchedLength {
            values: len,
            weights: weights.len(),
        });
    }
    ensure_finite(weights, "weight")?;
    if let Some(w) = weights.iter().find(|w| **w < 0.0) {
        return Err(UncertaintyError::InvalidWeights(format!(
            "weights must be non-negative, got {w}"
        )));
    }
    let total = stats::compensated_sum(weights.iter().copied());
    if total <= 0.0 {
        return Err(UncertaintyError::InvalidWeights(
            "weights sum to zero".into(),
        ));
    }
    Ok(weights.iter().map(|w| w / total).collect())
}

/// A fitted weighted kernel density estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelDensity {
    samples: Vec<f64>,
    weights: Vec<f64>,
    kernel: KernelKind,
    bandwidth: f64,
    support: Vec<f64>,
}

impl KernelDensity {
    /// Fits a density estimate to `values`.
    ///
    /// # Errors
    /// - `EmptyInput` if `values` is empty.
    /// - `MismatchedLength` if `weights` has a different length.
    /// - `NonFinite` for NaN/∞ values or weights.
    /// - `InvalidWeights` for negative weights or a zero total.
    /// - `InvalidParameter` if `config` fails [`KdeConfig::validate`].
    ///
    /// # Examples
    /// ```
    /// use u_strata::kde::{KdeConfig, KernelDensity};
    ///
    /// let kde = KernelDensity::fit(&[1.0, 2.0, 2.5, 4.0], None, &KdeConfig::default()).unwrap();
    /// assert!(kde.bandwidth() > 0.0);
    /// assert!(kde.evaluate(2.0) > kde.evaluate(10.0));
    /// ```
    pub fn fit(values: &[f64], weights: Option<&[f64]>, config: &KdeConfig) -> Result<Self> {
        if values.is_empty() {
            return Err(UncertaintyError::EmptyInput);
        }
        ensure_finite(values, "value")?;
        let weights = normalized_weights(weights, values.len())?;
        config.validate()?;

        let base = match select_bandwidth(values, config.bandwidth, config.kernel) {
            Some(h) => h,
            None => {
                let center = stats::weighted_mean(values, &weights).unwrap_or(values[0]);
                let fallback = (center.abs() * 1e-3).max(1e-3);
                warn!(
                    n = values.len(),
                    fallback,
                    "zero sample spread, using fallback bandwidth scale"
                );
                config.kernel.normal_reference_constant()
                    * fallback
                    * (values.len() as f64).powf(-0.2)
            }
        };
        let bandwidth = base * config.adjust;

        let (lo, hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        let grid = config
            .grid_size
            .unwrap_or_else(|| values.len().max(MIN_DEFAULT_GRID));
        let margin = config.cut * bandwidth;
        let support = stats::linspace(lo - margin, hi + margin, grid);

        debug!(
            n = values.len(),
            bandwidth,
            grid,
            kernel = ?config.kernel,
            "fitted kernel density"
        );

        Ok(Self {
            samples: values.to_vec(),
            weights,
            kernel: config.kernel,
            bandwidth,
            support,
        })
    }

    /// Density `f(x)`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let sum = stats::compensated_sum(
            self.samples
                .iter()
                .zip(&self.weights)
                .map(|(xi, w)| w * self.kernel.density((x - xi) / h)),
        );
        sum / h
    }

    /// Density at each of `points`.
    pub fn evaluate_many(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Cumulative probability `F(x)` from the kernel integrals.
    pub fn cumulative(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        stats::compensated_sum(
            self.samples
                .iter()
                .zip(&self.weights)
                .map(|(xi, w)| w * self.kernel.integral((x - xi) / h)),
        )
    }

    /// Weighted sample mean, the exact first moment of the estimate.
    pub fn mean(&self) -> f64 {
        stats::compensated_sum(self.samples.iter().zip(&self.weights).map(|(x, w)| x * w))
    }

    /// Standard deviation of the estimate: weighted sample variance plus
    /// the kernel's own variance at this bandwidth.
    pub fn std_dev(&self) -> f64 {
        let mean = self.mean();
        let spread = stats::compensated_sum(
            self.samples
                .iter()
                .zip(&self.weights)
                .map(|(x, w)| w * (x - mean) * (x - mean)),
        );
        let h = self.bandwidth;
        (spread + h * h * self.kernel.variance()).sqrt()
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn kernel(&self) -> KernelKind {
        self.kernel
    }

    /// Support grid the CDF tables are built on.
    pub fn support(&self) -> &[f64] {
        &self.support
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Weights normalised to sum to one.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Smallest and largest fitted sample.
    pub fn sample_range(&self) -> (f64, f64) {
        self.samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            })
    }
}
