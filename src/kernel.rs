//! Smoothing kernels for density estimation.
//!
//! A kernel `K` is a symmetric probability density on the real line. The
//! estimator scales it by a bandwidth `h` and centres one copy on every
//! sample; `density` gives `K(u)` and `integral` gives `∫₋∞ᵘ K(t) dt`, the
//! piece needed to build CDF tables without numerical quadrature.
//!
//! | Kernel | K(u) | Support | Normal-reference constant |
//! |---|---|---|---|
//! | [`KernelKind::Gaussian`] | φ(u) | ℝ | 1.059 |
//! | [`KernelKind::Epanechnikov`] | ¾(1−u²) | \[−1, 1\] | 2.345 |

use serde::{Deserialize, Serialize};

/// 1/√(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Kernel shape used by [`KernelDensity`](crate::kde::KernelDensity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// Standard normal kernel.
    #[default]
    Gaussian,
    /// Parabolic kernel with compact support on `[-1, 1]`.
    Epanechnikov,
}

impl KernelKind {
    /// Kernel density `K(u)`.
    ///
    /// # Examples
    /// ```
    /// use u_strata::kernel::KernelKind;
    /// assert!((KernelKind::Gaussian.density(0.0) - 0.3989422804014327).abs() < 1e-15);
    /// assert_eq!(KernelKind::Epanechnikov.density(1.5), 0.0);
    /// ```
    pub fn density(self, u: f64) -> f64 {
        match self {
            KernelKind::Gaussian => FRAC_1_SQRT_2PI * (-0.5 * u * u).exp(),
            KernelKind::Epanechnikov => {
                if u.abs() <= 1.0 {
                    0.75 * (1.0 - u * u)
                } else {
                    0.0
                }
            }
        }
    }

    /// Kernel integral `∫₋∞ᵘ K(t) dt`, in `[0, 1]`.
    pub fn integral(self, u: f64) -> f64 {
        match self {
            KernelKind::Gaussian => gaussian_integral(u),
            KernelKind::Epanechnikov => {
                if u <= -1.0 {
                    0.0
                } else if u >= 1.0 {
                    1.0
                } else {
                    0.25 * (2.0 + 3.0 * u - u * u * u)
                }
            }
        }
    }

    /// Kernel variance `∫ u²·K(u) du`.
    pub fn variance(self) -> f64 {
        match self {
            KernelKind::Gaussian => 1.0,
            KernelKind::Epanechnikov => 0.2,
        }
    }

    /// Constant `c_K` of the normal-reference bandwidth `h = c_K·A·n^(−1/5)`.
    ///
    /// Reference: Silverman (1986), *Density Estimation for Statistics and
    /// Data Analysis*, Table 3.1 (canonical bandwidths rescaled to a normal
    /// reference density).
    pub fn normal_reference_constant(self) -> f64 {
        match self {
            KernelKind::Gaussian => 1.059,
            KernelKind::Epanechnikov => 2.345,
        }
    }
}

/// Standard normal CDF Φ(u).
///
/// # Algorithm
/// Abramowitz & Stegun formula 26.2.17 evaluated by Horner's rule on `|u|`,
/// reflected through `Φ(−u) = 1 − Φ(u)`.
///
/// # Accuracy
/// Maximum absolute error < 7.5 × 10⁻⁸.
fn gaussian_integral(u: f64) -> f64 {
    if u.is_nan() {
        return f64::NAN;
    }
    if u.is_infinite() {
        return if u > 0.0 { 1.0 } else { 0.0 };
    }

    let z = u.abs();
    let k = 1.0 / (1.0 + 0.231_641_9 * z);
    let poly = k
        * (0.319_381_530
            + k * (-0.356_563_782 + k * (1.781_477_937 + k * (-1.821_255_978 + k * 1.330_274_429))));
    let upper_tail = FRAC_1_SQRT_2PI * (-0.5 * z * z).exp() * poly;

    if u >= 0.0 {
        1.0 - upper_tail
    } else {
        upper_tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_integral_known_values() {
        let k = KernelKind::Gaussian;
        assert!((k.integral(0.0) - 0.5).abs() < 1e-7);
        assert!((k.integral(1.96) - 0.975).abs() < 1e-3);
        assert!((k.integral(-1.96) - 0.025).abs() < 1e-3);
        assert_eq!(k.integral(f64::INFINITY), 1.0);
        assert_eq!(k.integral(f64::NEG_INFINITY), 0.0);
        assert!(k.integral(f64::NAN).is_nan());
    }

    #[test]
    fn test_epanechnikov_integral_endpoints() {
        let k = KernelKind::Epanechnikov;
        assert_eq!(k.integral(-1.0), 0.0);
        assert_eq!(k.integral(1.0), 1.0);
        assert!((k.integral(0.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_kernels_integrate_to_one() {
        for kernel in [KernelKind::Gaussian, KernelKind::Epanechnikov] {
            // Trapezoid rule over [-8, 8]
            let n = 16_000;
            let step = 16.0 / n as f64;
            let mut area = 0.0;
            for i in 0..n {
                let a = -8.0 + i as f64 * step;
                area += 0.5 * (kernel.density(a) + kernel.density(a + step)) * step;
            }
            assert!((area - 1.0).abs() < 1e-6, "{kernel:?} area = {area}");
        }
    }

    #[test]
    fn test_kernel_variance() {
        for kernel in [KernelKind::Gaussian, KernelKind::Epanechnikov] {
            let n = 16_000;
            let step = 16.0 / n as f64;
            let second: f64 = (0..n)
                .map(|i| {
                    let u = -8.0 + (i as f64 + 0.5) * step;
                    u * u * kernel.density(u) * step
                })
                .sum();
            assert!((second - kernel.variance()).abs() < 1e-5, "{kernel:?}: {second}");
        }
    }

    #[test]
    fn test_default_is_gaussian() {
        assert_eq!(KernelKind::default(), KernelKind::Gaussian);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn integral_in_unit_interval(u in -50.0_f64..50.0) {
            for kernel in [KernelKind::Gaussian, KernelKind::Epanechnikov] {
                let c = kernel.integral(u);
                prop_assert!((0.0..=1.0).contains(&c));
            }
        }

        #[test]
        fn integral_symmetric(u in -10.0_f64..10.0) {
            for kernel in [KernelKind::Gaussian, KernelKind::Epanechnikov] {
                let s = kernel.integral(u) + kernel.integral(-u);
                prop_assert!((s - 1.0).abs() < 1e-12, "{kernel:?}: {s}");
            }
        }
    }
}
