//! Dempster-Shafer structures: probability mass assigned to intervals.
//!
//! Each focal element is a closed interval `[lo, hi]` carrying a mass; the
//! masses sum to one. For a threshold `x` the structure bounds
//! `P(X ≤ x)` by
//!
//! - **belief**: mass of focal elements lying entirely below `x`
//!   (`hi < x`), and
//! - **plausibility**: mass of focal elements reaching down to `x` or
//!   below (`lo ≤ x`), i.e. those that overlap `(−∞, x]`.
//!
//! Combination rules are not provided.

use crate::error::{ensure_finite, Result, UncertaintyError};
use crate::space::{SamplingSpace, Stratified};
use crate::stats::compensated_sum;

/// Relative tolerance on the total mass, per focal element.
const MASS_TOLERANCE: f64 = 1e-9;

/// Focal intervals with masses over a sampling space spanning all of them.
///
/// # Examples
/// ```
/// use u_strata::DempsterShaferStructure;
///
/// let dss = DempsterShaferStructure::new(
///     &[(0.0, 2.0), (1.0, 4.0), (3.0, 5.0)],
///     &[0.5, 0.3, 0.2],
///     6,
/// )
/// .unwrap();
/// assert_eq!(dss.probability_bounds(2.5), [0.5, 0.8]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DempsterShaferStructure {
    space: SamplingSpace,
    intervals: Vec<(f64, f64)>,
    masses: Vec<f64>,
}

impl DempsterShaferStructure {
    /// Builds a structure from parallel `intervals` and `masses`.
    ///
    /// Reversed pairs are accepted and stored as `(min, max)`.
    ///
    /// # Errors
    /// - `EmptyInput` if there are no focal elements.
    /// - `MismatchedLength` if the two slices differ in length.
    /// - `NonFinite` for a NaN/∞ interval edge or mass.
    /// - `InvalidMass` if a mass is negative or the total is not 1.
    /// - `InvalidStrata` if `num_strata == 0`.
    pub fn new(intervals: &[(f64, f64)], masses: &[f64], num_strata: usize) -> Result<Self> {
        if intervals.is_empty() {
            return Err(UncertaintyError::EmptyInput);
        }
        if intervals.len() != masses.len() {
            return Err(UncertaintyError::MismatchedLength {
                values: intervals.len(),
                weights: masses.len(),
            });
        }
        let edges: Vec<f64> = intervals.iter().flat_map(|&(a, b)| [a, b]).collect();
        ensure_finite(&edges, "focal interval edge")?;
        ensure_finite(masses, "mass")?;

        if let Some(m) = masses.iter().find(|&&m| m < 0.0) {
            return Err(UncertaintyError::InvalidMass(format!(
                "masses must be non-negative, got {m}"
            )));
        }
        let total = compensated_sum(masses.iter().copied());
        if (total - 1.0).abs() > MASS_TOLERANCE * masses.len() as f64 {
            return Err(UncertaintyError::InvalidMass(format!(
                "masses must sum to 1, got {total}"
            )));
        }

        let intervals: Vec<(f64, f64)> = intervals
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect();
        let minimum = intervals
            .iter()
            .map(|&(lo, _)| lo)
            .fold(f64::INFINITY, f64::min);
        let maximum = intervals
            .iter()
            .map(|&(_, hi)| hi)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            space: SamplingSpace::new(minimum, maximum, num_strata)?,
            intervals,
            masses: masses.to_vec(),
        })
    }

    pub fn minimum(&self) -> f64 {
        self.space.minimum()
    }

    pub fn maximum(&self) -> f64 {
        self.space.maximum()
    }

    /// Focal intervals as `(lo, hi)` with `lo ≤ hi`.
    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.intervals
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Total mass of focal elements entirely below `x`.
    pub fn belief(&self, x: f64) -> f64 {
        self.mass_where(|_, hi| hi < x)
    }

    /// Total mass of focal elements overlapping `(−∞, x]`.
    pub fn plausibility(&self, x: f64) -> f64 {
        self.mass_where(|lo, _| lo <= x)
    }

    /// `[belief(x), plausibility(x)]`, bounding `P(X ≤ x)`.
    pub fn probability_bounds(&self, x: f64) -> [f64; 2] {
        [self.belief(x), self.plausibility(x)]
    }

    fn mass_where<F>(&self, keep: F) -> f64
    where
        F: Fn(f64, f64) -> bool,
    {
        compensated_sum(
            self.intervals
                .iter()
                .zip(&self.masses)
                .filter(|(&(lo, hi), _)| keep(lo, hi))
                .map(|(_, &m)| m),
        )
    }
}

impl Stratified for DempsterShaferStructure {
    fn sampling_space(&self) -> &SamplingSpace {
        &self.space
    }

    fn sampling_space_mut(&mut self) -> &mut SamplingSpace {
        &mut self.space
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DempsterShaferStructure {
        DempsterShaferStructure::new(&[(0.0, 2.0), (1.0, 4.0), (3.0, 5.0)], &[0.5, 0.3, 0.2], 6)
            .unwrap()
    }

    #[test]
    fn test_space_spans_focal_elements() {
        let dss = sample();
        assert_eq!(dss.minimum(), 0.0);
        assert_eq!(dss.maximum(), 5.0);
        assert_eq!(dss.sample_space(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_belief_and_plausibility() {
        let dss = sample();
        assert_eq!(dss.probability_bounds(-1.0), [0.0, 0.0]);
        assert_eq!(dss.probability_bounds(0.0), [0.0, 0.5]);
        // Upper edge equal to x is not strictly below it.
        assert_eq!(dss.belief(2.0), 0.0);
        assert_eq!(dss.probability_bounds(2.5), [0.5, 0.8]);
        assert_eq!(dss.probability_bounds(6.0), [1.0, 1.0]);
    }

    #[test]
    fn test_reversed_pairs_normalised() {
        let dss = DempsterShaferStructure::new(&[(4.0, 1.0)], &[1.0], 2).unwrap();
        assert_eq!(dss.intervals(), &[(1.0, 4.0)]);
        assert_eq!(dss.sample_space(), &[1.0, 4.0]);
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            DempsterShaferStructure::new(&[], &[], 3).unwrap_err(),
            UncertaintyError::EmptyInput
        );
        assert_eq!(
            DempsterShaferStructure::new(&[(0.0, 1.0)], &[0.5, 0.5], 3).unwrap_err(),
            UncertaintyError::MismatchedLength {
                values: 1,
                weights: 2
            }
        );
        assert!(matches!(
            DempsterShaferStructure::new(&[(0.0, f64::NAN)], &[1.0], 3),
            Err(UncertaintyError::NonFinite { .. })
        ));
        assert!(matches!(
            DempsterShaferStructure::new(&[(0.0, 1.0), (1.0, 2.0)], &[1.5, -0.5], 3),
            Err(UncertaintyError::InvalidMass(_))
        ));
        assert!(matches!(
            DempsterShaferStructure::new(&[(0.0, 1.0), (1.0, 2.0)], &[0.5, 0.4], 3),
            Err(UncertaintyError::InvalidMass(_))
        ));
        assert_eq!(
            DempsterShaferStructure::new(&[(0.0, 1.0)], &[1.0], 0).unwrap_err(),
            UncertaintyError::InvalidStrata(0)
        );
    }

    #[test]
    fn test_mass_rounding_tolerated() {
        let masses = [0.1; 10];
        assert!(DempsterShaferStructure::new(&[(0.0, 1.0); 10], &masses, 3).is_ok());
    }

    #[test]
    fn test_draw_sample_and_restratify() {
        let mut dss = sample();
        assert_eq!(dss.draw_sample(2).unwrap(), 2.0);
        dss.restratify(11).unwrap();
        assert_eq!(dss.draw_sample(1).unwrap(), 0.5);
        assert!(dss.draw_sample(11).is_err());
    }
}
