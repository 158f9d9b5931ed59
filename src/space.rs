//! Discretised value ranges shared by every uncertainty structure.
//!
//! A [`SamplingSpace`] is `numStrata` evenly spaced points from `minimum` to
//! `maximum`, both inclusive. A propagator aligns several structures to a
//! common stratum count with [`Stratified::restratify`] and then indexes
//! them jointly with [`Stratified::draw_sample`].
//!
//! The point vector is never edited in place: `restratify` and `resize`
//! validate their arguments, build a new vector and swap it in, so a
//! failed call leaves the space untouched.

use tracing::debug;

use crate::error::{Result, UncertaintyError};
use crate::stats::linspace;

/// Evenly spaced strata over a closed range.
///
/// # Examples
/// ```
/// use u_strata::SamplingSpace;
///
/// let space = SamplingSpace::new(0.0, 10.0, 11).unwrap();
/// assert_eq!(space.stratum_count(), 11);
/// assert_eq!(space.draw_sample(5).unwrap(), 5.0);
/// assert!(space.draw_sample(11).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingSpace {
    minimum: f64,
    maximum: f64,
    points: Vec<f64>,
}

impl SamplingSpace {
    /// Creates `num_strata` points spanning `[minimum, maximum]`.
    ///
    /// # Errors
    /// - `NonFinite` if either bound is NaN/∞.
    /// - `InvalidRange` if `minimum > maximum`.
    /// - `InvalidStrata` if `num_strata < 1`.
    pub fn new(minimum: f64, maximum: f64, num_strata: usize) -> Result<Self> {
        Ok(Self {
            minimum,
            maximum,
            points: strata(minimum, maximum, num_strata)?,
        })
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Number of strata.
    pub fn stratum_count(&self) -> usize {
        self.points.len()
    }

    /// The strata in ascending order.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// `true` when the range has collapsed to a single value.
    pub fn is_degenerate(&self) -> bool {
        self.minimum == self.maximum
    }

    /// Regenerates the strata with `num_strata` points over the current range.
    ///
    /// # Errors
    /// `InvalidStrata` if `num_strata < 1`; the space is left unchanged.
    pub fn restratify(&mut self, num_strata: usize) -> Result<()> {
        let points = strata(self.minimum, self.maximum, num_strata)?;
        debug!(
            from = self.points.len(),
            to = num_strata,
            "restratified sampling space"
        );
        self.points = points;
        Ok(())
    }

    /// Regenerates the strata over `[minimum, maximum]`, keeping the count.
    ///
    /// # Errors
    /// `NonFinite` or `InvalidRange` for bad bounds; the space is left
    /// unchanged.
    pub fn resize(&mut self, minimum: f64, maximum: f64) -> Result<()> {
        let points = strata(minimum, maximum, self.points.len())?;
        debug!(
            old_min = self.minimum,
            old_max = self.maximum,
            new_min = minimum,
            new_max = maximum,
            "resized sampling space"
        );
        self.minimum = minimum;
        self.maximum = maximum;
        self.points = points;
        Ok(())
    }

    /// The value of stratum `index`.
    ///
    /// # Errors
    /// `OutOfRange` if `index >= stratum_count()`.
    pub fn draw_sample(&self, index: usize) -> Result<f64> {
        self.points
            .get(index)
            .copied()
            .ok_or(UncertaintyError::OutOfRange {
                index,
                count: self.points.len(),
            })
    }
}

fn strata(minimum: f64, maximum: f64, num_strata: usize) -> Result<Vec<f64>> {
    for (context, value) in [("minimum", minimum), ("maximum", maximum)] {
        if !value.is_finite() {
            return Err(UncertaintyError::NonFinite { context, value });
        }
    }
    if minimum > maximum {
        return Err(UncertaintyError::InvalidRange { minimum, maximum });
    }
    if num_strata < 1 {
        return Err(UncertaintyError::InvalidStrata(num_strata));
    }
    Ok(linspace(minimum, maximum, num_strata))
}

/// Capability shared by every structure backed by a [`SamplingSpace`].
///
/// Implementors only expose their space; the stratum operations are
/// provided.
pub trait Stratified {
    fn sampling_space(&self) -> &SamplingSpace;

    fn sampling_space_mut(&mut self) -> &mut SamplingSpace;

    fn stratum_count(&self) -> usize {
        self.sampling_space().stratum_count()
    }

    /// Current strata in ascending order.
    fn sample_space(&self) -> &[f64] {
        self.sampling_space().points()
    }

    fn restratify(&mut self, num_strata: usize) -> Result<()> {
        self.sampling_space_mut().restratify(num_strata)
    }

    fn resize(&mut self, minimum: f64, maximum: f64) -> Result<()> {
        self.sampling_space_mut().resize(minimum, maximum)
    }

    fn draw_sample(&self, index: usize) -> Result<f64> {
        self.sampling_space().draw_sample(index)
    }
}

impl Stratified for SamplingSpace {
    fn sampling_space(&self) -> &SamplingSpace {
        self
    }

    fn sampling_space_mut(&mut self) -> &mut SamplingSpace {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_semantics() {
        let space = SamplingSpace::new(0.0, 10.0, 11).unwrap();
        let expected: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        assert_eq!(space.points(), expected.as_slice());
    }

    #[test]
    fn test_single_stratum_is_minimum() {
        let space = SamplingSpace::new(2.0, 9.0, 1).unwrap();
        assert_eq!(space.points(), &[2.0]);
    }

    #[test]
    fn test_invalid_construction() {
        assert_eq!(
            SamplingSpace::new(5.0, 1.0, 3).unwrap_err(),
            UncertaintyError::InvalidRange {
                minimum: 5.0,
                maximum: 1.0
            }
        );
        assert_eq!(
            SamplingSpace::new(0.0, 1.0, 0).unwrap_err(),
            UncertaintyError::InvalidStrata(0)
        );
        assert!(matches!(
            SamplingSpace::new(f64::NAN, 1.0, 3),
            Err(UncertaintyError::NonFinite { context: "minimum", .. })
        ));
    }

    #[test]
    fn test_degenerate_range() {
        let space = SamplingSpace::new(3.0, 3.0, 4).unwrap();
        assert!(space.is_degenerate());
        assert_eq!(space.points(), &[3.0; 4]);
    }

    #[test]
    fn test_draw_sample_bounds() {
        let space = SamplingSpace::new(0.0, 10.0, 11).unwrap();
        assert_eq!(space.draw_sample(0).unwrap(), 0.0);
        assert_eq!(space.draw_sample(10).unwrap(), 10.0);
        assert_eq!(
            space.draw_sample(11).unwrap_err(),
            UncertaintyError::OutOfRange {
                index: 11,
                count: 11
            }
        );
    }

    #[test]
    fn test_restratify_keeps_bounds() {
        let mut space = SamplingSpace::new(-2.0, 6.0, 5).unwrap();
        space.restratify(17).unwrap();
        assert_eq!(space.stratum_count(), 17);
        assert_eq!(space.points()[0], -2.0);
        assert_eq!(space.points()[16], 6.0);
    }

    #[test]
    fn test_failed_restratify_leaves_space() {
        let mut space = SamplingSpace::new(0.0, 1.0, 5).unwrap();
        let before = space.clone();
        assert!(space.restratify(0).is_err());
        assert_eq!(space, before);
    }

    #[test]
    fn test_resize_keeps_count() {
        let mut space = SamplingSpace::new(0.0, 1.0, 5).unwrap();
        space.resize(10.0, 20.0).unwrap();
        assert_eq!(space.points(), &[10.0, 12.5, 15.0, 17.5, 20.0]);
        assert_eq!(space.minimum(), 10.0);
        assert_eq!(space.maximum(), 20.0);

        let before = space.clone();
        assert!(space.resize(3.0, 2.0).is_err());
        assert_eq!(space, before);
    }

    #[test]
    fn test_trait_methods_delegate() {
        fn count<S: Stratified>(s: &S) -> usize {
            s.stratum_count()
        }
        let mut space = SamplingSpace::new(0.0, 4.0, 5).unwrap();
        assert_eq!(count(&space), 5);
        Stratified::restratify(&mut space, 3).unwrap();
        assert_eq!(Stratified::sample_space(&space), &[0.0, 2.0, 4.0]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn restratify_preserves_endpoints(
            min in -1e4_f64..1e4,
            width in 0.0_f64..1e4,
            n in 1_usize..100,
            m in 1_usize..100,
        ) {
            let max = min + width;
            let mut space = SamplingSpace::new(min, max, n).unwrap();
            space.restratify(m).unwrap();
            prop_assert_eq!(space.stratum_count(), m);
            prop_assert_eq!(space.points()[0], min);
            if m > 1 {
                prop_assert_eq!(space.points()[m - 1], max);
            }
        }

        #[test]
        fn strata_non_decreasing(
            min in -1e4_f64..1e4,
            width in 0.0_f64..1e4,
            n in 1_usize..200,
        ) {
            let space = SamplingSpace::new(min, min + width, n).unwrap();
            for w in space.points().windows(2) {
                prop_assert!(w[0] <= w[1]);
            }
        }
    }
}
