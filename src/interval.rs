//! Crisp intervals: a quantity known only to lie in `[minimum, maximum]`.

use crate::error::Result;
use crate::space::{SamplingSpace, Stratified};

/// An interval with no likelihood information, explored stratum by stratum.
///
/// # Examples
/// ```
/// use u_strata::{Interval, Stratified};
///
/// let mut iv = Interval::new(0.0, 10.0, 11).unwrap();
/// assert_eq!(iv.draw_sample(5).unwrap(), 5.0);
/// iv.restratify(3).unwrap();
/// assert_eq!(iv.sample_space(), &[0.0, 5.0, 10.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    space: SamplingSpace,
}

impl Interval {
    /// # Errors
    /// See [`SamplingSpace::new`].
    pub fn new(minimum: f64, maximum: f64, num_strata: usize) -> Result<Self> {
        Ok(Self {
            space: SamplingSpace::new(minimum, maximum, num_strata)?,
        })
    }

    pub fn minimum(&self) -> f64 {
        self.space.minimum()
    }

    pub fn maximum(&self) -> f64 {
        self.space.maximum()
    }

    /// `true` if `x` lies within the closed interval.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.minimum() && x <= self.maximum()
    }

    /// Smallest interval covering both `self` and `other`, with `self`'s
    /// stratum count.
    pub fn hull(&self, other: &Interval) -> Result<Interval> {
        Interval::new(
            self.minimum().min(other.minimum()),
            self.maximum().max(other.maximum()),
            self.space.stratum_count(),
        )
    }
}

impl Stratified for Interval {
    fn sampling_space(&self) -> &SamplingSpace {
        &self.space
    }

    fn sampling_space_mut(&mut self) -> &mut SamplingSpace {
        &mut self.space
    }
}
