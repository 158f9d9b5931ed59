//! A single type over every uncertainty structure.
//!
//! Propagation code that mixes intervals, distributions, probability
//! boxes and Dempster-Shafer structures holds them as
//! [`UncertaintyStructure`] and aligns them through [`Stratified`].

use std::fmt;

use crate::dempster_shafer::DempsterShaferStructure;
use crate::distribution::Distribution;
use crate::interval::Interval;
use crate::pbox::ProbabilityBox;
use crate::space::{SamplingSpace, Stratified};

/// Any of the four uncertainty structures.
///
/// # Examples
/// ```
/// use u_strata::{Interval, Distribution, Stratified, StructureKind, UncertaintyStructure};
///
/// let mut inputs: Vec<UncertaintyStructure> = vec![
///     Interval::new(0.0, 1.0, 5).unwrap().into(),
///     Distribution::new(&[2.0, 3.0, 4.0], None, Some(7), 0.1).unwrap().into(),
/// ];
/// for s in &mut inputs {
///     s.restratify(20).unwrap();
/// }
/// assert!(inputs.iter().all(|s| s.stratum_count() == 20));
/// assert_eq!(inputs[1].kind(), StructureKind::Distribution);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum UncertaintyStructure {
    Interval(Interval),
    Distribution(Distribution),
    ProbabilityBox(ProbabilityBox),
    DempsterShafer(DempsterShaferStructure),
}

/// Variant tag of an [`UncertaintyStructure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Interval,
    Distribution,
    ProbabilityBox,
    DempsterShafer,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureKind::Interval => "interval",
            StructureKind::Distribution => "distribution",
            StructureKind::ProbabilityBox => "probability box",
            StructureKind::DempsterShafer => "Dempster-Shafer structure",
        };
        f.write_str(name)
    }
}

impl UncertaintyStructure {
    pub fn kind(&self) -> StructureKind {
        match self {
            UncertaintyStructure::Interval(_) => StructureKind::Interval,
            UncertaintyStructure::Distribution(_) => StructureKind::Distribution,
            UncertaintyStructure::ProbabilityBox(_) => StructureKind::ProbabilityBox,
            UncertaintyStructure::DempsterShafer(_) => StructureKind::DempsterShafer,
        }
    }

    /// Lower end of the current sampling range.
    pub fn minimum(&self) -> f64 {
        self.sampling_space().minimum()
    }

    /// Upper end of the current sampling range.
    pub fn maximum(&self) -> f64 {
        self.sampling_space().maximum()
    }
}

impl Stratified for UncertaintyStructure {
    fn sampling_space(&self) -> &SamplingSpace {
        match self {
            UncertaintyStructure::Interval(s) => s.sampling_space(),
            UncertaintyStructure::Distribution(s) => s.sampling_space(),
            UncertaintyStructure::ProbabilityBox(s) => s.sampling_space(),
            UncertaintyStructure::DempsterShafer(s) => s.sampling_space(),
        }
    }

    fn sampling_space_mut(&mut self) -> &mut SamplingSpace {
        match self {
            UncertaintyStructure::Interval(s) => s.sampling_space_mut(),
            UncertaintyStructure::Distribution(s) => s.sampling_space_mut(),
            UncertaintyStructure::ProbabilityBox(s) => s.sampling_space_mut(),
            UncertaintyStructure::DempsterShafer(s) => s.sampling_space_mut(),
        }
    }
}

impl From<Interval> for UncertaintyStructure {
    fn from(value: Interval) -> Self {
        UncertaintyStructure::Interval(value)
    }
}

impl From<Distribution> for UncertaintyStructure {
    fn from(value: Distribution) -> Self {
        UncertaintyStructure::Distribution(value)
    }
}

impl From<ProbabilityBox> for UncertaintyStructure {
    fn from(value: ProbabilityBox) -> Self {
        UncertaintyStructure::ProbabilityBox(value)
    }
}

impl From<DempsterShaferStructure> for UncertaintyStructure {
    fn from(value: DempsterShaferStructure) -> Self {
        UncertaintyStructure::DempsterShafer(value)
    }
}
