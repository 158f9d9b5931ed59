//! # u-strata
//!
//! Uncertainty structures for stratified Monte-Carlo propagation.
//!
//! A scalar input whose value is uncertain can be described as a crisp
//! interval, a kernel-density distribution fitted to weighted samples, a
//! probability box bounded by two such distributions, or a Dempster-Shafer
//! mass structure. Each one owns a discretised [`SamplingSpace`] so an
//! external propagation engine can align many inputs to a common stratum
//! count and draw joint samples by index. The crate knows nothing about
//! the model being propagated.
//!
//! ## Modules
//!
//! - [`space`]: sampling spaces and the [`Stratified`] capability
//! - [`interval`], [`distribution`], [`pbox`], [`dempster_shafer`]: the
//!   four structures
//! - [`structure`]: [`UncertaintyStructure`], one type over all four
//! - [`kde`], [`kernel`], [`cdf`], [`interp`]: weighted kernel density
//!   estimation with tabulated CDF and inverse CDF
//! - [`stats`], [`random`]: numerical helpers and seeded sampling
//! - [`error`]: [`UncertaintyError`]
//!
//! ## Design Philosophy
//!
//! - **Composition over inheritance**: every structure embeds a
//!   `SamplingSpace`; [`Stratified`] supplies the shared operations
//! - **Invariants by construction**: CDF tables are forced monotone, and
//!   probability-box envelopes are taken pointwise so they never invert
//! - **Property-based testing**: numerical invariants verified via proptest
//!
//! ## Example
//!
//! ```
//! use u_strata::{Distribution, Interval, Stratified, UncertaintyStructure};
//!
//! let load = Distribution::new(&[9.5, 10.0, 10.2, 10.9, 11.4], None, None, 0.1).unwrap();
//! let length = Interval::new(2.0, 3.0, 2).unwrap();
//!
//! let mut inputs: Vec<UncertaintyStructure> = vec![load.into(), length.into()];
//! for input in &mut inputs {
//!     input.restratify(10).unwrap();
//! }
//! let row: Vec<f64> = inputs.iter().map(|s| s.draw_sample(3).unwrap()).collect();
//! assert_eq!(row.len(), 2);
//! ```

pub mod cdf;
pub mod dempster_shafer;
pub mod distribution;
pub mod error;
pub mod interp;
pub mod interval;
pub mod kde;
pub mod kernel;
pub mod pbox;
pub mod random;
pub mod space;
pub mod stats;
pub mod structure;

pub use dempster_shafer::DempsterShaferStructure;
pub use distribution::Distribution;
pub use error::{Result, UncertaintyError};
pub use interval::Interval;
pub use kde::{BandwidthRule, KdeConfig};
pub use kernel::KernelKind;
pub use pbox::ProbabilityBox;
pub use space::{SamplingSpace, Stratified};
pub use structure::{StructureKind, UncertaintyStructure};
