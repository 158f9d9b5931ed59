//! Random number generation for inverse-transform sampling.
//!
//! # Reproducibility
//!
//! Every sampling method takes the generator as an argument. Use
//! [`create_rng`] with a fixed seed for reproducible draws; SmallRng is
//! deterministic for a given seed on the same platform.

use rand::Rng;

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_strata::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(7);
/// let u: f64 = rng.random();
/// assert!((0.0..1.0).contains(&u));
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Draws `n` independent Uniform\[0, 1) probabilities.
pub fn uniform_probabilities<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| rng.random::<f64>()).collect()
}
