use ndarray::Array1;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::shared::Scalar;

/// Draws `len` independent samples from the half-open interval `[low, high)`.
pub fn uniform<A: Scalar, R: Rng + ?Sized>(
    len: usize,
    low: A,
    high: A,
    rng: &mut R,
) -> Array1<A> {
    Array1::random_using(len, Uniform::new(low, high), rng)
}
