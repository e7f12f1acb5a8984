use conv::ValueFrom;
use ndarray::NdFloat;
use ndarray_rand::rand_distr::uniform::SampleUniform;

/// Scalar type every buffer in the crate is made of.
pub trait Scalar: NdFloat + SampleUniform + ValueFrom<usize> {}

impl Scalar for f32 {}
impl Scalar for f64 {}
