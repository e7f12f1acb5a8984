use ndarray::Array1;

use crate::shared::Scalar;

pub mod gradient_descent;

/// Turns a freshly computed gradient into an in-place parameter change.
///
/// `curvature` is the accumulated Hessian diagonal for the same parameters;
/// implementations are free to ignore it. Any state the update rule needs
/// across calls (momentum, step counts) lives in the implementation.
pub trait Updater<A: Scalar> {
    fn update(&mut self, parameters: &mut Array1<A>, gradient: &Array1<A>, curvature: &Array1<A>);
}
