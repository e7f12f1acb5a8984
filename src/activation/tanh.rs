use crate::shared::Scalar;

use super::ActivationFunction;

pub struct Tanh;

impl<A: Scalar> ActivationFunction<A> for Tanh {
    fn compute(&self, x: A) -> A {
        x.tanh()
    }

    fn derivative(&self, y: A) -> A {
        A::one() - y * y
    }
}
