use crate::shared::Scalar;

use super::ActivationFunction;

pub struct Sigmoid;

impl<A: Scalar> ActivationFunction<A> for Sigmoid {
    fn compute(&self, x: A) -> A {
        A::one() / (A::one() + (-x).exp())
    }

    fn derivative(&self, y: A) -> A {
        y * (A::one() - y)
    }
}
