use ndarray::Array1;

use crate::shared::Scalar;

use super::Updater;

/// Steepest descent with a fixed learning rate.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent<A> {
    learning_rate: A,
}

impl<A> GradientDescent<A> {
    pub fn new(learning_rate: A) -> Self {
        Self { learning_rate }
    }
}

impl<A: Scalar> Updater<A> for GradientDescent<A> {
    fn update(&mut self, parameters: &mut Array1<A>, gradient: &Array1<A>, _curvature: &Array1<A>) {
        debug_assert_eq!(parameters.len(), gradient.len());
        let rate = self.learning_rate;
        parameters.zip_mut_with(gradient, |p, &g| *p = *p - rate * g);
    }
}

/// Steepest descent whose per-parameter step is shaped by the accumulated
/// Hessian diagonal, after Levenberg-Marquardt. `damping` keeps the step
/// finite where the curvature estimate is zero.
#[derive(Debug, Clone, Copy)]
pub struct LevenbergMarquardt<A> {
    learning_rate: A,
    damping: A,
}

impl<A> LevenbergMarquardt<A> {
    pub fn new(learning_rate: A, damping: A) -> Self {
        Self {
            learning_rate,
            damping,
        }
    }
}

impl<A: Scalar> Updater<A> for LevenbergMarquardt<A> {
    fn update(&mut self, parameters: &mut Array1<A>, gradient: &Array1<A>, curvature: &Array1<A>) {
        debug_assert_eq!(parameters.len(), gradient.len());
        debug_assert_eq!(parameters.len(), curvature.len());
        for ((p, &g), &h) in parameters.iter_mut().zip(gradient).zip(curvature) {
            *p = *p - self.learning_rate / (h + self.damping) * g;
        }
    }
}
