use ndarray::Array1;

use crate::activation::identity::Identity;
use crate::activation::ActivationFunction;
use crate::shared::Scalar;
use crate::updater::Updater;

use super::{ActivationLayer, Layer, LayerBase};

/// Pass-through layer anchoring every chain.
///
/// Declares all four dimensions as zero so that it may precede a first real
/// layer of any width; the connection check treats a zero output size as
/// unconstrained. It owns no parameters, so both backward passes return
/// their argument unchanged.
pub struct InputLayer<A> {
    inner: ActivationLayer<A, Identity>,
}

impl<A: Scalar> InputLayer<A> {
    pub fn new() -> Self {
        Self {
            inner: ActivationLayer::new(0, 0, 0, 0, Identity),
        }
    }
}

impl<A: Scalar> Default for InputLayer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Scalar> Layer<A> for InputLayer<A> {
    fn base(&self) -> &LayerBase<A> {
        &self.inner.base
    }

    fn base_mut(&mut self) -> &mut LayerBase<A> {
        &mut self.inner.base
    }

    fn fan_in_size(&self) -> usize {
        1
    }

    fn connection_size(&self) -> usize {
        self.in_size()
    }

    fn activation_function(&self) -> &dyn ActivationFunction<A> {
        &self.inner.activation
    }

    fn forward_propagation(&mut self, input: &Array1<A>) -> &Array1<A> {
        self.inner.base.output = input.clone();
        &self.inner.base.output
    }

    fn back_propagation(
        &mut self,
        current_delta: &Array1<A>,
        _updater: &mut dyn Updater<A>,
    ) -> &Array1<A> {
        self.inner.base.prev_delta = current_delta.clone();
        &self.inner.base.prev_delta
    }

    fn back_propagation_2nd(&mut self, current_delta2: &Array1<A>) -> &Array1<A> {
        self.inner.base.prev_delta2 = current_delta2.clone();
        &self.inner.base.prev_delta2
    }
}
