use ndarray::Array1;
use rand::RngCore;

use crate::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::initializer;
use crate::shared::Scalar;
use crate::updater::Updater;

pub mod dense;
pub mod input;

/// State every layer kind shares: declared geometry, trainable parameters,
/// curvature accumulators, and the caches written by the propagation passes.
///
/// All buffers are sized once, at construction. The caches (`input`,
/// `output`, `prev_delta`, `prev_delta2`) are overwritten on each pass; the
/// two Hessian buffers are only ever added to or divided, until a `reset`.
pub struct LayerBase<A> {
    pub(crate) in_size: usize,
    pub(crate) out_size: usize,
    pub(crate) input: Array1<A>,
    pub(crate) output: Array1<A>,
    pub(crate) prev_delta: Array1<A>,
    pub(crate) weight: Array1<A>,
    pub(crate) bias: Array1<A>,
    pub(crate) weight_hessian: Array1<A>,
    pub(crate) bias_hessian: Array1<A>,
    pub(crate) prev_delta2: Array1<A>,
}

impl<A: Scalar> LayerBase<A> {
    pub fn new(in_size: usize, out_size: usize, weight_dim: usize, bias_dim: usize) -> Self {
        Self {
            in_size,
            out_size,
            input: Array1::zeros(in_size),
            output: Array1::zeros(out_size),
            prev_delta: Array1::zeros(in_size),
            weight: Array1::zeros(weight_dim),
            bias: Array1::zeros(bias_dim),
            weight_hessian: Array1::zeros(weight_dim),
            bias_hessian: Array1::zeros(bias_dim),
            prev_delta2: Array1::zeros(in_size),
        }
    }

    pub(crate) fn init_weight(&mut self, fan_in: usize, rng: &mut dyn RngCore) {
        let spread = A::from(0.5).unwrap() / A::value_from(fan_in).unwrap().sqrt();
        self.weight = initializer::uniform(self.weight.len(), -spread, spread, rng);
        self.bias = initializer::uniform(self.bias.len(), -spread, spread, rng);
        self.weight_hessian.fill(A::zero());
        self.bias_hessian.fill(A::zero());
    }

    pub(crate) fn divide_hessian(&mut self, denominator: usize) {
        assert_ne!(denominator, 0, "hessian divided by an empty batch");
        let d = A::value_from(denominator).unwrap();
        self.weight_hessian.mapv_inplace(|h| h / d);
        self.bias_hessian.mapv_inplace(|h| h / d);
    }
}

/// Contract every layer in a chain satisfies.
///
/// Implementations hold their shared state in a [`LayerBase`] reached via
/// `base`/`base_mut` and add only the propagation algorithms and geometry
/// queries that differ between layer kinds.
pub trait Layer<A: Scalar> {
    fn base(&self) -> &LayerBase<A>;
    fn base_mut(&mut self) -> &mut LayerBase<A>;

    /// Number of inputs each output unit draws on; scales the initial
    /// parameter spread.
    fn fan_in_size(&self) -> usize;

    /// Number of distinct input-to-output connections, for introspection.
    fn connection_size(&self) -> usize;

    fn activation_function(&self) -> &dyn ActivationFunction<A>;

    /// Computes this layer's output from `input` and caches it.
    ///
    /// `input.len()` must equal `in_size`. The cached output feeds the
    /// successor when [`crate::network::Network`] walks the chain.
    fn forward_propagation(&mut self, input: &Array1<A>) -> &Array1<A>;

    /// Consumes the gradient of the loss with respect to this layer's
    /// output, applies the parameter gradients through `updater`, and
    /// caches and returns the gradient with respect to this layer's input.
    ///
    /// Must run after a forward pass has populated the caches.
    fn back_propagation(
        &mut self,
        current_delta: &Array1<A>,
        updater: &mut dyn Updater<A>,
    ) -> &Array1<A>;

    /// Second-order mirror of [`Layer::back_propagation`]: propagates the
    /// diagonal curvature of the loss and accumulates, never overwrites,
    /// the weight and bias Hessian buffers. Parameters are not touched.
    fn back_propagation_2nd(&mut self, current_delta2: &Array1<A>) -> &Array1<A>;

    fn in_size(&self) -> usize {
        self.base().in_size
    }

    fn out_size(&self) -> usize {
        self.base().out_size
    }

    fn param_size(&self) -> usize {
        self.base().weight.len() + self.base().bias.len()
    }

    /// Checks that `next` can consume this layer's output. A zero output
    /// size is treated as "not yet constrained" and passes the check; the
    /// input layer relies on this.
    fn connect(&self, next: &dyn Layer<A>) -> Result<()> {
        if self.out_size() != 0 && self.out_size() != next.in_size() {
            return Err(NetworkError::DimensionMismatch {
                out_size: self.out_size(),
                in_size: next.in_size(),
            });
        }
        Ok(())
    }

    /// Redraws weights and biases uniformly from
    /// `[-0.5/sqrt(fan_in), 0.5/sqrt(fan_in))` and zeroes the curvature
    /// buffers. Idempotent.
    fn reset(&mut self) {
        self.reset_with(&mut rand::thread_rng());
    }

    fn reset_with(&mut self, rng: &mut dyn RngCore) {
        let fan_in = self.fan_in_size();
        self.base_mut().init_weight(fan_in, rng);
    }

    /// Divides both curvature buffers by `denominator`, averaging the
    /// accumulated Hessian diagonal over a batch. Panics on zero.
    fn divide_hessian(&mut self, denominator: usize) {
        self.base_mut().divide_hessian(denominator);
    }

    fn output(&self) -> &Array1<A> {
        &self.base().output
    }

    fn delta(&self) -> &Array1<A> {
        &self.base().prev_delta
    }

    fn delta2(&self) -> &Array1<A> {
        &self.base().prev_delta2
    }

    fn weight(&self) -> &Array1<A> {
        &self.base().weight
    }

    fn weight_mut(&mut self) -> &mut Array1<A> {
        &mut self.base_mut().weight
    }

    fn bias(&self) -> &Array1<A> {
        &self.base().bias
    }

    fn bias_mut(&mut self) -> &mut Array1<A> {
        &mut self.base_mut().bias
    }

    fn weight_hessian(&self) -> &Array1<A> {
        &self.base().weight_hessian
    }

    fn bias_hessian(&self) -> &Array1<A> {
        &self.base().bias_hessian
    }
}

/// Pairs the shared layer state with one concrete activation, so layer
/// kinds that differ only in their nonlinearity share a single
/// parameter-lifecycle implementation.
pub struct ActivationLayer<A, F> {
    pub(crate) base: LayerBase<A>,
    pub(crate) activation: F,
}

impl<A: Scalar, F: ActivationFunction<A>> ActivationLayer<A, F> {
    pub fn new(
        in_size: usize,
        out_size: usize,
        weight_dim: usize,
        bias_dim: usize,
        activation: F,
    ) -> Self {
        Self {
            base: LayerBase::new(in_size, out_size, weight_dim, bias_dim),
            activation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::identity::Identity;
    use crate::layer::dense::DenseLayer;
    use crate::layer::input::InputLayer;

    #[test]
    fn connect_accepts_matching_or_unconstrained_sizes() {
        let a = DenseLayer::<f64, _>::new(3, 2, Identity);
        let b = DenseLayer::<f64, _>::new(2, 4, Identity);
        let c = DenseLayer::<f64, _>::new(3, 1, Identity);
        assert!(a.connect(&b).is_ok());
        assert_eq!(
            a.connect(&c),
            Err(NetworkError::DimensionMismatch {
                out_size: 2,
                in_size: 3,
            })
        );
        // a zero output size is not yet constrained and may feed anything
        let anchor = InputLayer::new();
        assert!(anchor.connect(&a).is_ok());
        assert!(anchor.connect(&c).is_ok());
        assert_eq!(anchor.activation_function().compute(2.5), 2.5);
    }
}
