use ndarray::{Array1, Axis};

use crate::activation::ActivationFunction;
use crate::shared::Scalar;
use crate::updater::Updater;

use super::{ActivationLayer, Layer, LayerBase};

/// Fully-connected layer: every output unit reads every input unit.
///
/// Weights are stored flat in row-major order; row `r` holds the fan-in
/// weights of output unit `r`.
pub struct DenseLayer<A, F> {
    inner: ActivationLayer<A, F>,
}

impl<A: Scalar, F: ActivationFunction<A>> DenseLayer<A, F> {
    pub fn new(in_size: usize, out_size: usize, activation: F) -> Self {
        Self {
            inner: ActivationLayer::new(
                in_size,
                out_size,
                in_size * out_size,
                out_size,
                activation,
            ),
        }
    }
}

impl<A: Scalar, F: ActivationFunction<A>> Layer<A> for DenseLayer<A, F> {
    fn base(&self) -> &LayerBase<A> {
        &self.inner.base
    }

    fn base_mut(&mut self) -> &mut LayerBase<A> {
        &mut self.inner.base
    }

    fn fan_in_size(&self) -> usize {
        self.in_size()
    }

    fn connection_size(&self) -> usize {
        self.in_size() * self.out_size() + self.out_size()
    }

    fn activation_function(&self) -> &dyn ActivationFunction<A> {
        &self.inner.activation
    }

    fn forward_propagation(&mut self, input: &Array1<A>) -> &Array1<A> {
        let ActivationLayer { base, activation } = &mut self.inner;
        debug_assert_eq!(input.len(), base.in_size);
        base.input.assign(input);
        let weight = base
            .weight
            .view()
            .into_shape((base.out_size, base.in_size))
            .unwrap();
        let pre = weight.dot(input) + &base.bias;
        base.output = pre.mapv(|x| activation.compute(x));
        &base.output
    }

    fn back_propagation(
        &mut self,
        current_delta: &Array1<A>,
        updater: &mut dyn Updater<A>,
    ) -> &Array1<A> {
        let ActivationLayer { base, activation } = &mut self.inner;
        debug_assert_eq!(current_delta.len(), base.out_size);
        let delta = current_delta * &base.output.mapv(|y| activation.derivative(y));
        let weight = base
            .weight
            .view()
            .into_shape((base.out_size, base.in_size))
            .unwrap();
        // the delta handed to the predecessor must see the pre-update weights
        let prev_delta = delta.dot(&weight);
        let weight_grad = delta
            .view()
            .insert_axis(Axis(1))
            .dot(&base.input.view().insert_axis(Axis(0)))
            .into_shape(base.weight.len())
            .unwrap();
        updater.update(&mut base.weight, &weight_grad, &base.weight_hessian);
        updater.update(&mut base.bias, &delta, &base.bias_hessian);
        base.prev_delta = prev_delta;
        &base.prev_delta
    }

    fn back_propagation_2nd(&mut self, current_delta2: &Array1<A>) -> &Array1<A> {
        let ActivationLayer { base, activation } = &mut self.inner;
        debug_assert_eq!(current_delta2.len(), base.out_size);
        let delta2 = current_delta2
            * &base.output.mapv(|y| {
                let d = activation.derivative(y);
                d * d
            });
        let weight_sq = base
            .weight
            .mapv(|w| w * w)
            .into_shape((base.out_size, base.in_size))
            .unwrap();
        let prev_delta2 = delta2.dot(&weight_sq);
        let input_sq = base.input.mapv(|x| x * x);
        let weight_curvature = delta2
            .view()
            .insert_axis(Axis(1))
            .dot(&input_sq.view().insert_axis(Axis(0)))
            .into_shape(base.weight_hessian.len())
            .unwrap();
        base.weight_hessian = &base.weight_hessian + &weight_curvature;
        base.bias_hessian = &base.bias_hessian + &delta2;
        base.prev_delta2 = prev_delta2;
        &base.prev_delta2
    }
}
