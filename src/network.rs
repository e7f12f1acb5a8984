use ndarray::Array1;
use rand::RngCore;

use crate::error::Result;
use crate::layer::input::InputLayer;
use crate::layer::Layer;
use crate::shared::Scalar;
use crate::updater::Updater;

/// Ordered chain of layers, anchored by a pass-through input layer.
///
/// The chain owns every layer; order in the vector is the only adjacency
/// there is. It grows by appending at the tail and never removes or
/// reorders layers, so the invariant "head exists and is the input layer"
/// holds for the whole lifetime of the value.
pub struct Network<A> {
    layers: Vec<Box<dyn Layer<A>>>,
}

impl<A: Scalar> Network<A> {
    pub fn new() -> Self {
        Self {
            layers: vec![Box::new(InputLayer::new())],
        }
    }

    /// Appends `layer` to the tail once the dimension check passes; a
    /// failed check leaves the chain untouched.
    pub fn add<L: Layer<A> + 'static>(&mut self, layer: L) -> Result<()> {
        self.tail().connect(&layer)?;
        self.layers.push(Box::new(layer));
        Ok(())
    }

    pub fn head(&self) -> &dyn Layer<A> {
        // the chain is never empty once constructed
        self.layers.first().unwrap().as_ref()
    }

    pub fn tail(&self) -> &dyn Layer<A> {
        self.layers.last().unwrap().as_ref()
    }

    pub fn tail_mut(&mut self) -> &mut dyn Layer<A> {
        self.layers.last_mut().unwrap().as_mut()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Layer<A>> + '_ {
        self.layers.iter().map(|layer| layer.as_ref())
    }

    /// Reinitializes every layer, head to tail.
    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.reset();
        }
    }

    pub fn reset_with(&mut self, rng: &mut dyn RngCore) {
        for layer in &mut self.layers {
            layer.reset_with(rng);
        }
    }

    /// Averages every layer's accumulated curvature over `denominator`
    /// samples.
    pub fn divide_hessian(&mut self, denominator: usize) {
        for layer in &mut self.layers {
            layer.divide_hessian(denominator);
        }
    }

    /// Runs the whole chain on `input`, feeding each layer's cached output
    /// to its successor, and returns the tail's output.
    pub fn forward_propagation(&mut self, input: &Array1<A>) -> Array1<A> {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward_propagation(&current).clone();
        }
        current
    }

    /// Walks tail to head handing each layer the gradient of the loss with
    /// respect to its output; returns the gradient that emerges at the
    /// head. Parameters are updated through `updater` along the way.
    pub fn back_propagation(
        &mut self,
        current_delta: &Array1<A>,
        updater: &mut dyn Updater<A>,
    ) -> Array1<A> {
        let mut current = current_delta.clone();
        for layer in self.layers.iter_mut().rev() {
            current = layer.back_propagation(&current, updater).clone();
        }
        current
    }

    /// Second-order mirror of [`Network::back_propagation`]: propagates
    /// diagonal curvature tail to head, accumulating each layer's Hessian
    /// buffers without touching parameters.
    pub fn back_propagation_2nd(&mut self, current_delta2: &Array1<A>) -> Array1<A> {
        let mut current = current_delta2.clone();
        for layer in self.layers.iter_mut().rev() {
            current = layer.back_propagation_2nd(&current).clone();
        }
        current
    }
}

impl<A: Scalar> Default for Network<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::identity::Identity;
    use crate::error::NetworkError;
    use crate::layer::dense::DenseLayer;
    use crate::updater::gradient_descent::GradientDescent;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn three_to_two() -> DenseLayer<f64, Identity> {
        let mut layer = DenseLayer::new(3, 2, Identity);
        *layer.weight_mut() = array![0.5, -1.0, 2.0, 1.5, 0.25, -0.5];
        *layer.bias_mut() = array![0.5, -1.0];
        layer
    }

    #[test]
    fn starts_with_an_input_layer() {
        let net = Network::<f64>::new();
        assert_eq!(net.len(), 1);
        assert!(!net.is_empty());
        assert_eq!(net.head().param_size(), 0);
        assert_eq!(net.head().out_size(), 0);
    }

    #[test]
    fn add_checks_dimensions() {
        let mut net = Network::new();
        net.add(three_to_two()).unwrap();
        let rejected = net.add(DenseLayer::new(4, 1, Identity));
        assert_eq!(
            rejected,
            Err(NetworkError::DimensionMismatch {
                out_size: 2,
                in_size: 4,
            })
        );
        // the failed add left the tail alone
        assert_eq!(net.len(), 2);
        assert_eq!(net.tail().in_size(), 3);
        assert_eq!(net.tail().out_size(), 2);

        net.add(DenseLayer::new(2, 1, Identity)).unwrap();
        assert_eq!(net.len(), 3);
        assert_eq!(net.tail().out_size(), 1);
    }

    #[test]
    fn forward_runs_the_whole_chain() {
        let mut net = Network::new();
        net.add(three_to_two()).unwrap();
        let out = net.forward_propagation(&array![1.0, 2.0, 3.0]);
        assert_eq!(out, array![5.0, -0.5]);
        assert_eq!(out.len(), net.tail().out_size());
        // every layer kept its own output cached; the anchor caches the
        // raw input it passed along
        assert_eq!(*net.head().output(), array![1.0, 2.0, 3.0]);
        for layer in net.iter().skip(1) {
            assert_eq!(layer.output().len(), layer.out_size());
        }
    }

    #[test]
    fn backward_reaches_the_head() {
        let mut net = Network::new();
        net.add(three_to_two()).unwrap();
        net.forward_propagation(&array![1.0, 2.0, 3.0]);
        let mut updater = GradientDescent::new(0.5);
        let delta_in = net.back_propagation(&array![1.0, 0.5], &mut updater);
        // the input layer hands the dense layer's delta through unchanged
        assert_eq!(delta_in, array![1.25, -0.875, 1.75]);
        assert_eq!(
            *net.tail().weight(),
            array![0.0, -2.0, 0.5, 1.25, -0.25, -1.25]
        );
        assert_eq!(*net.tail().bias(), array![0.0, -1.25]);
    }

    #[test]
    fn curvature_pass_accumulates_and_averages() {
        let mut net = Network::new();
        net.add(three_to_two()).unwrap();
        net.forward_propagation(&array![1.0, 2.0, 3.0]);
        let single = {
            net.back_propagation_2nd(&array![1.0, 0.5]);
            net.tail().weight_hessian().clone()
        };
        net.back_propagation_2nd(&array![1.0, 0.5]);
        assert_abs_diff_eq!(
            *net.tail().weight_hessian(),
            single.mapv(|h| 2.0 * h),
            epsilon = 1e-12
        );
        net.divide_hessian(2);
        assert_abs_diff_eq!(*net.tail().weight_hessian(), single, epsilon = 1e-12);
    }

    #[test]
    fn forward_matches_parameters_after_seeded_reset() {
        let mut net = Network::new();
        net.add(DenseLayer::new(3, 2, Identity)).unwrap();
        net.reset_with(&mut StdRng::seed_from_u64(77));
        let x = array![1.0, 2.0, 3.0];
        let w = net.tail().weight().clone().into_shape((2, 3)).unwrap();
        let expected = w.dot(&x) + net.tail().bias();
        let out = net.forward_propagation(&x);
        assert_abs_diff_eq!(out, expected, epsilon = 1e-12);
    }

    #[test]
    fn reset_walks_every_layer() {
        let mut net = Network::new();
        net.add(DenseLayer::new(3, 4, Identity)).unwrap();
        net.add(DenseLayer::new(4, 2, Identity)).unwrap();
        net.reset_with(&mut StdRng::seed_from_u64(13));
        for layer in net.iter().skip(1) {
            let spread = 0.5 / (layer.fan_in_size() as f64).sqrt();
            assert!(layer.weight().iter().all(|&w| (-spread..spread).contains(&w)));
            assert!(layer.weight().iter().any(|&w| w != 0.0));
            assert!(layer.bias().iter().all(|&b| (-spread..spread).contains(&b)));
        }
    }
}
