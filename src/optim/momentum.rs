use crate::{error::Result, layers::dense::Layer, math::matrix::Matrix};

/// Decay applied to the previous velocity on every update.
pub const DEFAULT_MOMENTUM: f64 = 0.9;

/// SGD with classical momentum:
///   v = gamma·v_prev + learning_rate·grad
///   theta -= v
#[derive(Debug, Clone, Copy)]
pub struct Momentum {
    pub learning_rate: f64,
    pub gamma: f64,
}

impl Momentum {
    pub fn new(learning_rate: f64) -> Momentum {
        Momentum { learning_rate, gamma: DEFAULT_MOMENTUM }
    }

    pub fn with_gamma(learning_rate: f64, gamma: f64) -> Momentum {
        Momentum { learning_rate, gamma }
    }

    /// Applies one momentum update to a layer given its batch-averaged
    /// gradients. Velocities persist on the layer between calls.
    pub fn step(&self, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Matrix) -> Result<()> {
        layer.weight_velocity = self.velocity(&layer.weight_velocity, weights_grad)?;
        layer.bias_velocity = self.velocity(&layer.bias_velocity, biases_grad)?;
        layer.weights.subtract_assign(&layer.weight_velocity)?;
        layer.biases.subtract_assign(&layer.bias_velocity)?;
        Ok(())
    }

    fn velocity(&self, previous: &Matrix, grad: &Matrix) -> Result<Matrix> {
        (self.gamma * previous).add(&(self.learning_rate * grad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::Activation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layer() -> Layer {
        let mut rng = StdRng::seed_from_u64(0);
        let mut layer = Layer::new(2, 1, Activation::ReLU, &mut rng).unwrap();
        layer.weights = Matrix::from_rows(vec![vec![1.0, 1.0]]).unwrap();
        layer
    }

    #[test]
    fn first_step_is_plain_sgd() {
        let mut layer = layer();
        let opt = Momentum::new(0.1);
        let gw = Matrix::from_rows(vec![vec![1.0, -2.0]]).unwrap();
        let gb = Matrix::column(vec![0.5]);
        opt.step(&mut layer, &gw, &gb).unwrap();

        assert!((layer.weights[(0, 0)] - 0.9).abs() < 1e-12);
        assert!((layer.weights[(0, 1)] - 1.2).abs() < 1e-12);
        assert!((layer.biases[(0, 0)] + 0.05).abs() < 1e-12);
    }

    #[test]
    fn velocity_accumulates_across_steps() {
        let mut layer = layer();
        let opt = Momentum::new(0.1);
        let gw = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        let gb = Matrix::column(vec![0.0]);
        opt.step(&mut layer, &gw, &gb).unwrap();
        opt.step(&mut layer, &gw, &gb).unwrap();

        // v1 = 0.1, v2 = 0.9 * 0.1 + 0.1 = 0.19
        assert!((layer.weight_velocity[(0, 0)] - 0.19).abs() < 1e-12);
        assert!((layer.weights[(0, 0)] - (1.0 - 0.1 - 0.19)).abs() < 1e-12);
        assert_eq!(layer.weights[(0, 1)], 1.0);
    }

    #[test]
    fn mismatched_gradient_is_rejected() {
        let mut layer = layer();
        let opt = Momentum::new(0.1);
        let bad = Matrix::zeros(2, 1);
        assert!(opt.step(&mut layer, &bad, &Matrix::column(vec![0.0])).is_err());
    }
}
