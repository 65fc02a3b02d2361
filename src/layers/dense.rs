use rand::Rng;

use crate::activation::activation::Activation;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Parameters and scratch state of one linear + activation stage.
///
/// `z` and `a` are overwritten on every forward pass. `weight_velocity` and
/// `bias_velocity` accumulate across the whole training run. Outside the crate
/// every field is read-only; the owning `Network` is the only writer.
#[derive(Debug, Clone)]
pub struct Layer {
    in_features: usize,
    out_features: usize,
    pub(crate) activation: Activation,
    /// `out_features x in_features`
    pub(crate) weights: Matrix,
    /// `out_features x 1`
    pub(crate) biases: Matrix,
    /// Pre-activation from the last forward pass.
    pub(crate) z: Matrix,
    /// Post-activation from the last forward pass.
    pub(crate) a: Matrix,
    pub(crate) weight_velocity: Matrix,
    pub(crate) bias_velocity: Matrix,
}

impl Layer {
    /// Biases and momentum start at zero; every weight is drawn from the
    /// initializer matching `activation` (Kaiming for ReLU, Xavier for softmax).
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Layer> {
        if in_features == 0 || out_features == 0 {
            return Err(Error::InvalidTopology(format!(
                "layer dimensions must be non-zero, got {}x{}",
                out_features, in_features
            )));
        }

        let mut weights = Matrix::zeros(out_features, in_features);
        for w in weights.data.iter_mut() {
            *w = activation.init_weight(rng, in_features, out_features)?;
        }

        Ok(Layer {
            in_features,
            out_features,
            activation,
            weights,
            biases: Matrix::zeros(out_features, 1),
            z: Matrix::zeros(out_features, 1),
            a: Matrix::zeros(out_features, 1),
            weight_velocity: Matrix::zeros(out_features, in_features),
            bias_velocity: Matrix::zeros(out_features, 1),
        })
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    /// Pre-activation cached by the last forward pass.
    pub fn pre_activation(&self) -> &Matrix {
        &self.z
    }

    /// Output cached by the last forward pass.
    pub fn output(&self) -> &Matrix {
        &self.a
    }

    pub fn weight_velocity(&self) -> &Matrix {
        &self.weight_velocity
    }

    pub fn bias_velocity(&self) -> &Matrix {
        &self.bias_velocity
    }

    /// `z = W·input + b`, `a = activation(z)`; caches both and returns `a`.
    pub(crate) fn feed_from(&mut self, input: &Matrix) -> Result<Matrix> {
        let mut z = self.weights.multiply(input)?;
        z.add_assign(&self.biases)?;
        self.a = self.activation.apply(&z);
        self.z = z;
        Ok(self.a.clone())
    }
}
