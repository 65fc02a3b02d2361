use rand::Rng;

use crate::error::{Error, Result};
use crate::math::init::{kaiming_normal_init, xavier_normal_init};
use crate::math::matrix::Matrix;

/// Lower clip for the softmax normalizer and for probabilities inside `log`.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// `max(0, z)`; hidden layers. Weights drawn with Kaiming init.
    #[default]
    ReLU,
    /// Whole-matrix softmax; output layer only, paired with cross-entropy so
    /// the combined gradient is `predicted - expected`. Weights drawn with
    /// Xavier init.
    Softmax,
}

impl Activation {
    pub fn apply(&self, z: &Matrix) -> Matrix {
        match self {
            Activation::ReLU => relu(z),
            Activation::Softmax => softmax(z),
        }
    }

    /// Element-wise derivative at the pre-activation `z`.
    ///
    /// Softmax has no element-wise derivative; its gradient is folded into the
    /// cross-entropy delta, so asking for it is a topology error.
    pub fn derivative(&self, z: &Matrix) -> Result<Matrix> {
        match self {
            Activation::ReLU => Ok(relu_derivative(z)),
            Activation::Softmax => Err(Error::InvalidTopology(
                "softmax may only be used on the output layer".to_owned(),
            )),
        }
    }

    /// Draws one initial weight for a layer with this activation.
    pub fn init_weight<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        in_features: usize,
        out_features: usize,
    ) -> Result<f64> {
        match self {
            Activation::ReLU => kaiming_normal_init(rng, in_features),
            Activation::Softmax => xavier_normal_init(rng, in_features, out_features),
        }
    }
}

pub fn relu(z: &Matrix) -> Matrix {
    z.map(|x| if x > 0.0 { x } else { 0.0 })
}

/// 1 where `z > 0`, else 0. `z == 0` maps to 0, matching the `relu` tie.
pub fn relu_derivative(z: &Matrix) -> Matrix {
    z.map(|x| if x > 0.0 { 1.0 } else { 0.0 })
}

/// Numerically stabilized softmax over the *whole* matrix.
///
/// The single global maximum is subtracted before exponentiating and the sum
/// of exponentials is clipped to at least `EPSILON`. Callers always pass one
/// `n x 1` column, so the result is a distribution over that column.
pub fn softmax(z: &Matrix) -> Matrix {
    let max_z = match z.max() {
        Some(m) => m,
        None => return z.clone(),
    };
    let exps = z.map(|x| (x - max_z).exp());
    let sum = exps.sum().max(EPSILON);
    exps.map(|x| x / sum)
}
