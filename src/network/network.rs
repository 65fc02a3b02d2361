use rand::Rng;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::math::matrix::{get_sample, Matrix};
use crate::network::spec::{validate_specs, LayerSpec};
use crate::optim::momentum::Momentum;
use crate::train::epoch_stats::EpochStats;
use crate::train::loop_fn::train_loop;
use crate::train::metrics::{argmax, EvalReport, Tally};
use crate::train::train_config::TrainConfig;

/// Weight and bias gradients for one layer, shaped like its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl LayerGradients {
    pub fn zeros_like(layer: &Layer) -> LayerGradients {
        LayerGradients {
            weights: Matrix::zeros(layer.out_features(), layer.in_features()),
            biases: Matrix::zeros(layer.out_features(), 1),
        }
    }

    pub fn accumulate(&mut self, other: &LayerGradients) -> Result<()> {
        self.weights.add_assign(&other.weights)?;
        self.biases.add_assign(&other.biases)
    }

    pub fn scaled(&self, factor: f64) -> LayerGradients {
        LayerGradients {
            weights: self.weights.scalar_multiply(factor),
            biases: self.biases.scalar_multiply(factor),
        }
    }
}

/// Class probabilities for one sample plus its argmax class.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub probabilities: Vec<f64>,
    pub class: usize,
}

/// Feedforward classifier: ReLU hidden layers followed by one softmax output
/// layer, trained with cross-entropy and momentum SGD.
///
/// The network exclusively owns its layers and hands out only shared
/// references through `layers()`. Parameters only change inside `train`;
/// `forward_propagate` overwrites the per-layer `z`/`a` caches and
/// the cached input used by the next `back_propagate`.
#[derive(Debug, Clone)]
pub struct Network {
    input_size: usize,
    pub(crate) layers: Vec<Layer>,
    x: Option<Matrix>,
}

impl Network {
    /// Default topology: `input_size → hidden_size (ReLU) → output_size (Softmax)`.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Network> {
        Network::from_specs(
            input_size,
            &LayerSpec::two_layer(input_size, hidden_size, output_size),
            rng,
        )
    }

    /// Builds a network from an ordered list of layer descriptors.
    pub fn from_specs<R: Rng + ?Sized>(
        input_size: usize,
        specs: &[LayerSpec],
        rng: &mut R,
    ) -> Result<Network> {
        validate_specs(input_size, specs)?;
        let layers = specs
            .iter()
            .map(|spec| Layer::new(spec.input_size, spec.size, spec.activation, rng))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            input_size,
            layers = layers.len(),
            output_size = specs.last().map_or(0, |s| s.size),
            "network initialized"
        );

        Ok(Network { input_size, layers, x: None })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::out_features)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Runs `input` (`input_size x 1`) through every layer and returns the
    /// softmax probabilities (`output_size x 1`).
    pub fn forward_propagate(&mut self, input: &Matrix) -> Result<Matrix> {
        if input.shape() != (self.input_size, 1) {
            return Err(Error::ShapeMismatch {
                op: "forward_propagate",
                left: (self.input_size, 1),
                right: input.shape(),
            });
        }
        self.x = Some(input.clone());

        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.feed_from(&current)?;
        }
        Ok(current)
    }

    /// Closed-form softmax + cross-entropy backward pass.
    ///
    /// Uses the caches of the most recent `forward_propagate`; `y_pred` must be
    /// the output of that call. Returns one `LayerGradients` per layer, in
    /// layer order.
    pub fn back_propagate(&self, y_true: &Matrix, y_pred: &Matrix) -> Result<Vec<LayerGradients>> {
        let x = self.x.as_ref().ok_or(Error::StaleCache)?;
        if y_pred.shape() != (self.output_size(), 1) {
            return Err(Error::ShapeMismatch {
                op: "back_propagate",
                left: (self.output_size(), 1),
                right: y_pred.shape(),
            });
        }

        let mut delta = y_pred.subtract(y_true)?;
        let mut grads = Vec::with_capacity(self.layers.len());

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let layer_input = if i == 0 { x } else { &self.layers[i - 1].a };
            let weights = delta.multiply(&layer_input.transpose())?;

            let biases = if i > 0 {
                let prev = &self.layers[i - 1];
                let propagated = layer
                    .weights
                    .transpose()
                    .multiply(&delta)?
                    .hadamard(&prev.activation.derivative(&prev.z)?)?;
                std::mem::replace(&mut delta, propagated)
            } else {
                delta.clone()
            };

            grads.push(LayerGradients { weights, biases });
        }

        grads.reverse();
        Ok(grads)
    }

    /// One zeroed accumulator per layer.
    pub fn zero_gradients(&self) -> Vec<LayerGradients> {
        self.layers.iter().map(LayerGradients::zeros_like).collect()
    }

    /// The only place parameters change: one momentum step per layer.
    pub(crate) fn apply_gradients(
        &mut self,
        grads: &[LayerGradients],
        optimizer: &Momentum,
    ) -> Result<()> {
        if grads.len() != self.layers.len() {
            return Err(Error::ShapeMismatch {
                op: "apply_gradients",
                left: (self.layers.len(), 1),
                right: (grads.len(), 1),
            });
        }
        for (layer, grad) in self.layers.iter_mut().zip(grads) {
            optimizer.step(layer, &grad.weights, &grad.biases)?;
        }
        Ok(())
    }

    /// Mini-batch momentum training; see [`train_loop`].
    pub fn train<R, F>(
        &mut self,
        images: &Matrix,
        labels: &Matrix,
        config: &TrainConfig,
        rng: &mut R,
        on_epoch: F,
    ) -> Result<Vec<EpochStats>>
    where
        R: Rng + ?Sized,
        F: FnMut(&EpochStats),
    {
        train_loop(self, images, labels, config, rng, on_epoch)
    }

    /// Forward-only pass over every sample. Parameters and momentum are left
    /// untouched.
    pub fn evaluate(&mut self, images: &Matrix, labels: &Matrix) -> Result<EvalReport> {
        self.check_dataset(images, labels)?;

        let mut tally = Tally::default();
        for idx in 0..images.rows() {
            let x = get_sample(images, idx)?;
            let y = get_sample(labels, idx)?;
            let output = self.forward_propagate(&x)?;
            tally.record(&output, &y)?;
        }

        let report = tally.report();
        info!(
            loss = report.loss,
            accuracy = report.accuracy,
            correct = report.correct,
            total = report.total,
            "evaluation finished"
        );
        Ok(report)
    }

    /// Classifies the first sample of `images`.
    pub fn predict(&mut self, images: &Matrix) -> Result<Prediction> {
        if images.rows() == 0 {
            return Err(Error::EmptyDataset);
        }
        let x = get_sample(images, 0)?;
        let output = self.forward_propagate(&x)?;
        let class = argmax(output.as_slice());
        Ok(Prediction { probabilities: output.into_vec(), class })
    }

    /// Checks a `samples x features` / `samples x classes` pair against the
    /// network's input and output sizes.
    pub(crate) fn check_dataset(&self, images: &Matrix, labels: &Matrix) -> Result<()> {
        if images.rows() == 0 {
            return Err(Error::EmptyDataset);
        }
        if images.cols() != self.input_size {
            return Err(Error::ShapeMismatch {
                op: "dataset features",
                left: (images.rows(), self.input_size),
                right: images.shape(),
            });
        }
        if labels.shape() != (images.rows(), self.output_size()) {
            return Err(Error::ShapeMismatch {
                op: "dataset labels",
                left: (images.rows(), self.output_size()),
                right: labels.shape(),
            });
        }
        Ok(())
    }
}
