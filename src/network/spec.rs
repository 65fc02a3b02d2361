use crate::activation::activation::Activation;
use crate::error::{Error, Result};

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       : number of neurons in this layer
/// - `input_size` : number of neurons feeding into this layer (the output
///                  size of the previous layer, or the raw input dimension for
///                  the first layer)
/// - `activation` : activation applied after the linear transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: Activation,
}

impl LayerSpec {
    pub fn new(size: usize, input_size: usize, activation: Activation) -> LayerSpec {
        LayerSpec { size, input_size, activation }
    }

    /// input → hidden (ReLU) → output (Softmax).
    pub fn two_layer(input_size: usize, hidden_size: usize, output_size: usize) -> Vec<LayerSpec> {
        vec![
            LayerSpec::new(hidden_size, input_size, Activation::ReLU),
            LayerSpec::new(output_size, hidden_size, Activation::Softmax),
        ]
    }
}

/// Checks that `specs` chain from `input_size`, that every hidden layer is
/// ReLU and that the last layer is Softmax.
pub fn validate_specs(input_size: usize, specs: &[LayerSpec]) -> Result<()> {
    let last = specs
        .last()
        .ok_or_else(|| Error::InvalidTopology("network needs at least one layer".to_owned()))?;

    let mut expected_input = input_size;
    for (i, spec) in specs.iter().enumerate() {
        if spec.input_size != expected_input {
            return Err(Error::InvalidTopology(format!(
                "layer {} expects {} inputs but receives {}",
                i, spec.input_size, expected_input
            )));
        }
        if i + 1 < specs.len() && spec.activation != Activation::ReLU {
            return Err(Error::InvalidTopology(format!(
                "hidden layer {} must use ReLU, got {:?}",
                i, spec.activation
            )));
        }
        expected_input = spec.size;
    }

    if last.activation != Activation::Softmax {
        return Err(Error::InvalidTopology(format!(
            "output layer must use Softmax, got {:?}",
            last.activation
        )));
    }
    Ok(())
}
