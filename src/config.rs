//! Run configuration for the `ferrite-mlp` binary.
//!
//! Defaults reproduce the stock MNIST run. Setting `FERRITE_MLP_CONFIG` to a
//! JSON file overrides any subset of the fields; missing fields keep their
//! defaults.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::train::train_config::TrainConfig;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "FERRITE_MLP_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub train_images: PathBuf,
    pub train_labels: PathBuf,
    pub test_images: PathBuf,
    pub test_labels: PathBuf,
    /// Single-image IDX3 files classified after training.
    pub predict_images: Vec<PathBuf>,
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub batch_size: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    /// Fixed seed for initialization and shuffling; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            train_images: PathBuf::from("mnist/train/train-images.idx3-ubyte"),
            train_labels: PathBuf::from("mnist/train/train-labels.idx1-ubyte"),
            test_images: PathBuf::from("mnist/test/t10k-images.idx3-ubyte"),
            test_labels: PathBuf::from("mnist/test/t10k-labels.idx1-ubyte"),
            predict_images: [2, 3, 5, 6, 7, 8, 9]
                .iter()
                .map(|digit| PathBuf::from(format!("mnist/misc/img{}g.idx3-ubyte", digit)))
                .collect(),
            input_size: 784,
            hidden_size: 128,
            output_size: 10,
            batch_size: 64,
            epochs: 10,
            learning_rate: 0.01,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Deserializes a `RunConfig` from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let file = File::open(path)?;
        let config: RunConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `FERRITE_MLP_CONFIG`, or the defaults.
    pub fn from_env() -> Result<RunConfig> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => RunConfig::load_json(path),
            None => Ok(RunConfig::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "layer sizes must be non-zero, got {}/{}/{}",
                self.input_size, self.hidden_size, self.output_size
            )));
        }
        if self.output_size < 2 {
            return Err(Error::InvalidConfig("output_size must be at least 2".to_owned()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        self.train_config().validate()
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new(self.epochs, self.batch_size, self.learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_mnist_run() {
        let config = RunConfig::default();
        assert_eq!((config.input_size, config.hidden_size, config.output_size), (784, 128, 10));
        assert_eq!(config.train_config(), TrainConfig::new(10, 64, 0.01));
        assert_eq!(config.predict_images.len(), 7);
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{ "epochs": 3, "seed": 42, "predict_images": [] }"#).unwrap();
        assert_eq!(config.epochs, 3);
        assert_eq!(config.seed, Some(42));
        assert!(config.predict_images.is_empty());
        assert_eq!(config.batch_size, 64);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<RunConfig>(r#"{ "epoch": 3 }"#).is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let zero_batch = RunConfig { batch_size: 0, ..RunConfig::default() };
        assert!(zero_batch.validate().is_err());
        let negative_lr = RunConfig { learning_rate: -0.1, ..RunConfig::default() };
        assert!(negative_lr.validate().is_err());
        let no_hidden = RunConfig { hidden_size: 0, ..RunConfig::default() };
        assert!(no_hidden.validate().is_err());
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        assert!(matches!(
            RunConfig::load_json("no/such/config.json"),
            Err(Error::Io(_))
        ));
    }
}
