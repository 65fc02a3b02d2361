use crate::error::{Error, Result};
use crate::optim::momentum::DEFAULT_MOMENTUM;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`        : total number of full passes over the training data
/// - `batch_size`    : samples per mini-batch; the last batch of an epoch may
///                     be smaller
/// - `learning_rate` : step size fed into the momentum update
/// - `momentum`      : velocity decay; 0.9 unless overridden
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub momentum: f64,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            learning_rate,
            momentum: DEFAULT_MOMENTUM,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".to_owned()));
        }
        if !self.learning_rate.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(Error::InvalidConfig(format!(
                "momentum must lie in [0, 1), got {}",
                self.momentum
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_momentum() {
        let config = TrainConfig::new(10, 64, 0.01);
        assert_eq!(config.momentum, 0.9);
        config.validate().unwrap();
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(TrainConfig::new(1, 0, 0.01).validate().is_err());
    }

    #[test]
    fn bad_rates_are_rejected() {
        assert!(TrainConfig::new(1, 1, f64::NAN).validate().is_err());
        let config = TrainConfig { momentum: 1.0, ..TrainConfig::new(1, 1, 0.1) };
        assert!(config.validate().is_err());
    }
}
