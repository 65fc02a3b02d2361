pub mod error;
pub mod math;
pub mod activation;
pub mod loss;
pub mod layers;
pub mod network;
pub mod optim;
pub mod train;
pub mod data;
pub mod config;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::{get_sample, Matrix};
pub use activation::activation::Activation;
pub use layers::dense::Layer;
pub use network::network::{LayerGradients, Network, Prediction};
pub use network::spec::LayerSpec;
pub use optim::momentum::Momentum;
pub use train::{EpochStats, EvalReport, TrainConfig};
pub use data::idx::Dataset;
pub use config::RunConfig;
