pub mod network;
pub mod spec;

pub use network::{LayerGradients, Network, Prediction};
pub use spec::{validate_specs, LayerSpec};
