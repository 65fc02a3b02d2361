pub mod activation;

pub use activation::{relu, relu_derivative, softmax, Activation, EPSILON};
