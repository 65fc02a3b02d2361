pub mod momentum;

pub use momentum::{Momentum, DEFAULT_MOMENTUM};
