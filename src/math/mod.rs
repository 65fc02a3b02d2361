pub mod init;
pub mod matrix;

pub use init::{kaiming_normal_init, xavier_normal_init};
pub use matrix::{get_sample, Matrix};
