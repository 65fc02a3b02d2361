pub mod idx;

pub use idx::{load_dataset, load_images, parse_idx_images, parse_idx_labels, parse_idx_pair, Dataset};
