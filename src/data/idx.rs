//! IDX binary files as used by MNIST and its derivatives (Fashion-MNIST,
//! EMNIST, …), read straight into the matrices the network consumes.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Feature matrix (`samples x rows*cols`, values in [0, 1]) and its one-hot
/// label matrix (`samples x n_classes`).
#[derive(Debug, Clone)]
pub struct Dataset {
    pub images: Matrix,
    pub labels: Matrix,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.images.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn be_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

fn check_header(bytes: &[u8], what: &str, header_len: usize, dims: u8) -> Result<()> {
    if bytes.len() < header_len {
        return Err(Error::Format(format!(
            "IDX {} file too short: expected at least {} header bytes, got {}.",
            what, header_len, bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(Error::Format(format!(
            "IDX {} file: bytes 0-1 must be 0x00 0x00 (reserved), got 0x{:02X} 0x{:02X}.",
            what, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(Error::Format(format!(
            "IDX {} file: byte 2 (dtype) must be 0x08 (uint8), got 0x{:02X}.",
            what, bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(Error::Format(format!(
            "IDX {} file: byte 3 (dimensions) must be {}, got {}.",
            what, dims, bytes[3]
        )));
    }
    Ok(())
}

/// Parses an IDX3 image file into a `N x rows*cols` matrix, each pixel
/// divided by 255.0.
pub fn parse_idx_images(image_bytes: &[u8]) -> Result<Matrix> {
    check_header(image_bytes, "image", 16, 0x03)?;

    let n_items = be_u32(image_bytes, 4);
    let rows = be_u32(image_bytes, 8);
    let cols = be_u32(image_bytes, 12);

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        Error::Format(format!(
            "IDX image file: rows * cols overflows usize (rows={}, cols={}).",
            rows, cols
        ))
    })?;
    let data_len = n_items.checked_mul(n_pixels).ok_or_else(|| {
        Error::Format(format!(
            "IDX image file: n_items * n_pixels overflows usize (n_items={}, n_pixels={}).",
            n_items, n_pixels
        ))
    })?;

    if image_bytes.len() - 16 < data_len {
        return Err(Error::Format(format!(
            "IDX image file too short: header declares {} items of {}x{} pixels \
             ({} data bytes needed after header), but file is only {} bytes total.",
            n_items, rows, cols, data_len, image_bytes.len()
        )));
    }

    let pixels = image_bytes[16..16 + data_len]
        .iter()
        .map(|&px| px as f64 / 255.0)
        .collect();
    Matrix::from_vec(n_items, n_pixels, pixels)
}

/// Parses an IDX1 label file into a `N x n_classes` one-hot matrix.
pub fn parse_idx_labels(label_bytes: &[u8], n_classes: usize) -> Result<Matrix> {
    check_header(label_bytes, "label", 8, 0x01)?;

    if n_classes < 2 {
        return Err(Error::InvalidConfig(format!(
            "n_classes must be at least 2, got {}.",
            n_classes
        )));
    }

    let n_items = be_u32(label_bytes, 4);
    if label_bytes.len() - 8 < n_items {
        return Err(Error::Format(format!(
            "IDX label file too short: header declares {} labels but file is only {} bytes.",
            n_items,
            label_bytes.len()
        )));
    }

    let mut labels = Matrix::zeros(n_items, n_classes);
    for (i, &class_idx) in label_bytes[8..8 + n_items].iter().enumerate() {
        let class = class_idx as usize;
        if class >= n_classes {
            return Err(Error::Format(format!(
                "IDX label at index {}: class index {} is out of range for n_classes={}.",
                i, class, n_classes
            )));
        }
        labels.set(i, class, 1.0)?;
    }
    Ok(labels)
}

/// Parses an image/label file pair, requiring equal item counts.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<Dataset> {
    let images = parse_idx_images(image_bytes)?;
    let labels = parse_idx_labels(label_bytes, n_classes)?;
    if images.rows() != labels.rows() {
        return Err(Error::Format(format!(
            "IDX file mismatch: image file declares {} items but label file declares {}.",
            images.rows(),
            labels.rows()
        )));
    }
    Ok(Dataset { images, labels })
}

/// Reads an IDX3 image file without labels, e.g. a single image to classify.
pub fn load_images(path: impl AsRef<Path>) -> Result<Matrix> {
    let path = path.as_ref();
    let images = parse_idx_images(&fs::read(path)?)?;
    debug!(path = %path.display(), samples = images.rows(), "loaded IDX images");
    Ok(images)
}

/// Reads an IDX3 image file and its IDX1 label file.
pub fn load_dataset(
    image_path: impl AsRef<Path>,
    label_path: impl AsRef<Path>,
    n_classes: usize,
) -> Result<Dataset> {
    let image_bytes = fs::read(image_path.as_ref())?;
    let label_bytes = fs::read(label_path.as_ref())?;
    let dataset = parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    debug!(
        images = %image_path.as_ref().display(),
        samples = dataset.len(),
        features = dataset.images.cols(),
        "loaded IDX dataset"
    );
    Ok(dataset)
}
