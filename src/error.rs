use std::path::PathBuf;

use thiserror::Error;

/// Error type for sprite sheet splitting operations.
///
/// Covers the fatal conditions of a run: codec failures and filesystem
/// failures. Detection-level outcomes (no grid period, empty cells,
/// undersized fragments) are not errors; they surface as empty or filtered
/// extraction results instead.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The input image could not be decoded or an output crop could not be
    /// encoded.
    #[error("image codec failure: {0}")]
    Image(#[from] image::ImageError),

    /// Reading the input or writing to the output directory failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The input path has no usable file name to derive output names from.
    #[error("input path has no file name: {}", .0.display())]
    BadInputPath(PathBuf),
}
