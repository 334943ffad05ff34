//! Error types for the carpet renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a render. All variants are fatal.
#[derive(Debug, Error)]
pub enum CarpetError {
    /// Canvas size is not a positive power of three, or is too large.
    #[error("size must be a power of three (3^n) no larger than {max}, got {0}", max = crate::utils::MAX_SIZE)]
    InvalidSize(i64),

    /// Depth or thread count below one.
    #[error("{name} must be >= 1, got {value}")]
    InvalidParameter { name: &'static str, value: i64 },

    /// Nothing to encode.
    #[error("refusing to save an empty image to {}", path.display())]
    EmptyCanvas { path: PathBuf },

    /// The encoder or the filesystem rejected the image.
    #[error("failed to save image to {}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Worker pool could not be started.
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
