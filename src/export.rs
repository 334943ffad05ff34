// src/export.rs
use crate::canvas::Canvas;
use crate::error::CarpetError;
use image::{ImageBuffer, RgbImage};
use log::debug;
use std::path::Path;

/// Copy the canvas into an `image` buffer.
pub fn to_image(canvas: &Canvas) -> RgbImage {
    let size = canvas.size();
    let mut img = ImageBuffer::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = canvas.pixel(x, y);
    }
    img
}

/// Encode the canvas to `path`; the format follows the file extension.
pub fn save_image(canvas: &Canvas, path: &Path) -> Result<(), CarpetError> {
    if canvas.size() == 0 {
        return Err(CarpetError::EmptyCanvas {
            path: path.to_path_buf(),
        });
    }

    debug!("encoding {}x{} image to {}", canvas.size(), canvas.size(), path.display());
    to_image(canvas)
        .save(path)
        .map_err(|source| CarpetError::Export {
            path: path.to_path_buf(),
            source,
        })
}
